//! Batch orchestration over a page range.
//!
//! Pages are processed strictly in ascending order, one at a time. Batches
//! only mark where progress is reported; they do not change what is
//! computed. Every page of the range produces exactly one fragment, failed
//! or not.

use crate::config::{ExtractionConfig, PageRange};
use crate::error::ToolkitError;
use crate::output::{ExtractionMethod, ExtractionResult, ExtractionStats, PageFragment};
use crate::pipeline::document::PageSource;
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::resolve::resolve_page;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Split `range` into consecutive sub-ranges of at most `batch_size` pages.
///
/// `batch_size` of `usize::MAX` yields the whole range as one batch.
pub fn plan_batches(range: PageRange, batch_size: usize) -> Vec<PageRange> {
    let size = batch_size.max(1);
    let mut batches = Vec::new();
    let mut start = range.start;
    while start <= range.end {
        let end = start.saturating_add(size - 1).min(range.end);
        batches.push(PageRange::new(start, end));
        match end.checked_add(1) {
            Some(next) => start = next,
            None => break,
        }
    }
    batches
}

/// Extract every page of `range` from `source`.
///
/// Blocking: call from a blocking worker thread. Per-page failures are kept
/// in the result; only an invalid range or cancellation is an `Err`.
pub fn extract_range(
    source: &dyn PageSource,
    range: PageRange,
    config: &ExtractionConfig,
    ocr: &dyn OcrEngine,
) -> Result<ExtractionResult, ToolkitError> {
    let total_start = Instant::now();
    let range = range.validate(source.page_count())?;
    let batches = plan_batches(range, config.batch_size);
    let cb = config.progress_callback.as_ref();

    info!(
        "Extracting pages {} in {} batch(es) with {}",
        range,
        batches.len(),
        ocr.name()
    );
    if let Some(cb) = cb {
        cb.on_extraction_start(range, batches.len());
    }

    let mut fragments: Vec<PageFragment> = Vec::with_capacity(range.len());
    let mut stats = ExtractionStats {
        batches: batches.len(),
        ..ExtractionStats::default()
    };

    for (i, batch) in batches.iter().enumerate() {
        debug!("Batch {}/{}: pages {}", i + 1, batches.len(), batch);
        if let Some(cb) = cb {
            cb.on_batch_start(i + 1, *batch);
        }

        for index in batch.indices() {
            if config.is_cancelled() {
                warn!("Cancelled after {} page(s)", fragments.len());
                return Err(ToolkitError::Cancelled {
                    completed_pages: fragments.len(),
                });
            }

            let page_num = index + 1;

            if let Some(cb) = cb.filter(|cb| cb.wants_previews()) {
                match source.render_page(index, config.preview_dpi, config.max_rendered_pixels) {
                    Ok(preview) => cb.on_page_preview(page_num, &preview),
                    Err(e) => warn!("Preview of page {} failed: {}", page_num, e),
                }
            }

            let fragment = resolve_page(source, index, ocr, config);

            match &fragment.error {
                None => {
                    match fragment.method {
                        ExtractionMethod::TextLayer => stats.text_layer_pages += 1,
                        ExtractionMethod::OpticalRecognition => stats.ocr_pages += 1,
                    }
                    if let Some(cb) = cb {
                        cb.on_page_complete(
                            page_num,
                            fragment.method,
                            fragment.text.chars().count(),
                        );
                    }
                }
                Some(e) => {
                    stats.failed_pages += 1;
                    if let Some(cb) = cb {
                        cb.on_page_error(page_num, &e.to_string());
                    }
                }
            }

            fragments.push(fragment);

            if let Some(delay) = config.page_delay {
                std::thread::sleep(delay);
            }
        }
    }

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    let succeeded = stats.text_layer_pages + stats.ocr_pages;
    info!(
        "Extraction complete: {}/{} pages ({} text layer, {} OCR), {}ms",
        succeeded,
        range.len(),
        stats.text_layer_pages,
        stats.ocr_pages,
        stats.total_duration_ms
    );
    if let Some(cb) = cb {
        cb.on_extraction_complete(range.len(), succeeded);
    }

    Ok(ExtractionResult {
        fragments,
        document: source.info(),
        range,
        stats,
    })
}
