//! Page text resolution: text layer first, OCR as the fallback.
//!
//! A digitally authored page carries its text in the document; reading it is
//! instant and exact. A scanned page carries only an image, so it has to be
//! rendered at high resolution and recognised. The trimmed text-layer length
//! decides which case a page is in.
//!
//! The threshold is a heuristic. A page whose only native text is a short
//! heading goes through OCR even though its text layer is genuine.

use crate::config::ExtractionConfig;
use crate::output::{ExtractionMethod, PageFragment};
use crate::pipeline::document::PageSource;
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::postprocess::clean_ocr_text;
use std::time::Instant;
use tracing::{debug, warn};

/// Resolve one page (0-indexed) to a tagged fragment.
///
/// Never fails: render and recognition errors are recorded in
/// [`PageFragment::error`] so the caller can carry on with the next page.
pub fn resolve_page(
    source: &dyn PageSource,
    index: usize,
    ocr: &dyn OcrEngine,
    config: &ExtractionConfig,
) -> PageFragment {
    let start = Instant::now();
    let page_num = index + 1;

    let native = match source.page_text(index) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("{e}; falling back to OCR");
            String::new()
        }
    };

    if native.chars().count() > config.native_text_threshold {
        debug!(
            "Page {}: text layer ({} chars)",
            page_num,
            native.chars().count()
        );
        return PageFragment {
            page_num,
            method: ExtractionMethod::TextLayer,
            text: native,
            error: None,
            duration_ms: start.elapsed().as_millis() as u64,
        };
    }

    debug!(
        "Page {}: text layer too short ({} chars), running {}",
        page_num,
        native.chars().count(),
        ocr.name()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_page_needs_ocr(page_num);
    }

    let recognised = source
        .render_page(index, config.ocr_dpi, config.max_rendered_pixels)
        .and_then(|bitmap| {
            ocr.recognize(&bitmap, &config.languages)
                .map_err(|e| e.for_page(page_num))
        });

    let (text, error) = match recognised {
        Ok(raw) => (clean_ocr_text(&raw), None),
        Err(e) => {
            warn!("{e}");
            (String::new(), Some(e))
        }
    };

    PageFragment {
        page_num,
        method: ExtractionMethod::OpticalRecognition,
        text,
        error,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OcrError, PageError};
    use crate::language::OcrLanguages;
    use image::DynamicImage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct OnePage {
        text: Result<String, PageError>,
        render_fails: bool,
    }

    impl PageSource for OnePage {
        fn page_count(&self) -> usize {
            1
        }

        fn page_text(&self, _index: usize) -> Result<String, PageError> {
            self.text.clone()
        }

        fn render_page(
            &self,
            index: usize,
            _dpi: u32,
            _max_pixels: u32,
        ) -> Result<DynamicImage, PageError> {
            if self.render_fails {
                Err(PageError::RenderFailed {
                    page: index + 1,
                    detail: "corrupt content stream".into(),
                })
            } else {
                Ok(DynamicImage::new_rgb8(8, 8))
            }
        }
    }

    #[derive(Default)]
    struct CountingOcr {
        calls: AtomicUsize,
        fail: bool,
    }

    impl OcrEngine for CountingOcr {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn recognize(
            &self,
            _image: &DynamicImage,
            languages: &OcrLanguages,
        ) -> Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(OcrError::Failed("Failed loading language 'urd'".into()))
            } else {
                Ok(format!("  scanned [{}]\n\u{000C}", languages.tesseract_arg()))
            }
        }
    }

    fn page(text: &str) -> OnePage {
        OnePage {
            text: Ok(text.into()),
            render_fails: false,
        }
    }

    #[test]
    fn long_text_layer_is_used_verbatim() {
        let ocr = CountingOcr::default();
        let text = "   This page has a perfectly good text layer.  \n";
        let f = resolve_page(&page(text), 0, &ocr, &ExtractionConfig::default());
        assert_eq!(f.method, ExtractionMethod::TextLayer);
        assert_eq!(f.text, text.trim());
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn threshold_is_exclusive() {
        let ocr = CountingOcr::default();
        let exactly_30 = "a".repeat(30);
        let f = resolve_page(&page(&exactly_30), 0, &ocr, &ExtractionConfig::default());
        assert_eq!(f.method, ExtractionMethod::OpticalRecognition);

        let exactly_31 = "a".repeat(31);
        let f = resolve_page(&page(&exactly_31), 0, &ocr, &ExtractionConfig::default());
        assert_eq!(f.method, ExtractionMethod::TextLayer);
    }

    #[test]
    fn threshold_counts_characters_not_bytes() {
        // 20 Urdu letters are 40 UTF-8 bytes but still below the threshold.
        let ocr = CountingOcr::default();
        let urdu = "ب".repeat(20);
        let f = resolve_page(&page(&urdu), 0, &ocr, &ExtractionConfig::default());
        assert_eq!(f.method, ExtractionMethod::OpticalRecognition);
    }

    #[test]
    fn short_text_goes_to_ocr_and_is_cleaned() {
        let ocr = CountingOcr::default();
        let f = resolve_page(&page("Heading"), 0, &ocr, &ExtractionConfig::default());
        assert_eq!(f.method, ExtractionMethod::OpticalRecognition);
        assert_eq!(f.text, "scanned [eng]");
        assert!(f.error.is_none());
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn text_layer_error_falls_back_to_ocr() {
        let ocr = CountingOcr::default();
        let source = OnePage {
            text: Err(PageError::TextLayerFailed {
                page: 1,
                detail: "broken".into(),
            }),
            render_fails: false,
        };
        let f = resolve_page(&source, 0, &ocr, &ExtractionConfig::default());
        assert_eq!(f.method, ExtractionMethod::OpticalRecognition);
        assert!(f.is_ok());
    }

    #[test]
    fn recognition_failure_is_recorded_inline() {
        let ocr = CountingOcr {
            fail: true,
            ..Default::default()
        };
        let f = resolve_page(&page(""), 0, &ocr, &ExtractionConfig::default());
        assert_eq!(f.method, ExtractionMethod::OpticalRecognition);
        assert!(f.text.is_empty());
        assert!(matches!(
            f.error,
            Some(PageError::RecognitionFailed { page: 1, .. })
        ));
    }

    #[test]
    fn render_failure_skips_recognition() {
        let ocr = CountingOcr::default();
        let source = OnePage {
            text: Ok(String::new()),
            render_fails: true,
        };
        let f = resolve_page(&source, 0, &ocr, &ExtractionConfig::default());
        assert!(matches!(f.error, Some(PageError::RenderFailed { .. })));
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    }
}
