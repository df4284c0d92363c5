//! Pipeline tests against an in-memory document and a scripted OCR engine.
//!
//! No pdfium, tesseract or network needed: [`PageSource`] and [`OcrEngine`]
//! are implemented by fakes so the orchestration rules can be checked
//! exactly.

use image::DynamicImage;
use ocr_toolkit::pipeline::batch::extract_range;
use ocr_toolkit::{
    CancelFlag, ExtractionConfig, ExtractionMethod, ExtractionProgress, Language, OcrEngine,
    OcrError, OcrLanguages, PageError, PageRange, PageSource, ToolkitError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Fakes ────────────────────────────────────────────────────────────────────

/// Text layer per page; an empty string is a scanned page.
struct FakeDocument {
    pages: Vec<String>,
    renders: AtomicUsize,
}

impl FakeDocument {
    fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            renders: AtomicUsize::new(0),
        }
    }

    /// Odd pages carry a full text layer, even pages are scans.
    fn alternating(count: usize) -> Self {
        Self::new(
            (1..=count)
                .map(|n| {
                    if n % 2 == 1 {
                        format!("  Page {n} has a genuine text layer with plenty of words.  ")
                    } else {
                        String::new()
                    }
                })
                .collect(),
        )
    }
}

impl PageSource for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, PageError> {
        Ok(self.pages[index].clone())
    }

    fn render_page(
        &self,
        index: usize,
        dpi: u32,
        _max_pixels: u32,
    ) -> Result<DynamicImage, PageError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        // Encode the page number in the width so the OCR fake can read it.
        Ok(DynamicImage::new_luma8(index as u32 + 1, dpi))
    }
}

/// "Recognises" the page number from the bitmap width; fails on listed pages.
#[derive(Default)]
struct ScriptedOcr {
    failing_pages: Vec<u32>,
    calls: AtomicUsize,
}

impl OcrEngine for ScriptedOcr {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        languages: &OcrLanguages,
    ) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let page = image.width();
        if self.failing_pages.contains(&page) {
            return Err(OcrError::Failed(format!("unreadable scan on page {page}")));
        }
        Ok(format!(
            "scanned page {page} ({}) at {} dpi\r\n",
            languages.tesseract_arg(),
            image.height()
        ))
    }
}

#[derive(Default)]
struct RecordingProgress {
    events: Mutex<Vec<String>>,
    previews: AtomicUsize,
    want_previews: bool,
    cancel_after: Option<(usize, CancelFlag)>,
}

impl RecordingProgress {
    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ExtractionProgress for RecordingProgress {
    fn on_extraction_start(&self, range: PageRange, total_batches: usize) {
        self.push(format!("start {range} x{total_batches}"));
    }

    fn on_batch_start(&self, batch_num: usize, batch: PageRange) {
        self.push(format!("batch {batch_num} {batch}"));
    }

    fn wants_previews(&self) -> bool {
        self.want_previews
    }

    fn on_page_preview(&self, _page_num: usize, preview: &DynamicImage) {
        assert_eq!(preview.height(), 80, "previews use the preview DPI");
        self.previews.fetch_add(1, Ordering::SeqCst);
    }

    fn on_page_needs_ocr(&self, page_num: usize) {
        self.push(format!("ocr {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, method: ExtractionMethod, _chars: usize) {
        self.push(format!("done {page_num} {}", method.label()));
        if let Some((after, ref flag)) = self.cancel_after {
            if page_num == after {
                flag.cancel();
            }
        }
    }

    fn on_page_error(&self, page_num: usize, _error: &str) {
        self.push(format!("error {page_num}"));
    }

    fn on_extraction_complete(&self, total_pages: usize, success_count: usize) {
        self.push(format!("complete {success_count}/{total_pages}"));
    }
}

/// Log to the test harness when RUST_LOG is set.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn config_with(progress: Arc<RecordingProgress>) -> ExtractionConfig {
    ExtractionConfig::builder()
        .progress_callback(progress as Arc<dyn ExtractionProgress>)
        .build()
        .unwrap()
}

// ── Ordering and coverage ────────────────────────────────────────────────────

#[test]
fn fragments_cover_range_in_page_order() {
    init_tracing();
    let doc = FakeDocument::alternating(60);
    let result = extract_range(
        &doc,
        PageRange::new(7, 51),
        &ExtractionConfig::default(),
        &ScriptedOcr::default(),
    )
    .unwrap();

    assert_eq!(result.fragments.len(), 51 - 7 + 1);
    let pages: Vec<usize> = result.fragments.iter().map(|f| f.page_num).collect();
    assert_eq!(pages, (7..=51).collect::<Vec<_>>());
    assert_eq!(result.range, PageRange::new(7, 51));
    assert_eq!(result.stats.batches, 3);
}

#[test]
fn long_text_layer_is_kept_verbatim_after_trim() {
    let doc = FakeDocument::alternating(4);
    let ocr = ScriptedOcr::default();
    let result = extract_range(&doc, PageRange::new(1, 4), &ExtractionConfig::default(), &ocr)
        .unwrap();

    for f in result.fragments.iter().filter(|f| f.page_num % 2 == 1) {
        assert_eq!(f.method, ExtractionMethod::TextLayer);
        assert_eq!(f.text, doc.pages[f.page_num - 1].trim());
    }
    for f in result.fragments.iter().filter(|f| f.page_num % 2 == 0) {
        assert_eq!(f.method, ExtractionMethod::OpticalRecognition);
        assert_eq!(
            f.text,
            format!("scanned page {} (eng) at 300 dpi", f.page_num)
        );
    }
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 2);
    assert_eq!(result.stats.text_layer_pages, 2);
    assert_eq!(result.stats.ocr_pages, 2);
}

#[test]
fn short_text_layer_routes_to_ocr() {
    let doc = FakeDocument::new(vec![
        "Chapter 1".into(),
        "x".repeat(30),
        "x".repeat(31),
        "   \n\t ".into(),
    ]);
    let result = extract_range(
        &doc,
        PageRange::new(1, 4),
        &ExtractionConfig::default(),
        &ScriptedOcr::default(),
    )
    .unwrap();

    let methods: Vec<ExtractionMethod> = result.fragments.iter().map(|f| f.method).collect();
    assert_eq!(
        methods,
        vec![
            ExtractionMethod::OpticalRecognition,
            ExtractionMethod::OpticalRecognition,
            ExtractionMethod::TextLayer,
            ExtractionMethod::OpticalRecognition,
        ]
    );
}

#[test]
fn ocr_uses_all_selected_languages() {
    let doc = FakeDocument::new(vec![String::new()]);
    let config = ExtractionConfig::builder()
        .languages(OcrLanguages::new([Language::Urdu, Language::English]).unwrap())
        .build()
        .unwrap();
    let result = extract_range(&doc, PageRange::new(1, 1), &config, &ScriptedOcr::default())
        .unwrap();
    assert!(result.fragments[0].text.contains("(urd+eng)"));
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[test]
fn failed_page_does_not_stop_the_run() {
    init_tracing();
    let doc = FakeDocument::new(vec![String::new(); 5]);
    let ocr = ScriptedOcr {
        failing_pages: vec![2, 4],
        ..Default::default()
    };
    let result =
        extract_range(&doc, PageRange::new(1, 5), &ExtractionConfig::default(), &ocr).unwrap();

    assert_eq!(result.fragments.len(), 5);
    assert_eq!(result.stats.failed_pages, 2);
    assert_eq!(result.stats.ocr_pages, 3);
    let failed: Vec<usize> = result.failed_pages().iter().map(|e| e.page()).collect();
    assert_eq!(failed, vec![2, 4]);

    let text = result.to_labeled_text();
    assert!(text.contains("--- Page 2 (OCR failed) ---"));
    assert!(text.contains("--- Page 3 (OCR) ---\nscanned page 3"));

    let plain = result.to_plain_text();
    assert!(!plain.contains("unreadable"));
    assert_eq!(plain.lines().count(), 3);
}

#[test]
fn every_page_failing_is_still_a_result() {
    let doc = FakeDocument::new(vec![String::new(); 2]);
    let ocr = ScriptedOcr {
        failing_pages: vec![1, 2],
        ..Default::default()
    };
    let result =
        extract_range(&doc, PageRange::new(1, 2), &ExtractionConfig::default(), &ocr).unwrap();
    assert_eq!(result.stats.failed_pages, 2);
    assert!(result.to_plain_text().is_empty());
}

#[test]
fn invalid_ranges_are_rejected() {
    let doc = FakeDocument::alternating(10);
    let ocr = ScriptedOcr::default();
    for (start, end) in [(0, 3), (5, 4), (3, 11)] {
        let err = extract_range(
            &doc,
            PageRange::new(start, end),
            &ExtractionConfig::default(),
            &ocr,
        )
        .unwrap_err();
        assert!(
            matches!(err, ToolkitError::PageRangeInvalid { total: 10, .. }),
            "{start}-{end}: {err:?}"
        );
    }
    assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
}

// ── Progress events ──────────────────────────────────────────────────────────

#[test]
fn batches_of_twenty_over_forty_five_pages() {
    let doc = FakeDocument::new(vec!["y".repeat(40); 45]);
    let progress = Arc::new(RecordingProgress::default());
    extract_range(
        &doc,
        PageRange::new(1, 45),
        &config_with(progress.clone()),
        &ScriptedOcr::default(),
    )
    .unwrap();

    let batches: Vec<String> = progress
        .events()
        .into_iter()
        .filter(|e| e.starts_with("batch") || e.starts_with("start"))
        .collect();
    assert_eq!(
        batches,
        vec!["start 1-45 x3", "batch 1 1-20", "batch 2 21-40", "batch 3 41-45"]
    );
}

#[test]
fn page_events_follow_page_order() {
    let doc = FakeDocument::alternating(3);
    let progress = Arc::new(RecordingProgress::default());
    let ocr = ScriptedOcr {
        failing_pages: vec![2],
        ..Default::default()
    };
    extract_range(&doc, PageRange::new(1, 3), &config_with(progress.clone()), &ocr).unwrap();

    assert_eq!(
        progress.events(),
        vec![
            "start 1-3 x1",
            "batch 1 1-3",
            "done 1 Text Layer",
            "ocr 2",
            "error 2",
            "done 3 Text Layer",
            "complete 2/3",
        ]
    );
}

#[test]
fn previews_only_when_requested() {
    let doc = FakeDocument::alternating(4);

    let quiet = Arc::new(RecordingProgress::default());
    extract_range(
        &doc,
        PageRange::new(1, 4),
        &config_with(quiet.clone()),
        &ScriptedOcr::default(),
    )
    .unwrap();
    assert_eq!(quiet.previews.load(Ordering::SeqCst), 0);
    // Only the two scanned pages were rendered.
    assert_eq!(doc.renders.load(Ordering::SeqCst), 2);

    let watching = Arc::new(RecordingProgress {
        want_previews: true,
        ..Default::default()
    });
    extract_range(
        &doc,
        PageRange::new(1, 4),
        &config_with(watching.clone()),
        &ScriptedOcr::default(),
    )
    .unwrap();
    assert_eq!(watching.previews.load(Ordering::SeqCst), 4);
}

// ── Cancellation ─────────────────────────────────────────────────────────────

#[test]
fn cancellation_stops_between_pages() {
    let doc = FakeDocument::alternating(30);
    let flag = CancelFlag::new();
    let progress = Arc::new(RecordingProgress {
        cancel_after: Some((5, flag.clone())),
        ..Default::default()
    });
    let config = ExtractionConfig::builder()
        .progress_callback(progress.clone() as Arc<dyn ExtractionProgress>)
        .cancel_flag(flag)
        .build()
        .unwrap();

    let err = extract_range(&doc, PageRange::new(1, 30), &config, &ScriptedOcr::default())
        .unwrap_err();
    assert!(matches!(err, ToolkitError::Cancelled { completed_pages: 5 }));
    assert!(!progress.events().iter().any(|e| e.starts_with("complete")));
}

#[test]
fn audio_config_uses_a_single_batch() {
    let doc = FakeDocument::alternating(45);
    let progress = Arc::new(RecordingProgress::default());
    let config = ExtractionConfig {
        progress_callback: Some(progress.clone() as Arc<dyn ExtractionProgress>),
        ..ExtractionConfig::for_audio()
    };
    let result = extract_range(&doc, PageRange::new(1, 45), &config, &ScriptedOcr::default())
        .unwrap();
    assert_eq!(result.stats.batches, 1);
    assert!(progress.events().contains(&"batch 1 1-45".to_string()));
}
