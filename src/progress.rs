//! Progress-callback trait for batch and per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgress>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to observe a
//! run: batch boundaries, a low-resolution preview of each page, and whether
//! each page was read from its text layer, needed OCR, or failed.
//!
//! Everything reported here is display-only. The extraction result never
//! depends on what a callback does.
//!
//! # Example
//!
//! ```rust
//! use ocr_toolkit::{ExtractionConfig, ExtractionMethod, ExtractionProgress};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     ocr_pages: AtomicUsize,
//! }
//!
//! impl ExtractionProgress for CountingCallback {
//!     fn on_page_complete(&self, _page_num: usize, method: ExtractionMethod, _chars: usize) {
//!         if method == ExtractionMethod::OpticalRecognition {
//!             self.ocr_pages.fetch_add(1, Ordering::SeqCst);
//!         }
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { ocr_pages: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgress>)
//!     .build()
//!     .unwrap();
//! ```

use crate::config::PageRange;
use crate::output::ExtractionMethod;
use image::DynamicImage;
use std::sync::Arc;

/// Called by the batch orchestrator as it walks a page range.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The trait is `Send + Sync` because extraction runs on
/// a blocking worker thread while the callback is usually owned by the caller.
pub trait ExtractionProgress: Send + Sync {
    /// Called once before the first page.
    ///
    /// # Arguments
    /// * `range`: the validated page range
    /// * `total_batches`: number of batches the range was split into
    fn on_extraction_start(&self, range: PageRange, total_batches: usize) {
        let _ = (range, total_batches);
    }

    /// Called at each batch boundary.
    ///
    /// # Arguments
    /// * `batch_num`: 1-indexed batch number
    /// * `batch`: the pages this batch covers (1-indexed, inclusive)
    fn on_batch_start(&self, batch_num: usize, batch: PageRange) {
        let _ = (batch_num, batch);
    }

    /// Whether the orchestrator should render a preview for each page.
    ///
    /// Previews cost one extra render per page, so they are off unless a
    /// callback asks for them.
    fn wants_previews(&self) -> bool {
        false
    }

    /// Called with a preview bitmap (rendered at the preview DPI).
    fn on_page_preview(&self, page_num: usize, preview: &DynamicImage) {
        let _ = (page_num, preview);
    }

    /// Called when a page's text layer is too short and OCR is about to run.
    fn on_page_needs_ocr(&self, page_num: usize) {
        let _ = page_num;
    }

    /// Called when a page produced text.
    ///
    /// # Arguments
    /// * `page_num`: 1-indexed page number
    /// * `method`: where the text came from
    /// * `chars`: character count of the page text
    fn on_page_complete(&self, page_num: usize, method: ExtractionMethod, chars: usize) {
        let _ = (page_num, method, chars);
    }

    /// Called when a page failed; the run continues with the next page.
    fn on_page_error(&self, page_num: usize, error: &str) {
        let _ = (page_num, error);
    }

    /// Called once after every page in the range has been attempted.
    ///
    /// # Arguments
    /// * `total_pages`: pages in the range
    /// * `success_count`: pages that produced text without error
    fn on_extraction_complete(&self, total_pages: usize, success_count: usize) {
        let _ = (total_pages, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl ExtractionProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgress>;
