//! Error types for the ocr-toolkit library.
//!
//! Three error types map to three scopes of failure:
//!
//! * [`ToolkitError`]: **Fatal** for the current action: the document
//!   cannot be read, the number cannot be parsed, speech synthesis gave up.
//!   Returned as `Err(ToolkitError)` from the entry points in
//!   [`crate::extract`]. Only the current action is aborted; the process
//!   keeps running.
//!
//! * [`PageError`]: **Non-fatal**: one page could not be rendered or
//!   recognised. Stored inside [`crate::output::PageFragment`] so the rest
//!   of the page range is still extracted.
//!
//! * [`OcrError`]: raised by an [`crate::pipeline::ocr::OcrEngine`]. The
//!   page resolver turns it into a [`PageError`]; image extraction turns it
//!   into a [`ToolkitError`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the ocr-toolkit library.
#[derive(Debug, Error)]
pub enum ToolkitError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Document errors ───────────────────────────────────────────────────
    /// The bytes could not be parsed as a PDF.
    #[error("Unreadable document: {detail}")]
    UnreadableDocument { detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired,

    /// A password was provided but it is wrong.
    #[error("Wrong password for encrypted PDF")]
    WrongPassword,

    /// An uploaded image could not be decoded.
    #[error("Image {index} could not be read: {detail}")]
    UnreadableImage { index: usize, detail: String },

    /// Requested page range does not satisfy `1 <= start <= end <= total`.
    #[error("Invalid page range {start}-{end} (document has {total} pages)")]
    PageRangeInvalid {
        start: usize,
        end: usize,
        total: usize,
    },

    // ── Speech errors ─────────────────────────────────────────────────────
    /// Nothing left to speak after trimming.
    #[error("No text found to convert")]
    EmptyInput,

    /// The synthesis service returned an error after all retries.
    #[error("Speech synthesis failed after {attempts} attempt(s): {detail}")]
    SpeechSynthesisFailed { attempts: u32, detail: String },

    /// A synthesis call exceeded its timeout on every attempt.
    #[error("Speech synthesis timed out after {secs}s")]
    SpeechTimeout { secs: u64 },

    // ── Number errors ─────────────────────────────────────────────────────
    /// The input is not an integer.
    #[error("Please enter a valid number (got '{input}')")]
    InvalidNumber { input: String },

    /// The input is an integer but too large to verbalise.
    #[error("Number '{input}' is out of range (supported: {min} to {max})")]
    NumberOutOfRange { input: String, min: i64, max: i64 },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the binary, install it system-wide, or set\n\
PDFIUM_LIB_PATH=/path/to/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    /// The OCR engine could not be started at all.
    #[error("OCR engine '{engine}' is not available: {detail}")]
    OcrEngineUnavailable { engine: String, detail: String },

    /// The vision LLM provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The caller interrupted the extraction between pages.
    #[error("Extraction cancelled after {completed_pages} page(s)")]
    Cancelled { completed_pages: usize },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page (a page extraction failure).
///
/// Stored alongside [`crate::output::PageFragment`] when a page fails.
/// The extraction continues with the next page.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The embedded text layer could not be read.
    #[error("Page {page}: text layer unreadable: {detail}")]
    TextLayerFailed { page: usize, detail: String },

    /// Page rasterisation failed.
    #[error("Page {page}: rendering failed: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// The OCR engine rejected or failed on the rendered bitmap.
    #[error("Page {page}: recognition failed: {detail}")]
    RecognitionFailed { page: usize, detail: String },

    /// The OCR engine did not answer in time.
    #[error("Page {page}: recognition timed out after {secs}s")]
    Timeout { page: usize, secs: u64 },
}

impl PageError {
    /// 1-indexed page number the error belongs to.
    pub fn page(&self) -> usize {
        match self {
            PageError::TextLayerFailed { page, .. }
            | PageError::RenderFailed { page, .. }
            | PageError::RecognitionFailed { page, .. }
            | PageError::Timeout { page, .. } => *page,
        }
    }
}

/// Errors raised by an OCR engine.
#[derive(Debug, Clone, Error)]
pub enum OcrError {
    /// The engine binary/library/provider is missing.
    #[error("{engine} is not available: {detail}")]
    Unavailable { engine: &'static str, detail: String },

    /// The bitmap could not be encoded for the engine.
    #[error("image encoding failed: {0}")]
    Encode(String),

    /// The engine ran and reported a failure.
    #[error("{0}")]
    Failed(String),

    /// The engine did not answer within the configured timeout.
    #[error("timed out after {secs}s")]
    Timeout { secs: u64 },
}

impl OcrError {
    /// Attach a page number, producing the inline per-page error.
    pub fn for_page(self, page: usize) -> PageError {
        match self {
            OcrError::Timeout { secs } => PageError::Timeout { page, secs },
            other => PageError::RecognitionFailed {
                page,
                detail: other.to_string(),
            },
        }
    }

    /// Promote to a fatal error for the standalone-image flow.
    pub fn for_image(self, index: usize) -> ToolkitError {
        match self {
            OcrError::Unavailable { engine, detail } => ToolkitError::OcrEngineUnavailable {
                engine: engine.to_string(),
                detail,
            },
            other => ToolkitError::UnreadableImage {
                index,
                detail: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_range_display() {
        let e = ToolkitError::PageRangeInvalid {
            start: 5,
            end: 3,
            total: 10,
        };
        let msg = e.to_string();
        assert!(msg.contains("5-3"), "got: {msg}");
        assert!(msg.contains("10 pages"), "got: {msg}");
    }

    #[test]
    fn invalid_number_display() {
        let e = ToolkitError::InvalidNumber {
            input: "abc".into(),
        };
        assert!(e.to_string().contains("valid number"));
        assert!(e.to_string().contains("abc"));
    }

    #[test]
    fn empty_input_display() {
        assert_eq!(ToolkitError::EmptyInput.to_string(), "No text found to convert");
    }

    #[test]
    fn ocr_timeout_maps_to_page_timeout() {
        let e = OcrError::Timeout { secs: 60 }.for_page(7);
        assert_eq!(e, PageError::Timeout { page: 7, secs: 60 });
        assert_eq!(e.page(), 7);
    }

    #[test]
    fn ocr_failure_keeps_detail() {
        let e = OcrError::Failed("Failed loading language 'urd'".into()).for_page(2);
        assert!(e.to_string().contains("Page 2"));
        assert!(e.to_string().contains("urd"));
    }

    #[test]
    fn unavailable_engine_is_fatal_for_images() {
        let e = OcrError::Unavailable {
            engine: "tesseract",
            detail: "not on PATH".into(),
        }
        .for_image(1);
        assert!(matches!(e, ToolkitError::OcrEngineUnavailable { .. }));
    }

    #[test]
    fn text_layer_failure_is_its_own_kind() {
        let e = PageError::TextLayerFailed {
            page: 4,
            detail: "no text page".into(),
        };
        assert_eq!(e.page(), 4);
        assert_eq!(e.to_string(), "Page 4: text layer unreadable: no text page");
    }
}
