//! # ocr-toolkit
//!
//! Pull text out of PDFs and images, and read text or numbers aloud in
//! English or Urdu.
//!
//! ## Mixed-source extraction
//!
//! Digitally authored PDF pages carry their text; scanned pages carry only a
//! picture of it. For every page this crate reads the embedded text layer
//! first and only when that comes back (nearly) empty renders the page at
//! 300 DPI and runs OCR on it. Each page in the result is tagged with where
//! its text came from.
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Load     open with pdfium, count pages        (spawn_blocking)
//!  ├─ 2. Range    resolve start/end, split into batches of 20
//!  ├─ 3. Resolve  per page: text layer > 30 chars ? use it : render + OCR
//!  ├─ 4. Clean    normalise OCR output
//!  └─ 5. Output   ordered, tagged fragments + stats
//! ```
//!
//! A page that fails is recorded in the result and the run moves on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocr_toolkit::{extract_pdf_text, ExtractionConfig, Language, OcrLanguages,
//!                   RangeRequest, TesseractCli};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder()
//!         .languages(OcrLanguages::new([Language::English, Language::Urdu])?)
//!         .build()?;
//!     let bytes = std::fs::read("document.pdf")?;
//!     let result = extract_pdf_text(
//!         bytes,
//!         RangeRequest::new(Some(1), None),
//!         &config,
//!         Arc::new(TesseractCli::new()),
//!     )
//!     .await?;
//!     println!("{}", result.to_labeled_text());
//!     eprintln!(
//!         "{} text-layer pages, {} OCR pages",
//!         result.stats.text_layer_pages, result.stats.ocr_pages
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ocr-toolkit` binary (clap + anyhow + indicatif + tracing-subscriber) |
//! | `tesseract-native` | off | In-process libtesseract engine instead of the `tesseract` program |
//!
//! ## External requirements
//!
//! - The pdfium shared library, next to the working directory or installed
//!   system-wide.
//! - `tesseract` with the `eng` and `urd` traineddata for the default OCR
//!   engine.
//! - Network access to Google Translate for speech.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod language;
pub mod number;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod speech;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    CancelFlag, ExtractionConfig, ExtractionConfigBuilder, PageRange, RangeRequest, SpeechConfig,
    SpeechConfigBuilder, VisionOcrConfig,
};
pub use error::{OcrError, PageError, ToolkitError};
pub use extract::{
    extract_image_text, extract_pdf_text, extract_pdf_text_blocking, inspect, number_to_speech,
    pdf_to_speech, write_text_output,
};
pub use language::{Language, OcrLanguages};
pub use number::{parse_number, to_words, verbalize};
pub use output::{
    AudioArtifact, DocumentInfo, ExtractionMethod, ExtractionResult, ExtractionStats,
    ImageFragment, ImageTextResult, PageFragment, SpokenNumber,
};
pub use pipeline::document::PageSource;
pub use pipeline::ocr::{OcrEngine, TesseractCli};
#[cfg(feature = "tesseract-native")]
pub use pipeline::ocr::TesseractNative;
pub use pipeline::vision::VisionOcr;
pub use progress::{ExtractionProgress, NoopProgress, ProgressCallback};
pub use speech::{render_speech, GoogleTranslateTts, SpeechSynthesizer};
