//! Pipeline stages for mixed-source PDF text extraction.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ document ──▶ batch ──▶ resolve ──▶ text layer
//! (bytes)   (pdfium)    (ranges)   (per page)    └─▶ ocr ──▶ postprocess
//! ```
//!
//! 1. [`input`]: read a local file or download a URL into memory
//! 2. [`document`]: open the bytes with pdfium behind the [`document::PageSource`] trait
//! 3. [`batch`]: split the page range into batches and walk it in order
//! 4. [`resolve`]: pick the text layer or OCR for one page
//! 5. [`ocr`] / [`vision`]: recognise a rendered bitmap
//! 6. [`postprocess`]: normalise recognised text
//!
//! [`encode`] holds the PNG and base64 helpers shared by the OCR engines.

pub mod batch;
pub mod document;
pub mod encode;
pub mod input;
pub mod ocr;
pub mod postprocess;
pub mod resolve;
pub mod vision;
