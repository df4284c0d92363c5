//! Result types produced by the toolkit.
//!
//! Nothing here outlives the request that produced it: an
//! [`ExtractionResult`] or [`AudioArtifact`] is built once, handed to the
//! caller, and written out or dropped.

use crate::config::PageRange;
use crate::error::{PageError, ToolkitError};
use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where a page's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMethod {
    /// The document's embedded text layer.
    TextLayer,
    /// OCR over a rendered bitmap.
    OpticalRecognition,
}

impl ExtractionMethod {
    /// Label used in the page headers of the text output.
    pub fn label(self) -> &'static str {
        match self {
            ExtractionMethod::TextLayer => "Text Layer",
            ExtractionMethod::OpticalRecognition => "OCR",
        }
    }
}

/// One page's contribution to the extraction output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFragment {
    /// 1-indexed page number.
    pub page_num: usize,
    pub method: ExtractionMethod,
    /// Page text; empty when `error` is set.
    pub text: String,
    pub error: Option<PageError>,
    pub duration_ms: u64,
}

impl PageFragment {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Basic facts about an opened document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    pub byte_len: usize,
    pub title: Option<String>,
    pub author: Option<String>,
    pub producer: Option<String>,
    pub pdf_version: Option<String>,
}

/// Counters for one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub text_layer_pages: usize,
    pub ocr_pages: usize,
    pub failed_pages: usize,
    pub batches: usize,
    pub total_duration_ms: u64,
}

/// Ordered per-page fragments for a page range.
///
/// Fragments are in ascending page order and cover every page of `range`
/// exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub fragments: Vec<PageFragment>,
    pub document: DocumentInfo,
    pub range: PageRange,
    pub stats: ExtractionStats,
}

impl ExtractionResult {
    /// Text with a labelled header per page, as offered for download.
    ///
    /// ```text
    ///
    ///
    /// --- Page 1 (Text Layer) ---
    /// …
    ///
    /// --- Page 2 (OCR) ---
    /// …
    /// ```
    pub fn to_labeled_text(&self) -> String {
        let mut out = String::new();
        for f in &self.fragments {
            match &f.error {
                None => {
                    out.push_str(&format!(
                        "\n\n--- Page {} ({}) ---\n{}",
                        f.page_num,
                        f.method.label(),
                        f.text
                    ));
                }
                Some(e) => {
                    out.push_str(&format!(
                        "\n\n--- Page {} ({} failed) ---\n[{}]",
                        f.page_num,
                        f.method.label(),
                        e
                    ));
                }
            }
        }
        out
    }

    /// Page texts one after another, each followed by a newline; failed
    /// pages contribute nothing. This is what gets read aloud.
    pub fn to_plain_text(&self) -> String {
        self.fragments
            .iter()
            .filter(|f| f.is_ok())
            .fold(String::new(), |mut acc, f| {
                acc.push_str(&f.text);
                acc.push('\n');
                acc
            })
    }

    pub fn failed_pages(&self) -> Vec<&PageError> {
        self.fragments
            .iter()
            .filter_map(|f| f.error.as_ref())
            .collect()
    }
}

/// Text recognised from one standalone image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFragment {
    /// 1-indexed position in the input list.
    pub image_num: usize,
    pub text: String,
    pub duration_ms: u64,
}

/// OCR output for a list of images, in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageTextResult {
    pub fragments: Vec<ImageFragment>,
}

impl ImageTextResult {
    pub fn to_labeled_text(&self) -> String {
        self.fragments.iter().fold(String::new(), |mut acc, f| {
            acc.push_str(&format!("\n\n--- Image {} ---\n{}", f.image_num, f.text));
            acc
        })
    }
}

/// A number together with its spoken form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenNumber {
    pub value: i64,
    pub words: String,
    pub language: Language,
}

/// Synthesised speech ready to be played or saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioArtifact {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub language: Language,
    /// The text that was spoken.
    pub text: String,
    /// Number of synthesis requests it took.
    pub chunks: usize,
}

impl AudioArtifact {
    pub const MIME_MP3: &'static str = "audio/mpeg";

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the audio to `path` atomically (temp file + rename).
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ToolkitError> {
        write_atomic(path.as_ref(), &self.bytes).await
    }
}

/// Write `bytes` to `path` via a sibling temp file so readers never observe a
/// partial file.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ToolkitError> {
    let fail = |source| ToolkitError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(fail)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, bytes).await.map_err(fail)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(fail)?;
    Ok(())
}
