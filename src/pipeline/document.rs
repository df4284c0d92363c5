//! Document loading and page access via pdfium.
//!
//! [`PdfEngine`] owns the pdfium bindings; [`Document`] borrows it and owns
//! one opened PDF. Both are created per request and dropped when the request
//! is done.
//!
//! ## Threading
//!
//! pdfium keeps global state and is not async-safe. Everything in this module
//! is blocking and must run on a blocking thread
//! (`tokio::task::spawn_blocking`); see [`crate::extract`].
//!
//! ## Why cap pixels as well as DPI?
//!
//! Page sizes vary wildly: an A0 poster rendered at 300 DPI would be roughly
//! 10,000 × 14,000 px. `max_pixels` caps the longest edge regardless of the
//! physical page size so memory stays bounded.

use crate::error::{PageError, ToolkitError};
use crate::output::DocumentInfo;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Read-only access to the pages of an opened document.
///
/// Indices are 0-based. The page resolver and batch orchestrator only talk to
/// this trait, so they can be exercised without pdfium.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// The page's embedded text layer (may be empty).
    fn page_text(&self, index: usize) -> Result<String, PageError>;

    /// Rasterise the page at `dpi`, capping the longest edge at `max_pixels`.
    fn render_page(&self, index: usize, dpi: u32, max_pixels: u32)
        -> Result<DynamicImage, PageError>;

    /// Facts about the document for the result.
    fn info(&self) -> DocumentInfo {
        DocumentInfo {
            page_count: self.page_count(),
            ..DocumentInfo::default()
        }
    }
}

/// Bound pdfium library.
pub struct PdfEngine {
    pdfium: Pdfium,
}

impl PdfEngine {
    /// Bind pdfium: an explicit library path if given, otherwise a library
    /// next to the working directory, otherwise the system library.
    pub fn bind(library: Option<&Path>) -> Result<Self, ToolkitError> {
        let bindings = match library {
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| ToolkitError::PdfiumBindingFailed(format!("{e:?}")))?;

        debug!("pdfium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Open a PDF held in memory.
    pub fn open<'a>(
        &'a self,
        bytes: Vec<u8>,
        password: Option<&'a str>,
    ) -> Result<Document<'a>, ToolkitError> {
        let byte_len = bytes.len();
        let inner = self
            .pdfium
            .load_pdf_from_byte_vec(bytes, password)
            .map_err(|e| classify_load_error(e, password.is_some()))?;

        let page_count = inner.pages().len() as usize;
        info!("PDF loaded: {} pages, {} bytes", page_count, byte_len);

        Ok(Document {
            inner,
            page_count,
            byte_len,
        })
    }

    /// Open, read metadata, close.
    pub fn inspect(
        &self,
        bytes: Vec<u8>,
        password: Option<&str>,
    ) -> Result<DocumentInfo, ToolkitError> {
        let doc = self.open(bytes, password)?;
        Ok(doc.metadata())
    }
}

/// Map pdfium's load error onto the password / unreadable distinction.
fn classify_load_error(e: PdfiumError, had_password: bool) -> ToolkitError {
    let detail = format!("{e:?}");
    if detail.contains("Password") || detail.contains("password") {
        if had_password {
            ToolkitError::WrongPassword
        } else {
            ToolkitError::PasswordRequired
        }
    } else {
        ToolkitError::UnreadableDocument { detail }
    }
}

/// An opened PDF.
pub struct Document<'a> {
    inner: PdfDocument<'a>,
    page_count: usize,
    byte_len: usize,
}

impl<'a> Document<'a> {
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Document info including the metadata dictionary.
    pub fn metadata(&self) -> DocumentInfo {
        let metadata = self.inner.metadata();
        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata
                .get(tag)
                .map(|t| t.value().to_string())
                .filter(|v| !v.is_empty())
        };

        DocumentInfo {
            page_count: self.page_count,
            byte_len: self.byte_len,
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            pdf_version: Some(format!("{:?}", self.inner.version())),
        }
    }

    fn page(&self, index: usize) -> Result<PdfPage<'a>, String> {
        if index >= self.page_count {
            return Err(format!(
                "page index {index} out of range ({} pages)",
                self.page_count
            ));
        }
        self.inner
            .pages()
            .get(index as u16)
            .map_err(|e| format!("{e:?}"))
    }
}

impl PageSource for Document<'_> {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize) -> Result<String, PageError> {
        let fail = |detail: String| PageError::TextLayerFailed {
            page: index + 1,
            detail,
        };
        let page = self.page(index).map_err(fail)?;
        let text = page.text().map_err(|e| fail(format!("{e:?}")))?;
        Ok(text.all())
    }

    fn render_page(
        &self,
        index: usize,
        dpi: u32,
        max_pixels: u32,
    ) -> Result<DynamicImage, PageError> {
        let fail = |detail: String| PageError::RenderFailed {
            page: index + 1,
            detail,
        };
        let page = self.page(index).map_err(fail)?;

        let render_config = PdfRenderConfig::new()
            .scale_page_by_factor(dpi as f32 / 72.0)
            .set_maximum_width(max_pixels as i32)
            .set_maximum_height(max_pixels as i32);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| fail(format!("{e:?}")))?;
        let image = bitmap.as_image();
        debug!(
            "Rendered page {} at {} DPI → {}x{} px",
            index + 1,
            dpi,
            image.width(),
            image.height()
        );
        Ok(image)
    }

    fn info(&self) -> DocumentInfo {
        DocumentInfo {
            page_count: self.page_count,
            byte_len: self.byte_len,
            ..DocumentInfo::default()
        }
    }
}
