//! Entry points: one function per user action.
//!
//! | Action | Function |
//! |--------|----------|
//! | PDF → text | [`extract_pdf_text`] / [`extract_pdf_text_blocking`] |
//! | Images → text | [`extract_image_text`] |
//! | PDF → speech | [`pdf_to_speech`] |
//! | Number → speech | [`number_to_speech`] |
//! | PDF facts | [`inspect`] |
//!
//! pdfium and the OCR engines block, so the async functions move that work
//! onto a blocking thread with `spawn_blocking`. Speech synthesis is the
//! only part that runs on the async runtime.

use crate::config::{ExtractionConfig, RangeRequest, SpeechConfig};
use crate::error::ToolkitError;
use crate::language::{Language, OcrLanguages};
use crate::number;
use crate::output::{
    write_atomic, AudioArtifact, DocumentInfo, ExtractionResult, ImageFragment, ImageTextResult,
    SpokenNumber,
};
use crate::pipeline::batch::extract_range;
use crate::pipeline::document::{PageSource, PdfEngine};
use crate::pipeline::input::ensure_pdf_magic;
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::postprocess::clean_ocr_text;
use crate::speech::{render_speech, SpeechSynthesizer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Extract text from a PDF held in memory.
///
/// Blocking: binds pdfium, opens the document, resolves the page range
/// (filling a missing end with `config.default_span` pages) and walks it.
///
/// # Errors
/// Fatal errors only: bad bytes, password problems, an invalid range,
/// pdfium missing, or cancellation. Pages that fail are recorded in the
/// result.
pub fn extract_pdf_text_blocking(
    bytes: Vec<u8>,
    request: RangeRequest,
    config: &ExtractionConfig,
    ocr: &dyn OcrEngine,
) -> Result<ExtractionResult, ToolkitError> {
    ensure_pdf_magic(&bytes)?;

    let engine = PdfEngine::bind(config.pdfium_library.as_deref())?;
    let document = engine.open(bytes, config.password.as_deref())?;
    let range = request.resolve(document.page_count(), config.default_span)?;

    let mut result = extract_range(&document, range, config, ocr)?;
    result.document = document.metadata();
    Ok(result)
}

/// Async wrapper around [`extract_pdf_text_blocking`].
///
/// # Example
/// ```rust,no_run
/// use ocr_toolkit::{extract_pdf_text, ExtractionConfig, RangeRequest, TesseractCli};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("scan.pdf")?;
/// let result = extract_pdf_text(
///     bytes,
///     RangeRequest::new(Some(1), Some(5)),
///     &ExtractionConfig::default(),
///     Arc::new(TesseractCli::new()),
/// )
/// .await?;
/// println!("{}", result.to_labeled_text());
/// # Ok(())
/// # }
/// ```
pub async fn extract_pdf_text(
    bytes: Vec<u8>,
    request: RangeRequest,
    config: &ExtractionConfig,
    ocr: Arc<dyn OcrEngine>,
) -> Result<ExtractionResult, ToolkitError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || {
        extract_pdf_text_blocking(bytes, request, &config, ocr.as_ref())
    })
    .await
    .map_err(|e| ToolkitError::Internal(format!("extraction task failed: {e}")))?
}

/// Extract a page range and read it aloud.
///
/// `config` is normally [`ExtractionConfig::for_audio`]: the whole range is
/// one batch and a missing end page means ten pages. Failed pages are left
/// out of the spoken text.
pub async fn pdf_to_speech(
    bytes: Vec<u8>,
    request: RangeRequest,
    config: &ExtractionConfig,
    ocr: Arc<dyn OcrEngine>,
    language: Language,
    synth: &dyn SpeechSynthesizer,
    speech: &SpeechConfig,
) -> Result<(ExtractionResult, AudioArtifact), ToolkitError> {
    let result = extract_pdf_text(bytes, request, config, ocr).await?;
    let text = result.to_plain_text();
    let audio = render_speech(&text, language, synth, speech).await?;
    info!(
        "Spoke pages {} ({} bytes of audio)",
        result.range,
        audio.len()
    );
    Ok((result, audio))
}

/// Recognise text in standalone images, in input order.
///
/// Blocking. Images are numbered from 1 in the result and in errors; the
/// first image that cannot be decoded or recognised aborts the run.
pub fn extract_image_text(
    images: &[Vec<u8>],
    ocr: &dyn OcrEngine,
    languages: &OcrLanguages,
) -> Result<ImageTextResult, ToolkitError> {
    let mut fragments = Vec::with_capacity(images.len());

    for (i, bytes) in images.iter().enumerate() {
        let image_num = i + 1;
        let start = Instant::now();

        let image = image::load_from_memory(bytes).map_err(|e| ToolkitError::UnreadableImage {
            index: image_num,
            detail: e.to_string(),
        })?;
        debug!(
            "Image {}: {}x{} px",
            image_num,
            image.width(),
            image.height()
        );

        let raw = ocr
            .recognize(&image, languages)
            .map_err(|e| e.for_image(image_num))?;

        fragments.push(ImageFragment {
            image_num,
            text: clean_ocr_text(&raw),
            duration_ms: start.elapsed().as_millis() as u64,
        });
    }

    info!("Recognised {} image(s) with {}", fragments.len(), ocr.name());
    Ok(ImageTextResult { fragments })
}

/// Parse `input`, spell it out in `language` and speak it.
pub async fn number_to_speech(
    input: &str,
    language: Language,
    synth: &dyn SpeechSynthesizer,
    speech: &SpeechConfig,
) -> Result<(SpokenNumber, AudioArtifact), ToolkitError> {
    let spoken = number::verbalize(input, language)?;
    debug!("{} → {}", spoken.value, spoken.words);
    let audio = render_speech(&spoken.words, language, synth, speech).await?;
    Ok((spoken, audio))
}

/// Read page count and metadata without extracting anything.
pub async fn inspect(
    bytes: Vec<u8>,
    pdfium_library: Option<PathBuf>,
    password: Option<String>,
) -> Result<DocumentInfo, ToolkitError> {
    ensure_pdf_magic(&bytes)?;
    tokio::task::spawn_blocking(move || {
        PdfEngine::bind(pdfium_library.as_deref())?.inspect(bytes, password.as_deref())
    })
    .await
    .map_err(|e| ToolkitError::Internal(format!("inspect task failed: {e}")))?
}

/// Write extracted text to `path` atomically (temp file + rename).
pub async fn write_text_output(path: impl AsRef<Path>, text: &str) -> Result<(), ToolkitError> {
    write_atomic(path.as_ref(), text.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    struct SizeOcr;

    impl OcrEngine for SizeOcr {
        fn name(&self) -> &'static str {
            "size"
        }

        fn recognize(
            &self,
            image: &DynamicImage,
            _languages: &OcrLanguages,
        ) -> Result<String, OcrError> {
            Ok(format!("{}x{}\n\n\n\n\n", image.width(), image.height()))
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn images_keep_input_order() {
        let images = vec![png(3, 2), png(5, 4)];
        let result = extract_image_text(&images, &SizeOcr, &OcrLanguages::default()).unwrap();
        let texts: Vec<_> = result.fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["3x2", "5x4"]);
        assert_eq!(result.fragments[1].image_num, 2);
        assert!(result.to_labeled_text().contains("--- Image 2 ---\n5x4"));
    }

    #[test]
    fn undecodable_image_is_reported_by_position() {
        let images = vec![png(1, 1), b"not an image".to_vec()];
        let err = extract_image_text(&images, &SizeOcr, &OcrLanguages::default()).unwrap_err();
        assert!(matches!(err, ToolkitError::UnreadableImage { index: 2, .. }));
    }

    #[tokio::test]
    async fn non_pdf_bytes_fail_before_pdfium() {
        let err = extract_pdf_text(
            b"GIF89a".to_vec(),
            RangeRequest::default(),
            &ExtractionConfig::default(),
            Arc::new(SizeOcr),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ToolkitError::UnreadableDocument { .. }));
    }

    #[test]
    fn text_output_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("pdf_text_output.txt");
        tokio_test::block_on(write_text_output(&path, "\n\n--- Page 1 (OCR) ---\nhello"))
            .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("hello"));
    }
}
