//! End-to-end tests against real PDFs, a real tesseract and the real
//! speech service.
//!
//! They need the pdfium library, `tesseract` with `eng`/`urd` data, network
//! access, and sample files in `./test_cases/`, so they are gated behind the
//! `E2E_ENABLED` environment variable.
//!
//! Run with:
//!   E2E_ENABLED=1 LD_LIBRARY_PATH=. cargo test --test e2e -- --nocapture
//!
//! Expected files:
//!   test_cases/attention_is_all_you_need.pdf   digital, 15 pages
//!   test_cases/scanned.pdf                     image-only pages
//!   test_cases/receipt.png                     photo of printed text

use ocr_toolkit::{
    extract_image_text, extract_pdf_text, inspect, number_to_speech, pdf_to_speech,
    ExtractionConfig, ExtractionMethod, GoogleTranslateTts, Language, OcrLanguages,
    RangeRequest, SpeechConfig, TesseractCli, ToolkitError,
};
use std::path::PathBuf;
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

fn output_dir() -> PathBuf {
    let d = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases/output");
    std::fs::create_dir_all(&d).ok();
    d
}

/// Skip this test if E2E_ENABLED is not set *or* no file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP: test file not found: {}", p.display());
            return;
        }
        p
    }};
}

macro_rules! e2e_skip_unless_enabled {
    () => {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    };
}

fn read(path: &PathBuf) -> Vec<u8> {
    std::fs::read(path).expect("test file readable")
}

/// MP3 data starts with an ID3 tag or an MPEG frame sync.
fn looks_like_mp3(bytes: &[u8]) -> bool {
    bytes.starts_with(b"ID3") || (bytes.len() > 1 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0)
}

// ── Inspect ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_inspect_digital_pdf() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("attention_is_all_you_need.pdf"));

    let meta = inspect(read(&path), None, None)
        .await
        .expect("inspect() should succeed");

    assert_eq!(meta.page_count, 15);
    assert!(meta.byte_len > 0);
    println!("Metadata: {:?}", meta);
}

#[tokio::test]
async fn test_inspect_rejects_non_pdf() {
    e2e_skip_unless_enabled!();

    let err = inspect(b"definitely not a pdf".to_vec(), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ToolkitError::UnreadableDocument { .. }));
}

// ── PDF text ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_digital_pdf_uses_text_layer() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("attention_is_all_you_need.pdf"));

    let result = extract_pdf_text(
        read(&path),
        RangeRequest::new(Some(1), Some(3)),
        &ExtractionConfig::default(),
        Arc::new(TesseractCli::new()),
    )
    .await
    .expect("extraction should succeed");

    assert_eq!(result.fragments.len(), 3);
    assert!(result
        .fragments
        .iter()
        .all(|f| f.method == ExtractionMethod::TextLayer));
    assert!(result.to_labeled_text().contains("Attention"));

    let out = output_dir().join("attention_1-3.txt");
    ocr_toolkit::write_text_output(&out, &result.to_labeled_text())
        .await
        .unwrap();
    println!("wrote {}", out.display());
}

#[tokio::test]
async fn test_missing_end_defaults_to_span() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("attention_is_all_you_need.pdf"));

    let config = ExtractionConfig::builder().default_span(4).build().unwrap();
    let result = extract_pdf_text(
        read(&path),
        RangeRequest::new(Some(13), None),
        &config,
        Arc::new(TesseractCli::new()),
    )
    .await
    .unwrap();

    // 13 + 4 - 1 = 16 is capped at the last page.
    assert_eq!(result.range.start, 13);
    assert_eq!(result.range.end, 15);
}

#[tokio::test]
async fn test_scanned_pdf_goes_through_ocr() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("scanned.pdf"));

    let result = extract_pdf_text(
        read(&path),
        RangeRequest::new(Some(1), Some(1)),
        &ExtractionConfig::default(),
        Arc::new(TesseractCli::new()),
    )
    .await
    .expect("extraction should succeed");

    let page = &result.fragments[0];
    assert_eq!(page.method, ExtractionMethod::OpticalRecognition);
    assert!(page.is_ok(), "OCR failed: {:?}", page.error);
    assert!(!page.text.trim().is_empty());
}

// ── Images ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_image_ocr() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("receipt.png"));

    let images = vec![read(&path)];
    let result = tokio::task::spawn_blocking(move || {
        extract_image_text(&images, &TesseractCli::new(), &OcrLanguages::default())
    })
    .await
    .unwrap()
    .expect("image OCR should succeed");

    assert_eq!(result.fragments.len(), 1);
    assert!(!result.fragments[0].text.is_empty());
}

// ── Speech ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_number_to_speech_english_and_urdu() {
    e2e_skip_unless_enabled!();

    let tts = GoogleTranslateTts::new().unwrap();
    let speech = SpeechConfig::default();

    let (spoken, audio) = number_to_speech("1,000", Language::English, &tts, &speech)
        .await
        .expect("English synthesis should succeed");
    assert_eq!(spoken.words, "one thousand");
    assert!(looks_like_mp3(&audio.bytes));

    let (spoken, audio) = number_to_speech("-25", Language::Urdu, &tts, &speech)
        .await
        .expect("Urdu synthesis should succeed");
    assert_eq!(spoken.words, "منفی پچیس");
    assert!(looks_like_mp3(&audio.bytes));

    audio
        .write_to(output_dir().join("spoken_number.mp3"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_pdf_to_speech() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("attention_is_all_you_need.pdf"));

    let tts = GoogleTranslateTts::new().unwrap();
    let (result, audio) = pdf_to_speech(
        read(&path),
        RangeRequest::new(Some(1), Some(1)),
        &ExtractionConfig::for_audio(),
        Arc::new(TesseractCli::new()),
        Language::English,
        &tts,
        &SpeechConfig::default(),
    )
    .await
    .expect("pdf_to_speech should succeed");

    assert_eq!(result.stats.batches, 1);
    assert!(audio.chunks > 1);
    assert!(looks_like_mp3(&audio.bytes));
}
