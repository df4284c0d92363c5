//! Configuration types for extraction, speech synthesis and vision OCR.
//!
//! Every policy knob of the pipeline (DPI, the native-text threshold, the
//! batch size, timeouts) lives in one of the structs below as a named value
//! rather than a literal buried in the pipeline. Each struct has a builder
//! that clamps or validates its inputs, and a `Default` with the stock
//! values of the command-line tool.

use crate::error::ToolkitError;
use crate::language::OcrLanguages;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Pipeline constants ───────────────────────────────────────────────────

/// Resolution used when a page has to go through OCR.
pub const DEFAULT_OCR_DPI: u32 = 300;

/// Resolution of the per-page preview images.
pub const DEFAULT_PREVIEW_DPI: u32 = 80;

/// A page whose trimmed text layer is longer than this is taken as-is.
pub const NATIVE_TEXT_THRESHOLD: usize = 30;

/// Pages per batch in the text-extraction flow.
pub const TEXT_BATCH_SIZE: usize = 20;

/// Pages selected when only a start page is given (text flow).
pub const TEXT_DEFAULT_SPAN: usize = 50;

/// Pages selected when only a start page is given (audio flow).
pub const AUDIO_DEFAULT_SPAN: usize = 10;

/// Maximum characters per speech-synthesis request.
pub const SPEECH_CHUNK_CHARS: usize = 100;

/// Upper bound on retries accepted by [`SpeechConfigBuilder::build`].
pub const MAX_RETRIES: u32 = 10;

/// Longest single wait between two attempts of a networked call.
pub const MAX_RETRY_BACKOFF_MS: u64 = 30_000;

/// Wait before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
/// saturating and capped at [`MAX_RETRY_BACKOFF_MS`].
pub(crate) fn retry_backoff(base_ms: u64, attempt: u32) -> Duration {
    let factor = 2u64.checked_pow(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor).min(MAX_RETRY_BACKOFF_MS))
}

/// Shared flag checked by the batch orchestrator between pages.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ── Extraction ───────────────────────────────────────────────────────────

/// Configuration for PDF text extraction.
///
/// Built via [`ExtractionConfig::builder()`] or [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use ocr_toolkit::{ExtractionConfig, Language, OcrLanguages};
///
/// let config = ExtractionConfig::builder()
///     .ocr_dpi(300)
///     .batch_size(20)
///     .languages(OcrLanguages::new([Language::English, Language::Urdu]).unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(config.languages.tesseract_arg(), "eng+urd");
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Rendering DPI for pages that need OCR. Range: 72–600. Default: 300.
    pub ocr_dpi: u32,

    /// Rendering DPI for preview images. Default: 80.
    pub preview_dpi: u32,

    /// Upper bound on either dimension of a rendered bitmap. Default: 8000.
    ///
    /// A 300-DPI render of an A0 poster would otherwise allocate hundreds of
    /// megabytes of pixels.
    pub max_rendered_pixels: u32,

    /// Trimmed text-layer length above which OCR is skipped. Default: 30.
    pub native_text_threshold: usize,

    /// Pages per batch; progress is reported at batch boundaries. Default: 20.
    pub batch_size: usize,

    /// Languages handed to the OCR engine. Default: English.
    pub languages: OcrLanguages,

    /// Page count used when the caller gives no end page. Default: 50.
    pub default_span: usize,

    /// Optional pause after each page, for paced preview streaming. Default: none.
    pub page_delay: Option<Duration>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Explicit pdfium library to bind instead of searching `./` and the system.
    pub pdfium_library: Option<PathBuf>,

    /// Receives per-batch and per-page events.
    pub progress_callback: Option<ProgressCallback>,

    /// Checked between pages; set it to stop the run early.
    pub cancel: Option<CancelFlag>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ocr_dpi: DEFAULT_OCR_DPI,
            preview_dpi: DEFAULT_PREVIEW_DPI,
            max_rendered_pixels: 8000,
            native_text_threshold: NATIVE_TEXT_THRESHOLD,
            batch_size: TEXT_BATCH_SIZE,
            languages: OcrLanguages::default(),
            default_span: TEXT_DEFAULT_SPAN,
            page_delay: None,
            password: None,
            pdfium_library: None,
            progress_callback: None,
            cancel: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("ocr_dpi", &self.ocr_dpi)
            .field("preview_dpi", &self.preview_dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("native_text_threshold", &self.native_text_threshold)
            .field("batch_size", &self.batch_size)
            .field("languages", &self.languages)
            .field("default_span", &self.default_span)
            .field("page_delay", &self.page_delay)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pdfium_library", &self.pdfium_library)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgress>"),
            )
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults of the PDF-to-audio flow: one batch, ten pages by default.
    pub fn for_audio() -> Self {
        Self {
            batch_size: usize::MAX,
            default_span: AUDIO_DEFAULT_SPAN,
            ..Self::default()
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn ocr_dpi(mut self, dpi: u32) -> Self {
        self.config.ocr_dpi = dpi;
        self
    }

    pub fn preview_dpi(mut self, dpi: u32) -> Self {
        self.config.preview_dpi = dpi.clamp(24, 300);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn native_text_threshold(mut self, chars: usize) -> Self {
        self.config.native_text_threshold = chars;
        self
    }

    pub fn batch_size(mut self, n: usize) -> Self {
        self.config.batch_size = n;
        self
    }

    pub fn languages(mut self, languages: OcrLanguages) -> Self {
        self.config.languages = languages;
        self
    }

    pub fn default_span(mut self, pages: usize) -> Self {
        self.config.default_span = pages.max(1);
        self
    }

    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.config.page_delay = (!delay.is_zero()).then_some(delay);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.config.cancel = Some(flag);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ToolkitError> {
        let c = &self.config;
        if c.ocr_dpi < 72 || c.ocr_dpi > 600 {
            return Err(ToolkitError::InvalidConfig(format!(
                "OCR DPI must be 72–600, got {}",
                c.ocr_dpi
            )));
        }
        if c.batch_size == 0 {
            return Err(ToolkitError::InvalidConfig("Batch size must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

// ── Page ranges ──────────────────────────────────────────────────────────

/// An inclusive, 1-indexed page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

impl PageRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Check `1 <= start <= end <= total`.
    pub fn validate(self, total: usize) -> Result<Self, ToolkitError> {
        if self.start < 1 || self.start > self.end || self.end > total {
            return Err(ToolkitError::PageRangeInvalid {
                start: self.start,
                end: self.end,
                total,
            });
        }
        Ok(self)
    }

    /// Number of pages covered.
    pub fn len(self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// 0-indexed page indices in ascending order.
    pub fn indices(self) -> std::ops::Range<usize> {
        self.start.saturating_sub(1)..self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A page range as the user typed it: the end page is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RangeRequest {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl RangeRequest {
    pub fn new(start: Option<usize>, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// Fill in missing bounds and validate against the page count.
    ///
    /// A missing start is page 1; a missing end is `start + span - 1`, capped at
    /// the last page.
    pub fn resolve(self, total: usize, span: usize) -> Result<PageRange, ToolkitError> {
        let start = self.start.unwrap_or(1);
        let end = self
            .end
            .unwrap_or_else(|| start.saturating_add(span.max(1) - 1).min(total));
        PageRange::new(start, end).validate(total)
    }
}

// ── Speech ───────────────────────────────────────────────────────────────

/// Configuration for the networked speech renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Synthesis endpoint. Default: Google Translate's `translate_tts`.
    pub endpoint: String,

    /// Read slowly. Default: false.
    pub slow: bool,

    /// Maximum characters per request. Default: 100.
    pub chunk_chars: usize,

    /// Timeout per request, in seconds. Default: 30.
    pub timeout_secs: u64,

    /// Retries per chunk after the first attempt. Default: 2.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (doubles each attempt, capped at
    /// 30 s). Default: 500.
    pub retry_backoff_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".into(),
            slow: false,
            chunk_chars: SPEECH_CHUNK_CHARS,
            timeout_secs: 30,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl SpeechConfig {
    pub fn builder() -> SpeechConfigBuilder {
        SpeechConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SpeechConfig`].
#[derive(Debug)]
pub struct SpeechConfigBuilder {
    config: SpeechConfig,
}

impl SpeechConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn slow(mut self, v: bool) -> Self {
        self.config.slow = v;
        self
    }

    pub fn chunk_chars(mut self, n: usize) -> Self {
        self.config.chunk_chars = n;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn build(self) -> Result<SpeechConfig, ToolkitError> {
        let c = &self.config;
        if c.chunk_chars < 10 {
            return Err(ToolkitError::InvalidConfig(format!(
                "speech chunk size must be ≥ 10 characters, got {}",
                c.chunk_chars
            )));
        }
        if c.timeout_secs == 0 {
            return Err(ToolkitError::InvalidConfig(
                "speech timeout must be ≥ 1s".into(),
            ));
        }
        if c.max_retries > MAX_RETRIES {
            return Err(ToolkitError::InvalidConfig(format!(
                "speech retries must be ≤ {}, got {}",
                MAX_RETRIES, c.max_retries
            )));
        }
        if !(c.endpoint.starts_with("http://") || c.endpoint.starts_with("https://")) {
            return Err(ToolkitError::InvalidConfig(format!(
                "speech endpoint must be an HTTP(S) URL, got '{}'",
                c.endpoint
            )));
        }
        Ok(self.config)
    }
}

// ── Vision OCR ───────────────────────────────────────────────────────────

/// Settings for the vision-LLM OCR engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionOcrConfig {
    /// Provider name ("openai", "anthropic", "gemini", "ollama", …).
    /// If None, the provider is auto-detected from the environment.
    pub provider_name: Option<String>,

    /// Model identifier. Default when None: "gpt-4.1-nano".
    pub model: Option<String>,

    /// Sampling temperature. Default: 0.0 (transcription, not creativity).
    pub temperature: f32,

    /// Maximum tokens generated per page. Default: 4096.
    pub max_tokens: usize,

    /// Retries after the first attempt. Default: 3.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential, capped at 30 s).
    /// Default: 500.
    pub retry_backoff_ms: u64,

    /// Per-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,
}

impl Default for VisionOcrConfig {
    fn default() -> Self {
        Self {
            provider_name: None,
            model: None,
            temperature: 0.0,
            max_tokens: 4096,
            max_retries: 3,
            retry_backoff_ms: 500,
            api_timeout_secs: 60,
        }
    }
}
