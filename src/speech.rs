//! Speech synthesis: text in, MP3 bytes out.
//!
//! [`render_speech`] splits the text into short chunks, asks a
//! [`SpeechSynthesizer`] for each one and concatenates the returned MP3
//! frames (MP3 streams can be joined byte-for-byte). Every chunk call is
//! bounded by a timeout and retried with exponential backoff.
//!
//! The default synthesizer, [`GoogleTranslateTts`], needs network access to
//! `translate.google.com`. It is the one external service in the crate and
//! the one failure mode callers should expect.

use crate::config::{retry_backoff, SpeechConfig};
use crate::error::ToolkitError;
use crate::language::Language;
use crate::output::AudioArtifact;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Characters after which a chunk may end.
const BREAK_CHARS: [char; 10] = ['.', '!', '?', ';', ':', ',', '\n', '۔', '؟', '،'];

/// Turns a short piece of text into MP3 bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize one chunk of at most `config.chunk_chars` characters.
    async fn synthesize(
        &self,
        chunk: &str,
        language: Language,
        config: &SpeechConfig,
    ) -> Result<Vec<u8>, String>;
}

/// Google Translate's text-to-speech endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslateTts {
    client: reqwest::Client,
}

impl GoogleTranslateTts {
    pub fn new() -> Result<Self, ToolkitError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ocr-toolkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ToolkitError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn request(
        &self,
        chunk: &str,
        language: Language,
        config: &SpeechConfig,
    ) -> reqwest::RequestBuilder {
        let textlen = chunk.chars().count().to_string();
        let mut query = vec![
            ("ie", "UTF-8"),
            ("q", chunk),
            ("tl", language.speech_code()),
            ("total", "1"),
            ("idx", "0"),
            ("textlen", textlen.as_str()),
            ("client", "tw-ob"),
        ];
        if config.slow {
            query.push(("ttsspeed", "0.3"));
        }
        self.client.get(&config.endpoint).query(&query)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(
        &self,
        chunk: &str,
        language: Language,
        config: &SpeechConfig,
    ) -> Result<Vec<u8>, String> {
        let response = self
            .request(chunk, language, config)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status} from {}", config.endpoint));
        }

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        if bytes.is_empty() {
            return Err("empty audio response".into());
        }
        Ok(bytes.to_vec())
    }
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Chunks end at punctuation where possible, otherwise at whitespace. A
/// single word longer than `max_chars` is cut. Chunks with no letters or
/// digits are dropped.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max = max_chars.max(1);
    let mut chunks = Vec::new();

    for sentence in text.split_inclusive(|c| BREAK_CHARS.contains(&c)) {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in sentence.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > max {
                push_chunk(&mut chunks, &mut current);
                current_len = 0;
                let chars: Vec<char> = word.chars().collect();
                for piece in chars.chunks(max) {
                    chunks.push(piece.iter().collect());
                }
                continue;
            }

            if current_len > 0 && current_len + 1 + word_len > max {
                push_chunk(&mut chunks, &mut current);
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }
        push_chunk(&mut chunks, &mut current);
    }

    chunks.retain(|c| c.chars().any(char::is_alphanumeric));
    chunks
}

fn push_chunk(chunks: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
}

/// Speak `text` in `language`.
///
/// # Errors
/// - [`ToolkitError::EmptyInput`] when nothing is left after trimming
/// - [`ToolkitError::SpeechTimeout`] when the last attempt on a chunk timed out
/// - [`ToolkitError::SpeechSynthesisFailed`] when the last attempt on a chunk failed
pub async fn render_speech(
    text: &str,
    language: Language,
    synth: &dyn SpeechSynthesizer,
    config: &SpeechConfig,
) -> Result<AudioArtifact, ToolkitError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ToolkitError::EmptyInput);
    }

    let chunks = chunk_text(text, config.chunk_chars);
    if chunks.is_empty() {
        return Err(ToolkitError::EmptyInput);
    }
    info!(
        "Synthesising {} chars of {} speech in {} chunk(s)",
        text.chars().count(),
        language,
        chunks.len()
    );

    let mut bytes = Vec::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let audio = synthesize_with_retry(chunk, language, synth, config).await?;
        debug!("chunk {}/{}: {} bytes", i + 1, chunks.len(), audio.len());
        bytes.extend_from_slice(&audio);
    }

    Ok(AudioArtifact {
        bytes,
        mime_type: AudioArtifact::MIME_MP3.to_string(),
        language,
        text: text.to_string(),
        chunks: chunks.len(),
    })
}

async fn synthesize_with_retry(
    chunk: &str,
    language: Language,
    synth: &dyn SpeechSynthesizer,
    config: &SpeechConfig,
) -> Result<Vec<u8>, ToolkitError> {
    let call_timeout = Duration::from_secs(config.timeout_secs);
    let mut last_err = ToolkitError::Internal("no attempt made".into());

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let backoff = retry_backoff(config.retry_backoff_ms, attempt);
            warn!(
                "speech: retry {}/{} after {}ms",
                attempt,
                config.max_retries,
                backoff.as_millis()
            );
            sleep(backoff).await;
        }

        match timeout(call_timeout, synth.synthesize(chunk, language, config)).await {
            Ok(Ok(audio)) => return Ok(audio),
            Ok(Err(detail)) => {
                warn!("speech: attempt {} failed: {}", attempt + 1, detail);
                last_err = ToolkitError::SpeechSynthesisFailed {
                    attempts: attempt + 1,
                    detail,
                };
            }
            Err(_) => {
                warn!("speech: attempt {} timed out", attempt + 1);
                last_err = ToolkitError::SpeechTimeout {
                    secs: config.timeout_secs,
                };
            }
        }
    }

    Err(last_err)
}
