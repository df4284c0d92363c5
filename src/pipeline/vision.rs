//! Vision-LLM OCR: send the page bitmap to a multimodal model.
//!
//! Useful for handwriting, low-contrast scans and mixed-script pages where
//! tesseract struggles, at the price of a network round trip per page.
//!
//! ## Sync over async
//!
//! [`OcrEngine`] is synchronous because the page loop runs on a blocking
//! worker thread (pdfium is not async-safe). This engine holds a Tokio
//! [`Handle`] and blocks on the provider call, which is permitted from a
//! `spawn_blocking` thread but panics on a runtime worker thread.
//!
//! ## Retry Strategy
//!
//! Exponential backoff (`retry_backoff_ms * 2^attempt`) on any provider
//! error or timeout: with 500 ms base and 3 retries the waits are
//! 500 ms → 1 s → 2 s.

use crate::config::{retry_backoff, VisionOcrConfig};
use crate::error::{OcrError, ToolkitError};
use crate::language::OcrLanguages;
use crate::pipeline::encode::encode_for_vision;
use crate::pipeline::ocr::OcrEngine;
use crate::prompts::{language_hint, OCR_SYSTEM_PROMPT};
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use image::DynamicImage;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// OCR through a vision-capable LLM.
pub struct VisionOcr {
    provider: Arc<dyn LLMProvider>,
    config: VisionOcrConfig,
    runtime: Handle,
}

impl VisionOcr {
    /// Wrap an already-built provider.
    pub fn new(provider: Arc<dyn LLMProvider>, config: VisionOcrConfig, runtime: Handle) -> Self {
        Self {
            provider,
            config,
            runtime,
        }
    }

    /// Resolve the provider from the config or environment.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn from_config(config: VisionOcrConfig) -> Result<Self, ToolkitError> {
        let runtime = Handle::try_current()
            .map_err(|e| ToolkitError::Internal(format!("no Tokio runtime: {e}")))?;
        let provider = resolve_provider(&config)?;
        Ok(Self::new(provider, config, runtime))
    }

    async fn recognize_async(
        &self,
        image: &DynamicImage,
        languages: &OcrLanguages,
    ) -> Result<String, OcrError> {
        let image_data = encode_for_vision(image).map_err(|e| OcrError::Encode(e.to_string()))?;

        let messages = vec![
            ChatMessage::system(OCR_SYSTEM_PROMPT),
            ChatMessage::user_with_images(&language_hint(languages), vec![image_data]),
        ];
        let options = CompletionOptions {
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            ..Default::default()
        };
        let call_timeout = Duration::from_secs(self.config.api_timeout_secs);

        let mut last_err = OcrError::Failed("no attempt made".into());

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = retry_backoff(self.config.retry_backoff_ms, attempt);
                warn!(
                    "vision OCR: retry {}/{} after {}ms",
                    attempt,
                    self.config.max_retries,
                    backoff.as_millis()
                );
                sleep(backoff).await;
            }

            match timeout(call_timeout, self.provider.chat(&messages, Some(&options))).await {
                Ok(Ok(response)) => {
                    debug!(
                        "vision OCR: {} input tokens, {} output tokens",
                        response.prompt_tokens, response.completion_tokens
                    );
                    return Ok(response.content);
                }
                Ok(Err(e)) => {
                    warn!("vision OCR: attempt {} failed: {}", attempt + 1, e);
                    last_err = OcrError::Failed(e.to_string());
                }
                Err(_) => {
                    warn!("vision OCR: attempt {} timed out", attempt + 1);
                    last_err = OcrError::Timeout {
                        secs: self.config.api_timeout_secs,
                    };
                }
            }
        }

        Err(last_err)
    }
}

impl OcrEngine for VisionOcr {
    fn name(&self) -> &'static str {
        "vision"
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        languages: &OcrLanguages,
    ) -> Result<String, OcrError> {
        self.runtime.block_on(self.recognize_async(image, languages))
    }
}

/// Resolve the LLM provider, from most-specific to least-specific:
///
/// 1. **Named provider** (`config.provider_name`) with the configured model.
/// 2. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`).
/// 3. **OpenAI** when `OPENAI_API_KEY` is set.
/// 4. **Full auto-detection** via [`ProviderFactory::from_env`].
fn resolve_provider(config: &VisionOcrConfig) -> Result<Arc<dyn LLMProvider>, ToolkitError> {
    let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);

    if let Some(ref name) = config.provider_name {
        return create_vision_provider(name, model);
    }

    if let (Ok(prov), Ok(env_model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !env_model.is_empty() {
            return create_vision_provider(&prov, &env_model);
        }
    }

    if std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty()) {
        return create_vision_provider("openai", model);
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| ToolkitError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No vision provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or pass --vision-provider.\n\
                Error: {e}"
            ),
        })?;

    Ok(llm_provider)
}

fn create_vision_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, ToolkitError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        ToolkitError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}
