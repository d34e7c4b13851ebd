pub mod groq;
pub mod parse;
pub mod prompt;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::core::prelude::*;
use crate::domain::prelude::*;

pub use groq::GroqClient;
pub use prompt::FORTUNE_PROMPT;

/// Sampling parameters for one generation request.
///
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: crate::core::config::DEFAULT_MODEL.to_string(),
            prompt: FORTUNE_PROMPT.to_string(),
            temperature: 0.8,
            max_tokens: 500,
        }
    }
}

impl From<&Config> for GenerationParams {
    fn from(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            ..Self::default()
        }
    }
}

/// A backend that turns a prompt into free text.
///
/// The production implementation is [`GroqClient`]; tests swap in fakes.
///
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, params: &GenerationParams) -> Result<String, BackendError>;
}

/// Produces fortune readings from a text-generation backend.
///
/// Malformed replies are repaired (per-field defaults) or replaced (fallback
/// record) and never reported as errors. Only a failure to reach the backend
/// surfaces, as [`GenerationError::Failed`].
///
#[derive(Clone)]
pub struct FortuneGenerator {
    backend: Arc<dyn TextGenerator>,
    params: GenerationParams,
}

impl FortuneGenerator {
    pub fn new(backend: Arc<dyn TextGenerator>, params: GenerationParams) -> Self {
        Self { backend, params }
    }

    /// Requests one fortune from the backend.
    ///
    /// Issues exactly one request; there is no retry.
    ///
    pub async fn generate(&self) -> Result<FortuneRecord, GenerationError> {
        let text = self
            .backend
            .generate_text(&self.params)
            .await
            .map_err(|e| {
                error!("error generating fortune: {e}");
                GenerationError::Failed
            })?;

        info!(model = %self.params.model, "received fortune reply ({} bytes)", text.len());
        Ok(parse::parse_fortune(&text))
    }
}
