//! Hosted text-generation providers used for summaries and answers.
//!
//! Providers are optional. [`providers_from_config`] returns the configured ones in priority
//! order (HuggingFace, then OpenAI-compatible); callers try them in sequence and fall back to the
//! local heuristics when every provider fails. A provider signals failure with an explicit
//! [`CapabilityError`]; blank output counts as a failure too.

mod huggingface;
mod openai;

pub use huggingface::HuggingFaceClient;
pub use openai::OpenAiClient;

use crate::capability::{Capability, CapabilityError};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Request passed to a generation provider.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Optional system instruction.
    pub system: Option<String>,
    /// User prompt.
    pub prompt: String,
    /// Maximum number of new tokens to generate.
    pub max_tokens: usize,
}

impl GenerationRequest {
    /// Build a request with only a user prompt.
    pub fn new(prompt: impl Into<String>, max_tokens: usize) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens,
        }
    }

    /// Attach a system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Interface implemented by hosted text-generation backends.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Label reported as `model_name` when this provider produced a result.
    fn label(&self) -> &str;

    /// Generate text for `request`; blank output is reported as [`CapabilityError::Empty`].
    async fn generate(&self, request: GenerationRequest) -> Result<String, CapabilityError>;
}

/// Build the configured providers in priority order.
pub fn providers_from_config(config: &Config) -> Vec<Arc<dyn TextGenerator>> {
    let huggingface: Capability<Arc<dyn TextGenerator>> = config
        .hf_api_key
        .as_ref()
        .map(|token| {
            Arc::new(HuggingFaceClient::new(
                build_http_client("contract-assistant/huggingface", config.llm_timeout_secs),
                config.hf_base_url.clone(),
                config.hf_model.clone(),
                token.clone(),
            )) as Arc<dyn TextGenerator>
        })
        .into();
    let openai: Capability<Arc<dyn TextGenerator>> = config
        .openai_api_key
        .as_ref()
        .map(|key| {
            Arc::new(OpenAiClient::new(
                build_http_client("contract-assistant/openai", config.llm_timeout_secs),
                config.openai_base_url.clone(),
                config.model_name.clone(),
                key.clone(),
            )) as Arc<dyn TextGenerator>
        })
        .into();

    let providers: Vec<_> = [huggingface, openai]
        .into_iter()
        .filter_map(Capability::into_available)
        .collect();
    tracing::info!(
        providers = ?providers.iter().map(|provider| provider.label().to_string()).collect::<Vec<_>>(),
        "Generation providers configured"
    );
    providers
}

/// Construct a reqwest client with the shared timeout policy.
pub(crate) fn build_http_client(user_agent: &str, timeout_secs: u64) -> Client {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .unwrap_or_else(|error| {
            tracing::warn!(error = %error, "Falling back to default HTTP client");
            Client::new()
        })
}
