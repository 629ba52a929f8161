//! Translation capability used for bilingual answers.

use crate::capability::{Capability, CapabilityError, non_empty};
use crate::config::Config;
use crate::generation::build_http_client;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Interface implemented by translation backends.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` to `target` (ISO 639-1 codes).
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, CapabilityError>;
}

/// Build the translation capability from configuration.
pub fn translator_from_config(config: &Config) -> Capability<Arc<dyn Translator>> {
    if !config.enable_translation {
        return Capability::Unavailable;
    }
    Capability::Available(Arc::new(LibreTranslateClient::new(
        build_http_client("contract-assistant/translate", config.llm_timeout_secs),
        config.translate_url.clone(),
        config.translate_api_key.clone(),
    )))
}

/// Client for a LibreTranslate server.
pub struct LibreTranslateClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl LibreTranslateClient {
    /// Create a client for the server at `base_url`.
    pub fn new(http: Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/translate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[async_trait]
impl Translator for LibreTranslateClient {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, CapabilityError> {
        let mut payload = json!({
            "q": text,
            "source": source,
            "target": target,
            "format": "text",
        });
        if let Some(key) = &self.api_key {
            payload["api_key"] = json!(key);
        }

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                CapabilityError::Unavailable(format!(
                    "failed to reach LibreTranslate at {}: {error}",
                    self.base_url
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Failed(format!(
                "LibreTranslate returned {status}: {body}"
            )));
        }

        let body: TranslateResponse = response.json().await.map_err(|error| {
            CapabilityError::InvalidResponse(format!(
                "failed to decode LibreTranslate response: {error}"
            ))
        })?;
        non_empty(body.translated_text)
    }
}
