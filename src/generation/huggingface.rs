use super::{GenerationRequest, TextGenerator};
use crate::capability::{CapabilityError, non_empty};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

/// Text generation through the HuggingFace inference API.
pub struct HuggingFaceClient {
    http: Client,
    base_url: String,
    model: String,
    token: String,
}

impl HuggingFaceClient {
    /// Create a client for `model` hosted at `base_url`.
    pub fn new(http: Client, base_url: String, model: String, token: String) -> Self {
        Self {
            http,
            base_url,
            model,
            token,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

impl InferenceResponse {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Batch(items) => items.into_iter().next().map(|item| item.generated_text),
            Self::Single(item) => Some(item.generated_text),
        }
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceClient {
    fn label(&self) -> &str {
        "huggingface"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, CapabilityError> {
        let inputs = match &request.system {
            Some(system) => format!("{system}\n\nUser: {}\n\nAssistant:", request.prompt),
            None => request.prompt.clone(),
        };
        let payload = json!({
            "inputs": inputs,
            "parameters": {
                "max_new_tokens": request.max_tokens,
                "temperature": 0.3,
                "top_p": 0.9,
                "do_sample": true,
                "return_full_text": false,
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                CapabilityError::Unavailable(format!(
                    "failed to reach HuggingFace at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CapabilityError::Unavailable(format!(
                "HuggingFace model endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Failed(format!(
                "HuggingFace returned {status}: {body}"
            )));
        }

        let body: InferenceResponse = response.json().await.map_err(|error| {
            CapabilityError::InvalidResponse(format!(
                "failed to decode HuggingFace response: {error}"
            ))
        })?;

        non_empty(body.into_text().unwrap_or_default())
    }
}
