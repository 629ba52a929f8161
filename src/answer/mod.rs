//! Question answering over an uploaded contract.
//!
//! [`AnswerEngine`] tries each configured generation provider in order and falls back to the
//! [`LocalAnswerer`], which needs no network access. Every question gets an answer string; the
//! reported model name tells the caller which tier produced it.

pub mod candidates;
pub mod language;
pub mod local;
pub mod prompt;
pub mod routing;
pub mod similarity;

pub use language::wants_bilingual;
pub use local::{LocalAnswerer, LocalDraft, Match};
pub use similarity::{SimilarityScorer, TokenSetRatio, token_set_ratio};

use crate::capability::Capability;
use crate::generation::TextGenerator;
use crate::translation::Translator;
use language::HINDI_MARKER;
use std::sync::Arc;

/// Model name reported when the local tier answered.
pub const LOCAL_MODEL_NAME: &str = "local";

/// An answer and the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Answer text.
    pub text: String,
    /// `huggingface`, the OpenAI model name, or [`LOCAL_MODEL_NAME`].
    pub model_name: String,
}

impl Answer {
    /// Whether a hosted provider produced this answer.
    pub fn from_provider(&self) -> bool {
        self.model_name != LOCAL_MODEL_NAME
    }
}

/// Provider chain followed by the local answerer.
#[derive(Clone)]
pub struct AnswerEngine {
    providers: Vec<Arc<dyn TextGenerator>>,
    translator: Capability<Arc<dyn Translator>>,
    local: LocalAnswerer,
}

impl AnswerEngine {
    /// Assemble an engine from injected capabilities.
    pub fn new(
        providers: Vec<Arc<dyn TextGenerator>>,
        translator: Capability<Arc<dyn Translator>>,
        scorer: Arc<dyn SimilarityScorer>,
    ) -> Self {
        let local = LocalAnswerer::new(scorer, translator.clone());
        Self {
            providers,
            translator,
            local,
        }
    }

    /// Engine with no providers and no translator.
    pub fn local_only() -> Self {
        Self::new(Vec::new(), Capability::Unavailable, Arc::new(TokenSetRatio))
    }

    /// Answer `question` about `text`, using `summary` bullets as extra context.
    pub async fn answer(&self, question: &str, text: &str, summary: &[String]) -> Answer {
        let bilingual = wants_bilingual(question);
        let request = prompt::answer_request(question, text, summary, bilingual);

        for provider in &self.providers {
            match provider.generate(request.clone()).await {
                Ok(answer) => {
                    tracing::info!(provider = provider.label(), bilingual, "Provider answered question");
                    let text = if bilingual && !answer.contains(HINDI_MARKER) {
                        local::append_translation(&self.translator, answer).await
                    } else {
                        answer
                    };
                    return Answer {
                        text,
                        model_name: provider.label().to_string(),
                    };
                }
                Err(error) => {
                    tracing::warn!(provider = provider.label(), error = %error, "Provider failed to answer; trying next tier");
                }
            }
        }

        let text = self.local.answer(question, text, summary, bilingual).await;
        Answer {
            text,
            model_name: LOCAL_MODEL_NAME.to_string(),
        }
    }
}
