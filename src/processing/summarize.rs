//! Contract summarization through the provider chain with a fixed local template.
//!
//! Each provider summarizes the contract window by window, then condenses the partial summaries
//! in a single merge request. The merged output is normalized by [`merge_bullets`]. When no
//! provider produces a usable summary the [`fallback_summary`] template is returned instead.

use crate::capability::CapabilityError;
use crate::generation::{GenerationRequest, TextGenerator};
use crate::processing::chunking::split_text_by_length;
use crate::processing::types::ChunkingError;
use std::sync::Arc;

/// Instruction sent with every summary request.
pub const SUMMARY_PROMPT: &str = "You are a contract summarizer. Produce clear bullet points for: Parties involved, Duration, Payment terms, Termination conditions, Liabilities. \
Use concise language. If information is missing, state 'Not specified'.";

const MERGE_INSTRUCTION: &str = "Merge and condense into 5 bullets:";

/// Upper bound on summary bullets.
pub const MAX_SUMMARY_BULLETS: usize = 10;

/// Model name reported for the template summary.
pub const TEMPLATE_MODEL_NAME: &str = "local";

const CHUNK_MAX_TOKENS: usize = 200;
const MERGE_MAX_TOKENS: usize = 300;

const FALLBACK_FIELDS: [&str; 5] = [
    "Parties involved",
    "Duration",
    "Payment terms",
    "Termination conditions",
    "Liabilities",
];

/// Summary bullets and the tier that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// At most [`MAX_SUMMARY_BULLETS`] bullets.
    pub bullets: Vec<String>,
    /// Provider label or [`TEMPLATE_MODEL_NAME`].
    pub model_name: String,
}

/// Turn a merged model response into clean bullets.
///
/// Leading and trailing `-`, `•`, and whitespace are stripped from every line, blank lines are
/// dropped, and at most [`MAX_SUMMARY_BULLETS`] lines are kept.
pub fn merge_bullets(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim_matches(|c: char| c == '-' || c == '•' || c.is_whitespace()))
        .filter(|line| !line.is_empty())
        .take(MAX_SUMMARY_BULLETS)
        .map(str::to_string)
        .collect()
}

/// Five `"<field>: Not specified"` lines used when no provider could summarize.
pub fn fallback_summary() -> Vec<String> {
    FALLBACK_FIELDS
        .iter()
        .map(|field| format!("{field}: Not specified"))
        .collect()
}

/// Summarizes contract text with the configured providers.
#[derive(Clone)]
pub struct Summarizer {
    providers: Vec<Arc<dyn TextGenerator>>,
    chunk_chars: usize,
    chunk_overlap: usize,
}

impl Summarizer {
    /// Create a summarizer that feeds providers windows of `chunk_chars` with `chunk_overlap`.
    pub fn new(
        providers: Vec<Arc<dyn TextGenerator>>,
        chunk_chars: usize,
        chunk_overlap: usize,
    ) -> Self {
        Self {
            providers,
            chunk_chars,
            chunk_overlap,
        }
    }

    /// Summarize `text`, falling back to the template when every provider fails.
    pub async fn summarize(&self, text: &str) -> Result<Summary, ChunkingError> {
        let chunks = split_text_by_length(text, self.chunk_chars, self.chunk_overlap)?;
        tracing::debug!(chunks = chunks.len(), providers = self.providers.len(), "Summarizing contract");

        for provider in &self.providers {
            match summarize_with(provider.as_ref(), &chunks).await {
                Ok(bullets) => {
                    tracing::info!(provider = provider.label(), bullets = bullets.len(), "Summary generated");
                    return Ok(Summary {
                        bullets,
                        model_name: provider.label().to_string(),
                    });
                }
                Err(error) => {
                    tracing::warn!(provider = provider.label(), error = %error, "Provider failed to summarize; trying next tier");
                }
            }
        }

        tracing::info!("Using template summary");
        Ok(Summary {
            bullets: fallback_summary(),
            model_name: TEMPLATE_MODEL_NAME.to_string(),
        })
    }
}

async fn summarize_with(
    provider: &dyn TextGenerator,
    chunks: &[String],
) -> Result<Vec<String>, CapabilityError> {
    let mut partials = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let request = GenerationRequest::new(
            format!("{SUMMARY_PROMPT}\n\nContract text:\n{chunk}"),
            CHUNK_MAX_TOKENS,
        );
        match provider.generate(request).await {
            Ok(partial) => partials.push(partial),
            Err(error) => {
                tracing::debug!(provider = provider.label(), chunk = index, error = %error, "Skipping chunk");
            }
        }
    }
    merge_summaries(provider, &partials).await
}

/// Condense per-window summaries into at most [`MAX_SUMMARY_BULLETS`] bullets with `provider`.
///
/// Fails when there is nothing to merge, when the provider fails, or when its reply holds no
/// usable bullet.
pub async fn merge_summaries(
    provider: &dyn TextGenerator,
    partials: &[String],
) -> Result<Vec<String>, CapabilityError> {
    if partials.is_empty() {
        return Err(CapabilityError::Empty);
    }

    let request = GenerationRequest::new(
        format!("{MERGE_INSTRUCTION}\n{}", partials.join("\n")),
        MERGE_MAX_TOKENS,
    )
    .with_system(SUMMARY_PROMPT);
    let merged = provider.generate(request).await?;
    let bullets = merge_bullets(&merged);
    if bullets.is_empty() {
        return Err(CapabilityError::Empty);
    }
    Ok(bullets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers chunk prompts with `chunk_reply` and the merge prompt with `merge_reply`.
    struct StubGenerator {
        label: &'static str,
        chunk_reply: Option<&'static str>,
        merge_reply: Option<&'static str>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl StubGenerator {
        fn new(
            label: &'static str,
            chunk_reply: Option<&'static str>,
            merge_reply: Option<&'static str>,
        ) -> Arc<Self> {
            Arc::new(Self {
                label,
                chunk_reply,
                merge_reply,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        fn label(&self) -> &str {
            self.label
        }

        async fn generate(&self, request: GenerationRequest) -> Result<String, CapabilityError> {
            let is_merge = request.prompt.starts_with(MERGE_INSTRUCTION);
            self.requests.lock().unwrap().push(request);
            let reply = if is_merge { self.merge_reply } else { self.chunk_reply };
            reply
                .map(str::to_string)
                .ok_or_else(|| CapabilityError::Failed("stub".into()))
        }
    }

    #[test]
    fn merge_bullets_strips_glyphs_and_caps_length() {
        let raw = (1..=12)
            .map(|i| format!("- • Point {i} -"))
            .collect::<Vec<_>>()
            .join("\n");
        let bullets = merge_bullets(&raw);
        assert_eq!(bullets.len(), MAX_SUMMARY_BULLETS);
        assert_eq!(bullets[0], "Point 1");
        assert_eq!(bullets[9], "Point 10");
    }

    #[test]
    fn merge_bullets_drops_blank_and_glyph_only_lines() {
        let bullets = merge_bullets("\n  \n- \n•\nParties: Acme and Bolt\n");
        assert_eq!(bullets, vec!["Parties: Acme and Bolt"]);
    }

    #[test]
    fn fallback_template_lists_five_fields() {
        assert_eq!(
            fallback_summary(),
            vec![
                "Parties involved: Not specified",
                "Duration: Not specified",
                "Payment terms: Not specified",
                "Termination conditions: Not specified",
                "Liabilities: Not specified",
            ]
        );
    }

    #[tokio::test]
    async fn no_providers_returns_template() {
        let summary = Summarizer::new(Vec::new(), 6000, 400)
            .summarize("Some contract")
            .await
            .unwrap();
        assert_eq!(summary.bullets, fallback_summary());
        assert_eq!(summary.model_name, TEMPLATE_MODEL_NAME);
    }

    #[tokio::test]
    async fn provider_summarizes_each_window_then_merges() {
        let provider = StubGenerator::new("huggingface", Some("partial"), Some("- Parties: A\n- Duration: 1 year"));
        let summarizer = Summarizer::new(vec![provider.clone()], 10, 0);

        let summary = summarizer.summarize("abcdefghijklmnopqrstuvwxy").await.unwrap();

        assert_eq!(summary.bullets, vec!["Parties: A", "Duration: 1 year"]);
        assert_eq!(summary.model_name, "huggingface");
        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 4);
        assert!(requests[0].prompt.ends_with("Contract text:\nabcdefghij"));
        let merge = &requests[3];
        assert_eq!(merge.prompt, format!("{MERGE_INSTRUCTION}\npartial\npartial\npartial"));
        assert_eq!(merge.system.as_deref(), Some(SUMMARY_PROMPT));
    }

    #[tokio::test]
    async fn failing_provider_falls_through_to_next() {
        let broken = StubGenerator::new("huggingface", None, None);
        let working = StubGenerator::new("gpt-4o-mini", Some("partial"), Some("• Payment: monthly"));
        let summarizer = Summarizer::new(vec![broken.clone(), working], 6000, 400);

        let summary = summarizer.summarize("Payment is monthly.").await.unwrap();

        assert_eq!(summary.bullets, vec!["Payment: monthly"]);
        assert_eq!(summary.model_name, "gpt-4o-mini");
        // One chunk attempt, no merge.
        assert_eq!(broken.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_merge_uses_template() {
        let provider = StubGenerator::new("huggingface", Some("partial"), None);
        let summary = Summarizer::new(vec![provider], 6000, 400)
            .summarize("Short contract")
            .await
            .unwrap();
        assert_eq!(summary.bullets, fallback_summary());
    }

    #[tokio::test]
    async fn merge_truncates_twelve_bullets_to_ten() {
        let reply: &'static str = Box::leak(
            (1..=12)
                .map(|i| format!("• Clause {i}"))
                .collect::<Vec<_>>()
                .join("\n")
                .into_boxed_str(),
        );
        let provider = StubGenerator::new("huggingface", None, Some(reply));
        let partials = vec!["one".to_string(), "two".to_string()];

        let bullets = merge_summaries(provider.as_ref(), &partials).await.unwrap();

        assert_eq!(bullets.len(), 10);
        assert_eq!(bullets[9], "Clause 10");
        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].prompt, format!("{MERGE_INSTRUCTION}\none\ntwo"));
    }

    #[tokio::test]
    async fn merge_without_partials_is_empty() {
        let provider = StubGenerator::new("huggingface", None, Some("- x"));
        let result = merge_summaries(provider.as_ref(), &[]).await;
        assert!(matches!(result, Err(CapabilityError::Empty)));
        assert!(provider.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_window_is_rejected() {
        let result = Summarizer::new(Vec::new(), 0, 0).summarize("text").await;
        assert!(matches!(result, Err(ChunkingError::InvalidChunkSize)));
    }
}
