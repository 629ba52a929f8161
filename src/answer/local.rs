//! Answers questions from the contract text alone.
//!
//! The local tier first tries keyword routing (payment, duration, termination). Other questions
//! are fuzzy-matched against the candidate statements of the contract and its summary; the best
//! matches above [`SCORE_CUTOFF`] are composed into a bulleted answer. Every path returns text.

use super::candidates::{self, combined_text};
use super::language::TRANSLATION_SEPARATOR;
use super::routing::{self, Topic};
use super::similarity::SimilarityScorer;
use crate::capability::Capability;
use crate::translation::Translator;
use std::sync::Arc;

/// Minimum similarity for a candidate to count as a match.
pub const SCORE_CUTOFF: f64 = 45.0;
/// Number of ranked matches retained.
pub const MATCH_LIMIT: usize = 5;
/// Number of matches quoted in a composed answer.
pub const ANSWER_SNIPPETS: usize = 3;

const ROUTED_LINE_LIMIT: usize = 3;
const ROUTED_SUMMARY_LIMIT: usize = 3;
const COMPOSED_SUMMARY_LIMIT: usize = 3;
const NO_MATCH_SUMMARY_LIMIT: usize = 5;

/// Message returned when there is nothing to search.
pub const NO_TEXT_MESSAGE: &str = "No contract text available to answer from.";

/// A candidate statement and its similarity to the question.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Candidate statement.
    pub candidate: String,
    /// Similarity in `[0, 100]`.
    pub score: f64,
}

/// Score `candidates` against `question`, keeping those at or above [`SCORE_CUTOFF`].
///
/// Results are ordered by descending score; equal scores keep candidate order. At most
/// [`MATCH_LIMIT`] matches are returned.
pub fn rank(question: &str, candidates: &[String], scorer: &dyn SimilarityScorer) -> Vec<Match> {
    let mut matches: Vec<Match> = candidates
        .iter()
        .map(|candidate| Match {
            score: scorer.score(question, candidate),
            candidate: candidate.clone(),
        })
        .filter(|found| found.score >= SCORE_CUTOFF)
        .collect();
    // Stable sort keeps original order for ties.
    matches.sort_by(|left, right| right.score.total_cmp(&left.score));
    matches.truncate(MATCH_LIMIT);
    matches
}

/// How the local tier arrived at its English text.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalDraft {
    /// Neither contract text nor summary was available.
    NoText(String),
    /// A keyword topic matched and lines were found.
    Routed {
        /// Topic that answered the question.
        topic: Topic,
        /// Answer text.
        text: String,
    },
    /// No candidate cleared the similarity cutoff.
    NoMatch(String),
    /// Ranked matches composed into an answer.
    Composed {
        /// Matches backing the answer, best first.
        matches: Vec<Match>,
        /// Answer text.
        text: String,
    },
}

impl LocalDraft {
    /// English answer text.
    pub fn text(&self) -> &str {
        match self {
            Self::NoText(text) | Self::NoMatch(text) => text,
            Self::Routed { text, .. } | Self::Composed { text, .. } => text,
        }
    }

    /// Consume the draft, returning its text.
    pub fn into_text(self) -> String {
        match self {
            Self::NoText(text) | Self::NoMatch(text) => text,
            Self::Routed { text, .. } | Self::Composed { text, .. } => text,
        }
    }
}

/// Local question answering over contract text and summary bullets.
#[derive(Clone)]
pub struct LocalAnswerer {
    scorer: Arc<dyn SimilarityScorer>,
    translator: Capability<Arc<dyn Translator>>,
}

impl LocalAnswerer {
    /// Create an answerer with an injected scorer and optional translator.
    pub fn new(
        scorer: Arc<dyn SimilarityScorer>,
        translator: Capability<Arc<dyn Translator>>,
    ) -> Self {
        Self { scorer, translator }
    }

    /// Answer `question`; composed answers get a Hindi rendition appended when `bilingual`.
    pub async fn answer(
        &self,
        question: &str,
        text: &str,
        summary: &[String],
        bilingual: bool,
    ) -> String {
        let draft = self.draft(question, text, summary);
        match draft {
            LocalDraft::Composed { text, .. } if bilingual => {
                append_translation(&self.translator, text).await
            }
            other => other.into_text(),
        }
    }

    /// Build the English answer without translation.
    pub fn draft(&self, question: &str, text: &str, summary: &[String]) -> LocalDraft {
        let combined = combined_text(text, summary);
        if combined.is_empty() {
            return LocalDraft::NoText(NO_TEXT_MESSAGE.to_string());
        }

        if let Some(topic) = routing::classify(question) {
            let lines = routing::topic_lines(topic, &combined, ROUTED_LINE_LIMIT);
            if !lines.is_empty() {
                tracing::debug!(topic = topic.name(), lines = lines.len(), "Answered by keyword routing");
                return LocalDraft::Routed {
                    topic,
                    text: routed_answer(topic, &lines, summary),
                };
            }
            tracing::debug!(topic = topic.name(), "No topic lines found; using fuzzy retrieval");
        }

        let candidates = candidates::index(text, summary);
        let matches = rank(question, &candidates, self.scorer.as_ref());
        tracing::debug!(
            candidates = candidates.len(),
            matches = matches.len(),
            "Fuzzy retrieval finished"
        );
        if matches.is_empty() {
            return LocalDraft::NoMatch(no_match_answer(question, summary));
        }

        let text = composed_answer(&matches, summary);
        LocalDraft::Composed { matches, text }
    }
}

/// Append a Hindi translation of `english`, returning `english` unchanged if translation fails.
pub(crate) async fn append_translation(
    translator: &Capability<Arc<dyn Translator>>,
    english: String,
) -> String {
    let Some(translator) = translator.as_available() else {
        tracing::debug!("Bilingual answer requested but translation is unavailable");
        return english;
    };
    match translator.translate(&english, "en", "hi").await {
        Ok(hindi) => format!("{english}{TRANSLATION_SEPARATOR}{hindi}"),
        Err(error) => {
            tracing::warn!(error = %error, "Translation failed; returning English answer");
            english
        }
    }
}

fn bullets<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    items.into_iter().map(|item| format!("• {item}")).collect()
}

fn summary_bullets(summary: &[String], limit: usize) -> Vec<String> {
    bullets(summary.iter().take(limit).map(String::as_str))
}

fn routed_answer(topic: Topic, lines: &[String], summary: &[String]) -> String {
    let mut answer = format!(
        "Based on the contract analysis, here's what I found about {}:\n\n",
        topic.name()
    );
    answer.push_str(&bullets(lines.iter().map(String::as_str)).join("\n"));
    if !summary.is_empty() {
        answer.push_str("\n\nKey contract summary:\n");
        answer.push_str(&summary_bullets(summary, ROUTED_SUMMARY_LIMIT).join("\n"));
    }
    answer
}

fn no_match_answer(question: &str, summary: &[String]) -> String {
    let lead = format!("I couldn't find a direct answer to '{question}' in the contract text.");
    if summary.is_empty() {
        format!(
            "{lead} Please try rephrasing your question or ask about specific terms mentioned in the contract."
        )
    } else {
        format!(
            "{lead} However, here are the key points from the contract summary:\n\n{}",
            summary_bullets(summary, NO_MATCH_SUMMARY_LIMIT).join("\n")
        )
    }
}

fn composed_answer(matches: &[Match], summary: &[String]) -> String {
    let mut lines = vec!["Answer (based on contract analysis):".to_string()];
    lines.extend(bullets(
        matches
            .iter()
            .take(ANSWER_SNIPPETS)
            .map(|found| found.candidate.as_str()),
    ));
    if !summary.is_empty() {
        lines.push(String::new());
        lines.push("Key contract points:".to_string());
        lines.extend(summary_bullets(summary, COMPOSED_SUMMARY_LIMIT));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::similarity::TokenSetRatio;
    use crate::capability::CapabilityError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTranslator {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingTranslator {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl Translator for CountingTranslator {
        async fn translate(
            &self,
            text: &str,
            source: &str,
            target: &str,
        ) -> Result<String, CapabilityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!((source, target), ("en", "hi"));
            if self.fail {
                Err(CapabilityError::Unavailable("offline".into()))
            } else {
                Ok(format!("[hi] {}", text.lines().next().unwrap_or_default()))
            }
        }
    }

    struct LengthScorer;

    impl SimilarityScorer for LengthScorer {
        fn score(&self, _query: &str, candidate: &str) -> f64 {
            candidate.len() as f64
        }
    }

    fn answerer() -> LocalAnswerer {
        LocalAnswerer::new(Arc::new(TokenSetRatio), Capability::Unavailable)
    }

    const LEASE: &str = "RESIDENTIAL LEASE AGREEMENT\n\
        The tenant shall maintain the premises in good condition.\n\
        Payment: $500 per month\n\
        Pets are not allowed on the property.";

    #[tokio::test]
    async fn payment_question_routes_to_payment_lines() {
        let answer = answerer()
            .answer("What is the monthly payment?", LEASE, &[], false)
            .await;
        assert!(answer.starts_with("Based on the contract analysis, here's what I found about payment:"));
        assert!(answer.contains("• Payment: $500 per month"));
        assert!(!answer.contains("Key contract summary"));
    }

    #[tokio::test]
    async fn routed_answer_appends_three_summary_points() {
        let summary: Vec<String> = (1..=5).map(|i| format!("Point {i}")).collect();
        let answer = answerer()
            .answer("How much is the payment?", LEASE, &summary, false)
            .await;
        assert!(answer.contains("\n\nKey contract summary:\n• Point 1\n• Point 2\n• Point 3"));
        assert!(!answer.contains("Point 4"));
    }

    #[tokio::test]
    async fn topic_without_lines_falls_through_to_fuzzy_retrieval() {
        let text = "The tenant shall maintain the premises in good condition.";
        let draft = answerer().draft("When does the tenant notice period end?", text, &[]);
        assert!(!matches!(draft, LocalDraft::Routed { .. }));
    }

    #[tokio::test]
    async fn fuzzy_retrieval_composes_top_matches() {
        let draft = answerer().draft("Are pets allowed on the property?", LEASE, &[]);
        let LocalDraft::Composed { matches, text } = draft else {
            panic!("expected a composed answer");
        };
        assert_eq!(matches[0].candidate, "Pets are not allowed on the property");
        assert!(text.starts_with("Answer (based on contract analysis):\n• Pets are not allowed on the property"));
    }

    #[tokio::test]
    async fn composed_answer_uses_only_three_of_five_matches() {
        let text = (1..=6)
            .map(|i| format!("Alpha beta gamma delta {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let summary: Vec<String> = (1..=5).map(|i| format!("Zq{i}")).collect();

        let LocalDraft::Composed { matches, text } =
            answerer().draft("alpha beta gamma delta?", &text, &summary)
        else {
            panic!("expected a composed answer");
        };

        assert_eq!(matches.len(), MATCH_LIMIT);
        assert_eq!(text.matches("• Alpha").count(), ANSWER_SNIPPETS);
        assert!(text.contains("• Alpha beta gamma delta 3"));
        assert!(!text.contains("Alpha beta gamma delta 4"));
        assert!(text.ends_with("Key contract points:\n• Zq1\n• Zq2\n• Zq3"));
    }

    #[tokio::test]
    async fn composed_answer_lists_key_points() {
        let summary = vec!["Parties: Landlord and Tenant".to_string()];
        let answer = answerer()
            .answer("Are pets allowed on the property?", LEASE, &summary, false)
            .await;
        assert!(answer.contains("\n\nKey contract points:\n• Parties: Landlord and Tenant"));
    }

    #[tokio::test]
    async fn unmatched_question_without_summary_suggests_rephrasing() {
        let answer = answerer().answer("Zebra?", "This clause applies.", &[], false).await;
        assert_eq!(
            answer,
            "I couldn't find a direct answer to 'Zebra?' in the contract text. Please try rephrasing your question or ask about specific terms mentioned in the contract."
        );
    }

    #[tokio::test]
    async fn unmatched_question_falls_back_to_summary_points() {
        let summary: Vec<String> = (1..=7).map(|i| format!("Zq{i}")).collect();
        let answer = answerer()
            .answer("Xylophone?", "Governing law is Delaware.", &summary, false)
            .await;
        assert!(answer.starts_with("I couldn't find a direct answer to 'Xylophone?' in the contract text. However, here are the key points from the contract summary:\n\n• Zq1"));
        assert!(answer.contains("• Zq5"));
        assert!(!answer.contains("Zq6"));
    }

    #[tokio::test]
    async fn empty_inputs_report_missing_text() {
        let answer = answerer().answer("Anything?", "  ", &[], true).await;
        assert_eq!(answer, NO_TEXT_MESSAGE);
    }

    #[tokio::test]
    async fn bilingual_answer_appends_translation() {
        let translator = CountingTranslator::new(false);
        let answerer = LocalAnswerer::new(
            Arc::new(TokenSetRatio),
            Capability::Available(translator.clone() as Arc<dyn Translator>),
        );
        let question = "How should the tenant maintain the premises in Hindi?";
        let english = answerer.draft(question, LEASE, &[]).into_text();
        let answer = answerer.answer(question, LEASE, &[], true).await;

        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            answer,
            format!("{english}\n\n—\n\n[hi] Answer (based on contract analysis):")
        );
    }

    #[tokio::test]
    async fn translation_failure_returns_english_only() {
        let translator = CountingTranslator::new(true);
        let answerer = LocalAnswerer::new(
            Arc::new(TokenSetRatio),
            Capability::Available(translator.clone() as Arc<dyn Translator>),
        );
        let question = "How should the tenant maintain the premises in Hindi?";
        let english = answerer.draft(question, LEASE, &[]).into_text();
        let answer = answerer.answer(question, LEASE, &[], true).await;

        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(answer, english);
    }

    #[test]
    fn rank_breaks_ties_by_candidate_order_and_limits_results() {
        let candidates: Vec<String> = ["aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb", "short", "cccccccccccccccccccccccccccccccccccccccccccccccccc"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ranked = rank("q", &candidates, &LengthScorer);
        let order: Vec<&str> = ranked.iter().map(|m| &m.candidate[..1]).collect();
        assert_eq!(order, vec!["c", "a", "b"]);

        let many: Vec<String> = (0..8).map(|i| format!("{i}{}", "x".repeat(60))).collect();
        let ranked = rank("q", &many, &LengthScorer);
        assert_eq!(ranked.len(), MATCH_LIMIT);
        assert!(ranked[0].candidate.starts_with('0'));
    }
}
