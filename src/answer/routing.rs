//! Keyword routing for the most common contract questions.
//!
//! Questions about payment, duration, or termination are answered by scanning contract lines for
//! topic vocabulary instead of fuzzy matching. Matching is plain substring search on lower-cased
//! text, so short terms such as `pay` or `end` also match inside longer words.

/// A question category with its own vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    /// Salary, fees, and amounts owed.
    Payment,
    /// Contract term and periods.
    Duration,
    /// Ending the agreement and notice requirements.
    Termination,
}

impl Topic {
    /// Topics in the order they are checked.
    pub const ALL: [Topic; 3] = [Topic::Payment, Topic::Duration, Topic::Termination];

    /// Name used in routed answers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Duration => "duration",
            Self::Termination => "termination",
        }
    }

    fn question_terms(self) -> &'static [&'static str] {
        match self {
            Self::Payment => &["salary", "payment", "pay", "money", "amount"],
            Self::Duration => &["duration", "length", "time", "period", "months", "years"],
            Self::Termination => &["termination", "end", "cancel", "notice"],
        }
    }

    fn line_terms(self) -> &'static [&'static str] {
        match self {
            Self::Payment => &[
                "salary",
                "payment",
                "pay",
                "dollar",
                "$",
                "amount",
                "per year",
                "per month",
            ],
            Self::Duration => &[
                "duration",
                "length",
                "time",
                "period",
                "months",
                "years",
                "12 months",
                "30 days",
            ],
            Self::Termination => &[
                "termination",
                "end",
                "cancel",
                "notice",
                "30 days",
                "terminate",
            ],
        }
    }

    /// Whether `line` mentions this topic's vocabulary.
    pub fn matches_line(self, line: &str) -> bool {
        contains_any(&line.to_lowercase(), self.line_terms())
    }
}

/// Pick the first topic whose question vocabulary appears in `question`.
pub fn classify(question: &str) -> Option<Topic> {
    let lowered = question.to_lowercase();
    Topic::ALL
        .into_iter()
        .find(|topic| contains_any(&lowered, topic.question_terms()))
}

/// Trimmed lines of `text` mentioning `topic`, in document order, at most `limit`.
pub fn topic_lines(topic: Topic, text: &str, limit: usize) -> Vec<String> {
    text.lines()
        .filter(|line| topic.matches_line(line))
        .map(|line| line.trim().to_string())
        .take(limit)
        .collect()
}

fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| haystack.contains(term))
}
