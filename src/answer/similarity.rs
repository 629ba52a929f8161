//! Order-insensitive token-set similarity on a 0–100 scale.
//!
//! Both strings are lower-cased, non-alphanumeric characters become separators, and the resulting
//! word sets are compared. The score is the best of three Indel ratios: the shared words plus the
//! words unique to each side compared against each other, and the shared words compared against
//! either side. A string whose words are a subset of the other's scores 100.

use std::collections::BTreeSet;

/// Scores how well a candidate statement matches a question.
pub trait SimilarityScorer: Send + Sync {
    /// Similarity in `[0, 100]`.
    fn score(&self, query: &str, candidate: &str) -> f64;
}

/// [`token_set_ratio`] as a [`SimilarityScorer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetRatio;

impl SimilarityScorer for TokenSetRatio {
    fn score(&self, query: &str, candidate: &str) -> f64 {
        token_set_ratio(query, candidate)
    }
}

/// Token-set similarity between `left` and `right`, in `[0, 100]`.
///
/// Case and punctuation never affect the score: `"PAYMENT?"` and `"payment."` are identical, which
/// keeps questions typed in any case matching clauses such as `"Payment: $500"`.
pub fn token_set_ratio(left: &str, right: &str) -> f64 {
    let left = tokens(left);
    let right = tokens(right);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared: Vec<&str> = left.intersection(&right).map(String::as_str).collect();
    let only_left: Vec<&str> = left.difference(&right).map(String::as_str).collect();
    let only_right: Vec<&str> = right.difference(&left).map(String::as_str).collect();

    if !shared.is_empty() && (only_left.is_empty() || only_right.is_empty()) {
        return 100.0;
    }

    let diff_left = only_left.join(" ");
    let diff_right = only_right.join(" ");
    let left_len = diff_left.chars().count();
    let right_len = diff_right.chars().count();
    let shared_len = shared.join(" ").chars().count();
    let separator = usize::from(shared_len > 0);
    let shared_left_len = shared_len + separator + left_len;
    let shared_right_len = shared_len + separator + right_len;

    // shared+left vs shared+right only differ in their unique parts.
    let distance = indel_distance(&diff_left, &diff_right);
    let result = normalized_score(distance, shared_left_len + shared_right_len);
    if shared_len == 0 {
        return result;
    }

    let shared_vs_left = normalized_score(separator + left_len, shared_len + shared_left_len);
    let shared_vs_right = normalized_score(separator + right_len, shared_len + shared_right_len);
    result.max(shared_vs_left).max(shared_vs_right)
}

fn tokens(text: &str) -> BTreeSet<String> {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn normalized_score(distance: usize, total_len: usize) -> f64 {
    if total_len == 0 {
        return 100.0;
    }
    100.0 - 100.0 * distance as f64 / total_len as f64
}

/// Insertions plus deletions needed to turn `a` into `b`.
fn indel_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    a.len() + b.len() - 2 * longest_common_subsequence(&a, &b)
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for &left in a {
        for (j, &right) in b.iter().enumerate() {
            current[j + 1] = if left == right {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn identical_and_reordered_strings_score_full() {
        assert_close(token_set_ratio("fuzzy wuzzy was a bear", "wuzzy fuzzy was a bear"), 100.0);
        assert_close(token_set_ratio("Payment terms", "payment TERMS!"), 100.0);
    }

    #[test]
    fn subset_of_words_scores_full() {
        assert_close(
            token_set_ratio("termination notice", "Termination requires 30 days notice"),
            100.0,
        );
    }

    #[test]
    fn partial_overlap_scores_between_bounds() {
        let score = token_set_ratio(
            "How should the tenant maintain the premises in Hindi?",
            "The tenant shall maintain the premises in good condition",
        );
        assert!(score >= 100.0 - 100.0 * 17.0 / 79.0, "score {score}");
        assert!(score < 100.0, "score {score}");
    }

    #[test]
    fn unrelated_strings_score_low() {
        assert!(token_set_ratio("Zebra?", "This clause applies") < 45.0);
        assert!(token_set_ratio("quantum chromodynamics", "Payment: $500 per month") < 45.0);
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_close(token_set_ratio("", "anything"), 0.0);
        assert_close(token_set_ratio("?!", "anything"), 0.0);
    }

    #[test]
    fn indel_distance_counts_insertions_and_deletions() {
        assert_eq!(indel_distance("", "abc"), 3);
        assert_eq!(indel_distance("abc", "abc"), 0);
        assert_eq!(indel_distance("kitten", "sitting"), 5);
    }
}
