//! Keyword-in-context search over a stored contract.

/// Characters of context kept on each side of a hit.
pub const DEFAULT_CONTEXT_CHARS: usize = 120;

/// One occurrence of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// Character offset of the occurrence in the source text.
    pub index: usize,
    /// Occurrence with surrounding context.
    pub snippet: String,
}

/// Find non-overlapping, case-insensitive occurrences of `query` in `text`.
///
/// Each hit carries up to `window` characters of context on both sides. Offsets and windows are
/// counted in characters. A blank query matches nothing.
pub fn find_matches(text: &str, query: &str, window: usize) -> Vec<SearchMatch> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let original: Vec<char> = text.chars().collect();
    let haystack: Vec<char> = original.iter().copied().map(fold_case).collect();
    let needle: Vec<char> = query.chars().map(fold_case).collect();

    let mut matches = Vec::new();
    let mut position = 0;
    while position + needle.len() <= haystack.len() {
        if haystack[position..position + needle.len()] != needle[..] {
            position += 1;
            continue;
        }
        let start = position.saturating_sub(window);
        let end = (position + needle.len() + window).min(original.len());
        matches.push(SearchMatch {
            index: position,
            snippet: original[start..end].iter().collect(),
        });
        position += needle.len();
    }
    matches
}

/// Snippets for every hit of `query`, in document order.
pub fn snippets(text: &str, query: &str) -> Vec<String> {
    find_matches(text, query, DEFAULT_CONTEXT_CHARS)
        .into_iter()
        .map(|found| found.snippet)
        .collect()
}

// Single-character folding keeps offsets aligned with the source text.
fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
