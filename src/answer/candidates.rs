//! Breaks contract text into short clause-like statements for fuzzy matching.

use std::collections::HashSet;

/// Fragments shorter than this (after trimming) are noise such as numbering or initials.
pub const MIN_CANDIDATE_CHARS: usize = 6;

const BULLET: char = '\u{2022}';

/// Join summary bullets and contract text into one newline-separated body, summary first.
pub fn combined_text(text: &str, summary: &[String]) -> String {
    format!("{}\n{}", summary.join("\n"), text)
        .trim()
        .to_string()
}

/// Build the ordered, deduplicated candidate list for `text` and `summary`.
///
/// Each line is split on `.` (with `;` treated as `.` and bullet glyphs removed). Fragments of at
/// least [`MIN_CANDIDATE_CHARS`] characters are kept; the first occurrence of a duplicate wins.
pub fn index(text: &str, summary: &[String]) -> Vec<String> {
    let combined = combined_text(text, summary);
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for line in combined.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let normalized = line.replace(';', ".").replace(BULLET, " ");
        for fragment in normalized.split('.').map(str::trim) {
            if fragment.chars().count() < MIN_CANDIDATE_CHARS {
                continue;
            }
            if seen.insert(fragment.to_string()) {
                candidates.push(fragment.to_string());
            }
        }
    }

    candidates
}
