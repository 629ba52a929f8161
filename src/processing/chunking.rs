//! Fixed-size character windows with overlap.
//!
//! Contracts are split into windows of at most `max_chars` characters before they are handed to a
//! generation provider. Adjacent windows share `overlap` characters so clauses that straddle a
//! boundary stay visible to both calls. Sizes are counted in Unicode scalar values, never bytes,
//! so windows always end on a character boundary.

use super::types::ChunkingError;

/// A window of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Character offset of the first character of the window in the source text.
    pub start: usize,
    /// Window contents.
    pub text: String,
}

impl Chunk {
    /// Number of characters held by the window.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split `text` into overlapping windows of at most `max_chars` characters.
///
/// Windows advance by `max_chars - overlap`; when `overlap >= max_chars` the step is clamped to one
/// character so the loop always makes progress. Empty input produces no windows.
pub fn split_text(
    text: &str,
    max_chars: usize,
    overlap: usize,
) -> Result<Vec<Chunk>, ChunkingError> {
    if max_chars == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }

    // Byte offset of every character, plus the end of the string.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = boundaries.len() - 1;
    let step = max_chars.saturating_sub(overlap).max(1);

    let mut chunks = Vec::with_capacity(total / step + 1);
    let mut start = 0;
    loop {
        let end = (start + max_chars).min(total);
        chunks.push(Chunk {
            start,
            text: text[boundaries[start]..boundaries[end]].to_string(),
        });
        if end == total {
            break;
        }
        start += step;
    }

    Ok(chunks)
}

/// Convenience wrapper returning only the window strings.
pub fn split_text_by_length(
    text: &str,
    max_chars: usize,
    overlap: usize,
) -> Result<Vec<String>, ChunkingError> {
    Ok(split_text(text, max_chars, overlap)?
        .into_iter()
        .map(|chunk| chunk.text)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(chunks: &[Chunk]) -> String {
        let mut rebuilt = String::new();
        let mut covered: usize = 0;
        for chunk in chunks {
            let skip = covered.saturating_sub(chunk.start);
            rebuilt.extend(chunk.text.chars().skip(skip));
            covered = covered.max(chunk.start + chunk.char_len());
        }
        rebuilt
    }

    #[test]
    fn empty_text_produces_no_chunks() {
        assert!(split_text("", 10, 2).unwrap().is_empty());
        assert!(split_text("", 1, 5).unwrap().is_empty());
    }

    #[test]
    fn rejects_zero_window() {
        let error = split_text("hello", 0, 0).unwrap_err();
        assert!(matches!(error, ChunkingError::InvalidChunkSize));
    }

    #[test]
    fn windows_advance_by_size_minus_overlap() {
        let chunks = split_text_by_length("abcdefghij", 4, 1).unwrap();
        assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);
    }

    #[test]
    fn final_window_may_be_short() {
        let chunks = split_text("abcdefgh", 5, 2).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].start, 3);
        assert_eq!(chunks[1].text, "defgh");

        let chunks = split_text("abcdefghi", 5, 1).unwrap();
        assert_eq!(chunks.last().unwrap().text, "efghi");
    }

    #[test]
    fn short_text_fits_in_one_window() {
        let chunks = split_text("short", 100, 10).unwrap();
        assert_eq!(
            chunks,
            vec![Chunk {
                start: 0,
                text: "short".into()
            }]
        );
    }

    #[test]
    fn coverage_reconstructs_source_exactly() {
        let text = "The Contractor shall deliver the goods within 30 days. Payment: $500 per month. \
                    Either party may terminate with notice.";
        for (max_chars, overlap) in [(7, 0), (10, 3), (16, 15), (50, 10), (500, 40)] {
            let chunks = split_text(text, max_chars, overlap).unwrap();
            assert!(chunks.iter().all(|chunk| chunk.char_len() <= max_chars));
            assert!(chunks.iter().all(|chunk| !chunk.text.is_empty()));
            assert_eq!(reconstruct(&chunks), text, "max={max_chars} overlap={overlap}");
        }
    }

    #[test]
    fn degenerate_overlap_still_terminates() {
        let text = "a contract with a degenerate overlap";
        let chunks = split_text(text, 10, 10).unwrap();
        assert!(!chunks.is_empty());
        assert_eq!(chunks.len(), text.chars().count() - 10 + 1);
        assert_eq!(reconstruct(&chunks), text);

        let chunks = split_text(text, 10, 25).unwrap();
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "हिंदी में उत्तर";
        let chunks = split_text(text, 4, 1).unwrap();
        assert!(chunks.iter().all(|chunk| chunk.char_len() <= 4));
        assert_eq!(reconstruct(&chunks), text);
    }
}
