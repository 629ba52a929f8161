use super::{DocumentFormat, ExtractionError};

/// Read a DOCX upload and join its non-empty paragraphs with newlines.
pub(crate) fn extract_paragraphs(bytes: &[u8]) -> Result<String, ExtractionError> {
    let raw = docx_lite::extract_text_from_bytes(bytes).map_err(|error| {
        ExtractionError::Malformed {
            format: DocumentFormat::Docx,
            message: error.to_string(),
        }
    })?;
    Ok(join_paragraphs(&raw))
}

fn join_paragraphs(raw: &str) -> String {
    raw.lines()
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
