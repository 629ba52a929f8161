//! Helpers for normalizing request values before they reach the pipeline.

/// Name assumed for uploads that arrive without a file name.
pub const DEFAULT_UPLOAD_NAME: &str = "document";

/// Sanitize arbitrary string input by trimming whitespace and dropping empties.
pub(crate) fn sanitize_string(value: Option<String>) -> Option<String> {
    value.and_then(|input| {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Lower-cased text after the last `.` of `filename`; the whole name when it has no dot.
pub fn upload_extension(filename: Option<&str>) -> String {
    let name = filename
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_UPLOAD_NAME);
    name.rsplit('.').next().unwrap_or_default().to_lowercase()
}

/// Trim a client-supplied document id.
pub fn sanitize_document_id(value: &str) -> String {
    sanitize_string(Some(value.to_string())).unwrap_or_default()
}
