/// Decode plain-text uploads as UTF-8, falling back to Latin-1 so decoding never fails.
pub(crate) fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(error) => {
            tracing::debug!(
                valid_up_to = error.valid_up_to(),
                "Upload is not UTF-8; decoding as Latin-1"
            );
            bytes.iter().map(|&byte| char::from(byte)).collect()
        }
    }
}
