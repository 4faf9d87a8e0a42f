/// Character budget applied to extracted text before it is sent to a model.
pub const MAX_CHARS: usize = 3_000;

/// Cuts `text` down to at most `limit` characters.
///
/// Counts `char`s rather than bytes so multi-byte scripts are never split
/// mid code point. No attempt is made to respect word or sentence boundaries.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
