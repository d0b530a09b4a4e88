use std::borrow::Cow;

/// Appended to a preview whenever the source text was cut.
pub const TRUNCATION_MARKER: &str = "...";

/// Bound `text` to at most `max_chars` characters.
///
/// Counts Unicode scalar values, not bytes, so multi-byte text is never split
/// inside a character. The marker is appended if and only if something was cut.
pub fn truncate_preview(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut preview = String::with_capacity(byte_index + TRUNCATION_MARKER.len());
            preview.push_str(&text[..byte_index]);
            preview.push_str(TRUNCATION_MARKER);
            Cow::Owned(preview)
        }
        None => Cow::Borrowed(text),
    }
}
