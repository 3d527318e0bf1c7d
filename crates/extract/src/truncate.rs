//! Character-bounded truncation for free-text metadata.

/// Truncates `text` to at most `max_chars` Unicode scalar values.
///
/// Counts characters, not bytes, so multi-byte text is never split inside a
/// code point.
///
/// # Examples
///
/// ```rust
/// # use shelver_extract::truncate_chars;
/// assert_eq!(truncate_chars("Hello World", 5), "Hello");
/// assert_eq!(truncate_chars("café", 4), "café");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_truncation_needed() {
        assert_eq!(truncate_chars("short", 500), "short");
    }

    #[test]
    fn exact_length_is_kept() {
        let text = "a".repeat(500);
        assert_eq!(truncate_chars(&text, 500), text);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "é".repeat(600);
        let result = truncate_chars(&text, 500);
        assert_eq!(result.chars().count(), 500);
        assert_eq!(result.len(), 1000);
    }

    #[test]
    fn empty_and_zero() {
        assert_eq!(truncate_chars("", 10), "");
        assert_eq!(truncate_chars("anything", 0), "");
    }
}
