//! Turning free-text metadata into single path segments.

/// Longest segment (in bytes) derived from metadata. Most filesystems cap a
/// name at 255 bytes; the rest is headroom for `_n` suffixes.
pub(crate) const MAX_SEGMENT_BYTES: usize = 200;

/// Formats an author as a "Last, First" directory name.
///
/// - blank → `placeholder`
/// - already contains a comma → unchanged (assumed "Last, First")
/// - a single word → unchanged
/// - otherwise the last word moves to the front: `"Jane Q. Public"` → `"Public, Jane Q."`
pub(crate) fn author_folder(author: &str, placeholder: &str) -> String {
    let author = author.trim();
    if author.is_empty() {
        return placeholder.to_string();
    }
    if author.contains(',') {
        return author.to_string();
    }
    let words: Vec<&str> = author.split_whitespace().collect();
    match words.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{last}, {}", rest.join(" ")),
        _ => author.to_string(),
    }
}

/// Makes `raw` safe to use as one path segment of at most `max_bytes`.
///
/// Separators and control characters become `_`, surrounding whitespace is
/// dropped and the result is cut at a character boundary. Returns `None`
/// when nothing usable remains.
pub(crate) fn sanitize_segment(raw: &str, max_bytes: usize) -> Option<String> {
    let replaced: String =
        raw.chars().map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c }).collect();
    let segment = truncate_to_char_boundary(replaced.trim(), max_bytes).trim_end();
    match segment {
        "" | "." | ".." => None,
        segment => Some(segment.to_string()),
    }
}

fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    &s[..s.floor_char_boundary(max_bytes)]
}
