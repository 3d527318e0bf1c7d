use super::Source;

/// Best-effort descriptive metadata for one book.
///
/// Every field may be empty; an entirely empty value with
/// [`Source::None`] is what a failed extraction looks like.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Metadata {
    pub title: String,
    /// Free-text author as found, e.g. "Jane Doe" or "Doe, Jane".
    pub author: String,
    /// Subjects or genres, in document order.
    pub tags: Vec<String>,
    /// Bounded to 500 characters when read from embedded metadata.
    pub description: String,
    pub source: Source,
}
impl Metadata {
    /// Empty metadata attributed to `source`.
    pub fn from_source(source: Source) -> Self {
        Self { source, ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.author.is_empty() && self.tags.is_empty() && self.description.is_empty()
    }
}
