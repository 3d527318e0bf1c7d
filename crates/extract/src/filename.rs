//! Metadata guessed from conventional download names such as
//! `"Jane Doe - My Novel [EPUB].epub"`.

use std::path::Path;

use crate::consts::{BRACKETED_REGEX, FILENAME_SEPARATOR};
use crate::models::{Metadata, Source};

/// Author and title parsed from a file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Guess {
    pub author: String,
    pub title: String,
}

/// With at least one `" - "` separator the first segment is the author and
/// the last is the title, minus any `[...]` groups. Otherwise the whole stem
/// is the title and the author is unknown.
pub(crate) fn guess(path: &Path) -> Guess {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let parts: Vec<&str> = stem.split(FILENAME_SEPARATOR).collect();
    match parts.as_slice() {
        [author, .., title] => Guess {
            author: author.trim().to_string(),
            title: BRACKETED_REGEX.replace_all(title.trim(), "").trim().to_string(),
        },
        _ => Guess { author: String::new(), title: stem },
    }
}

/// Fill whichever of title and author is still empty from the filename.
///
/// Metadata that had no provenance at all is attributed to the filename.
pub(crate) fn fill(metadata: &mut Metadata, path: &Path) {
    let Guess { author, title } = guess(path);
    if metadata.title.is_empty() {
        metadata.title = title;
    }
    if metadata.author.is_empty() {
        metadata.author = author;
    }
    if metadata.source.is_none() {
        metadata.source = Source::Filename;
    }
}
