use epub::doc::EpubDoc;
use exn::ResultExt;
use std::path::Path;
use tracing::instrument;

use crate::consts::DESCRIPTION_MAX_CHARS;
use crate::error::{ErrorKind, Result};
use crate::models::{Format, Metadata, Source};
use crate::truncate_chars;

/// Dublin Core metadata from the OPF package document.
///
/// Reads the first `title`, `creator` and `description`, and every
/// `subject` as a tag.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub(crate) fn read(path: &Path) -> Result<Metadata> {
    let doc = EpubDoc::new(path).or_raise(|| ErrorKind::Unreadable(Format::Epub))?;
    let first = |property: &str| doc.mdata(property).map(|item| item.value.trim().to_string()).unwrap_or_default();
    let tags = doc
        .metadata
        .iter()
        .filter(|item| item.property == "subject")
        .map(|item| item.value.trim().to_string())
        .filter(|subject| !subject.is_empty())
        .collect();
    Ok(Metadata {
        title: first("title"),
        author: first("creator"),
        tags,
        description: truncate_chars(&first("description"), DESCRIPTION_MAX_CHARS),
        source: Source::Epub,
    })
}
