use exn::ResultExt;
use lopdf::{Dictionary, Document, Object, decode_text_string};
use std::path::Path;
use tracing::instrument;

use crate::consts::DESCRIPTION_MAX_CHARS;
use crate::error::{ErrorKind, Result};
use crate::models::{Format, Metadata, Source};
use crate::truncate_chars;

/// Fields of the document information dictionary (`/Info` in the trailer).
///
/// `Subject` becomes the description. PDFs carry no tags. A PDF without an
/// information dictionary still counts as read: the result is empty but
/// attributed to [`Source::Pdf`].
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub(crate) fn read(path: &Path) -> Result<Metadata> {
    let document = Document::load(path).or_raise(|| ErrorKind::Unreadable(Format::Pdf))?;
    let info = match document.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => document.get_dictionary(*id).or_raise(|| ErrorKind::MissingField("Info"))?,
        Ok(Object::Dictionary(info)) => info,
        _ => return Ok(Metadata::from_source(Source::Pdf)),
    };
    Ok(Metadata {
        title: text(&document, info, "Title")?,
        author: text(&document, info, "Author")?,
        tags: Vec::new(),
        description: truncate_chars(&text(&document, info, "Subject")?, DESCRIPTION_MAX_CHARS),
        source: Source::Pdf,
    })
}

fn text(document: &Document, info: &Dictionary, key: &'static str) -> Result<String> {
    let value = match info.get(key.as_bytes()) {
        Ok(Object::Reference(id)) => document.get_object(*id).or_raise(|| ErrorKind::Undecodable(key))?,
        Ok(value) => value,
        Err(_) => return Ok(String::new()),
    };
    Ok(decode_text_string(value).or_raise(|| ErrorKind::Undecodable(key))?.trim().to_string())
}
