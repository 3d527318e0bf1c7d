mod consts;
mod container;
pub mod error;
mod filename;
pub mod models;
mod truncate;

use std::path::Path;
use tracing::instrument;

use crate::models::{Format, Metadata};
pub use crate::models::is_supported;
pub use crate::truncate::truncate_chars;

/// Easy, top-level entrypoint for extracting [`Metadata`] from a book file.
///
/// - EPUB and PDF files have their embedded metadata read first,
/// - any title or author still missing is guessed from the filename.
///
/// This never fails. A container that cannot be read is logged and treated
/// as having no embedded metadata, so the worst case is a filename guess.
/// The function blocks on file I/O; async callers should run it through
/// [`spawn_blocking`](https://docs.rs/tokio/latest/tokio/task/fn.spawn_blocking.html).
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn extract(path: impl AsRef<Path>) -> Metadata {
    let path = path.as_ref();
    let embedded = match Format::from_path(path) {
        Some(Format::Epub) => container::epub::read(path),
        Some(Format::Pdf) => container::pdf::read(path),
        _ => Ok(Metadata::default()),
    };
    let mut metadata = embedded.unwrap_or_else(|error| {
        tracing::warn!(error = ?error, "Embedded metadata extraction failed");
        Metadata::default()
    });
    if metadata.title.is_empty() || metadata.author.is_empty() {
        filename::fill(&mut metadata, path);
    }
    tracing::debug!(title = %metadata.title, author = %metadata.author, source = %metadata.source, "Extracted metadata");
    metadata
}
