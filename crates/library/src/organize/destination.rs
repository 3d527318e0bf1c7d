use crate::Layout;
use crate::error::{ErrorKind, Result};
use crate::naming::{MAX_SEGMENT_BYTES, author_folder, sanitize_segment};
use crate::organize::conflict::first_free;
use exn::ResultExt;
use shelver_classify::Category;
use shelver_extract::models::Metadata;
use shelver_storage::{BackendHandle, validate_path};
use std::path::{Path, PathBuf};

/// Directory a book belongs in: `<library>/<category>`, plus a formatted
/// author directory when [`Layout::author_folders`] is set.
pub fn directory(library: &Path, category: Category, author: &str, layout: &Layout) -> Result<PathBuf> {
    let mut relative = PathBuf::from(category.as_str());
    if layout.author_folders {
        let folder = sanitize_segment(&author_folder(author, &layout.unknown_author), MAX_SEGMENT_BYTES)
            .unwrap_or_else(|| layout.unknown_author.clone());
        relative.push(folder);
    }
    let relative = validate_path(&relative).or_raise(|| ErrorKind::InvalidDestination(relative.clone()))?;
    Ok(library.join(relative))
}

/// Name the book is stored under: `<title><.ext>` when
/// [`Layout::title_filenames`] is set and a usable title is known, otherwise
/// the original filename.
pub fn filename(metadata: &Metadata, original: &str, layout: &Layout) -> String {
    if !layout.title_filenames {
        return original.to_string();
    }
    let extension = Path::new(original)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    match sanitize_segment(&metadata.title, MAX_SEGMENT_BYTES.saturating_sub(extension.len())) {
        Some(title) => format!("{title}{extension}"),
        None => original.to_string(),
    }
}

/// Collision-free absolute destination for a book.
///
/// Starts at `<directory>/<filename>` and, if that is taken, probes
/// `<stem>_1<ext>`, `<stem>_2<ext>`, … in order. Nothing is created; the
/// move creates missing directories.
pub async fn resolve(
    backend: &BackendHandle,
    library: &Path,
    category: Category,
    author: &str,
    filename: &str,
    layout: &Layout,
) -> Result<PathBuf> {
    let directory = directory(library, category, author, layout)?;
    if validate_path(filename).is_err() || Path::new(filename).components().count() != 1 {
        exn::bail!(ErrorKind::InvalidDestination(directory.join(filename)));
    }
    first_free(backend, &directory, filename).await
}
