//! Local filesystem storage backend.
//!
//! Accesses the inbox and library through `tokio::fs`. Unlike a rooted
//! object store, every path handed to this backend is absolute: the inbox and
//! the library are two unrelated trees and the backend moves files between
//! them.

use crate::backend::FileInfoStream;
use crate::error::{ErrorKind, Result};
use crate::models::{EntryKind, FileInfo};
use crate::StorageBackend;
use async_stream::stream;
use async_trait::async_trait;
use std::fs::Metadata;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, DirEntry};

enum WalkEntry {
    File(FileInfo),
    Descend(PathBuf),
    Skip,
}

/// Local filesystem storage backend.
///
/// # Examples
///
/// ```no_run
/// use shelver_storage::LocalBackend;
///
/// let backend = LocalBackend::new("local");
/// ```
#[derive(Clone)]
pub struct LocalBackend {
    name: String,
}
impl LocalBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn absolute(path: &Path) -> Result<&Path> {
        match path.is_absolute() {
            true => Ok(path),
            false => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
        }
    }

    /// Re-use same data collection from entry metadata for listing and stat.
    fn info(path: &Path, metadata: &Metadata) -> Result<Option<FileInfo>> {
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            return Ok(None);
        };
        let modified = metadata.modified().map_err(ErrorKind::Io)?.into();
        let size = match kind {
            EntryKind::File => metadata.len(),
            EntryKind::Directory => 0,
        };
        Ok(Some(FileInfo::new(path, size, modified, kind)))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            IoErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            IoErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            IoErrorKind::AlreadyExists => ErrorKind::AlreadyExists(path.to_path_buf()),
            IoErrorKind::NotADirectory => ErrorKind::WrongKind(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }

    async fn process_entry(entry: DirEntry) -> Result<WalkEntry> {
        let path = entry.path();
        // Follow symlinks so a linked book is treated like the real thing.
        let metadata = fs::metadata(&path).await.map_err(|e| Self::map_io_error(e, &path))?;
        if metadata.is_dir() {
            return Ok(WalkEntry::Descend(path));
        }
        Ok(match Self::info(&path, &metadata)? {
            Some(info) => WalkEntry::File(info),
            // Sockets, FIFOs and the like.
            None => WalkEntry::Skip,
        })
    }

    async fn copy_then_delete(from: &Path, to: &Path) -> Result<()> {
        if let Err(e) = fs::copy(from, to).await {
            // Don't leave a truncated copy behind in the library.
            let _ = fs::remove_file(to).await;
            exn::bail!(Self::map_io_error(e, to));
        }
        Self::remove_source(from, to).await
    }

    /// Second half of a copy-based move. If the source cannot be removed the
    /// copy is, so the move either happened or did not.
    async fn remove_source(from: &Path, to: &Path) -> Result<()> {
        let Err(e) = fs::remove_file(from).await else {
            return Ok(());
        };
        if let Err(error) = fs::remove_file(to).await {
            tracing::warn!(to = %to.display(), %error, "Could not remove copy after failing to delete the source");
        }
        exn::bail!(Self::map_io_error(e, from))
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let path = Self::absolute(path)?;
        Ok(fs::try_exists(path).await.map_err(|e| Self::map_io_error(e, path))?)
    }

    async fn stat(&self, path: &Path) -> Result<FileInfo> {
        let path = Self::absolute(path)?;
        let metadata = fs::metadata(path).await.map_err(|e| Self::map_io_error(e, path))?;
        match Self::info(path, &metadata)? {
            Some(info) => Ok(info),
            None => exn::bail!(ErrorKind::WrongKind(path.to_path_buf())),
        }
    }

    async fn children(&self, path: &Path) -> Result<Vec<FileInfo>> {
        let path = Self::absolute(path)?;
        let mut entries = fs::read_dir(path).await.map_err(|e| Self::map_io_error(e, path))?;
        let mut children = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| Self::map_io_error(e, path))? {
            let child = entry.path();
            let metadata = match fs::metadata(&child).await {
                Ok(metadata) => metadata,
                // Removed since read_dir, or a dangling symlink.
                Err(e) if e.kind() == IoErrorKind::NotFound => continue,
                // One bad entry (a symlink loop, say) must not hide its siblings.
                Err(error) => {
                    tracing::warn!(path = %child.display(), %error, "Skipping unreadable entry");
                    continue;
                },
            };
            if let Some(info) = Self::info(&child, &metadata)? {
                children.push(info);
            }
        }
        Ok(children)
    }

    fn list_stream<'a>(&'a self, path: &'a Path) -> FileInfoStream<'a> {
        let start = match Self::absolute(path) {
            Ok(start) => start.to_path_buf(),
            Err(e) => return Box::pin(futures::stream::once(async { Result::Err(e) })),
        };
        let mut stack = vec![start];

        Box::pin(stream! {
            'dirs: while let Some(current) = stack.pop() {
                let mut entries = match fs::read_dir(&current).await {
                    Ok(entries) => entries,
                    Err(err) if err.kind() == IoErrorKind::NotFound => continue,
                    Err(err) => {
                        yield Err(exn::Exn::from(Self::map_io_error(err, &current)));
                        continue 'dirs;
                    }
                };

                'entries: loop {
                    let entry = match entries.next_entry().await {
                        Ok(Some(entry)) => entry,
                        Ok(None) => break 'entries,
                        Err(e) => { yield Err(exn::Exn::from(Self::map_io_error(e, &current))); continue 'entries; },
                    };
                    match Self::process_entry(entry).await {
                        Ok(WalkEntry::File(f)) => yield Ok(f),
                        Ok(WalkEntry::Descend(d)) => stack.push(d),
                        Ok(WalkEntry::Skip) => {},
                        // Vanished between read_dir and stat; nothing to report.
                        Err(e) if matches!(&*e, ErrorKind::NotFound(_)) => {},
                        Err(e) => yield Err(e),
                    };
                }
            }
        })
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from = Self::absolute(from)?;
        let to = Self::absolute(to)?;
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).await.map_err(|e| Self::map_io_error(e, parent))?;
        }
        match fs::rename(from, to).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::CrossesDevices => Self::copy_then_delete(from, to).await,
            Err(e) if e.kind() == IoErrorKind::NotFound => exn::bail!(ErrorKind::NotFound(from.to_path_buf())),
            Err(e) => exn::bail!(Self::map_io_error(e, to)),
        }
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        let path = Self::absolute(path)?;
        Ok(fs::create_dir_all(path).await.map_err(|e| Self::map_io_error(e, path))?)
    }

    async fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let path = Self::absolute(path)?;
        Ok(fs::remove_dir_all(path).await.map_err(|e| Self::map_io_error(e, path))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, data: &[u8]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, data).unwrap();
    }

    #[tokio::test]
    async fn test_relative_paths_rejected() {
        let backend = LocalBackend::new("local");
        let err = backend.exists(Path::new("relative/book.epub")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
        assert!(backend.stat(Path::new("./book.epub")).await.is_err());
        assert!(backend.rename(Path::new("a.epub"), Path::new("/tmp/b.epub")).await.is_err());
    }

    #[tokio::test]
    async fn test_exists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local");
        let path = temp_dir.path().join("book.epub");
        assert!(!backend.exists(&path).await.unwrap());
        write(&path, b"data");
        assert!(backend.exists(&path).await.unwrap());
        assert!(backend.exists(temp_dir.path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_stat() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local");
        let path = temp_dir.path().join("book.pdf");
        write(&path, &[0u8; 2000]);
        let info = backend.stat(&path).await.unwrap();
        assert_eq!(info.path, path);
        assert_eq!(info.size, 2000);
        assert_eq!(info.kind, EntryKind::File);
        assert_eq!(info.file_name(), "book.pdf");

        let dir = backend.stat(temp_dir.path()).await.unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir.size, 0);

        let err = backend.stat(&temp_dir.path().join("missing.pdf")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_children_are_direct_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local");
        write(&temp_dir.path().join("a.epub"), b"data");
        write(&temp_dir.path().join("Bundle/b.pdf"), b"data");
        write(&temp_dir.path().join("Bundle/Nested/c.mobi"), b"data");
        let mut children = backend.children(temp_dir.path()).await.unwrap();
        children.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].file_name(), "Bundle");
        assert!(children[0].is_dir());
        assert_eq!(children[1].file_name(), "a.epub");
        assert_eq!(children[1].kind, EntryKind::File);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_children_skip_unreadable_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local");
        write(&temp_dir.path().join("a.epub"), b"data");
        let looped = temp_dir.path().join("loop");
        std::os::unix::fs::symlink(&looped, &looped).unwrap();
        let children = backend.children(temp_dir.path()).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].file_name(), "a.epub");
    }

    #[tokio::test]
    async fn test_children_of_missing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local");
        let err = backend.children(&temp_dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_is_recursive_and_files_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local");
        write(&temp_dir.path().join("Bundle/one.epub"), b"data");
        write(&temp_dir.path().join("Bundle/Nested/two.pdf"), b"data");
        write(&temp_dir.path().join("Bundle/Nested/Deeper/three.txt"), b"data");
        std::fs::create_dir_all(temp_dir.path().join("Bundle/Empty")).unwrap();
        let mut names: Vec<_> =
            backend.list(&temp_dir.path().join("Bundle")).await.unwrap().iter().map(FileInfo::file_name).collect();
        names.sort();
        assert_eq!(names, vec!["one.epub", "three.txt", "two.pdf"]);
    }

    #[tokio::test]
    async fn test_list_nonexistent_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local");
        let files = backend.list(&temp_dir.path().join("gone")).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_rename_creates_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local");
        let from = temp_dir.path().join("inbox/book.epub");
        let to = temp_dir.path().join("library/fiction/Doe, Jane/book.epub");
        write(&from, b"data");
        backend.rename(&from, &to).await.unwrap();
        assert!(!backend.exists(&from).await.unwrap());
        assert_eq!(std::fs::read(&to).unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_copy_then_delete() {
        let temp_dir = tempfile::tempdir().unwrap();
        let from = temp_dir.path().join("inbox/book.epub");
        let to = temp_dir.path().join("library/book.epub");
        write(&from, b"data");
        std::fs::create_dir_all(to.parent().unwrap()).unwrap();
        LocalBackend::copy_then_delete(&from, &to).await.unwrap();
        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_undeletable_source_discards_copy() {
        let temp_dir = tempfile::tempdir().unwrap();
        // Not a file, so `remove_file` fails regardless of privileges.
        let from = temp_dir.path().join("inbox/Bundle");
        write(&from.join("book.epub"), b"data");
        let to = temp_dir.path().join("library/book.epub");
        write(&to, b"data");
        assert!(LocalBackend::remove_source(&from, &to).await.is_err());
        assert!(!to.exists());
        assert!(from.join("book.epub").is_file());
    }

    #[tokio::test]
    async fn test_rename_missing_source() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local");
        let err = backend
            .rename(&temp_dir.path().join("missing.epub"), &temp_dir.path().join("out/missing.epub"))
            .await
            .unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_and_remove_dir_all() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("local");
        let dir = temp_dir.path().join("a/b/c");
        backend.create_dir_all(&dir).await.unwrap();
        assert!(backend.stat(&dir).await.unwrap().is_dir());
        write(&dir.join("leftover.txt"), b"data");
        backend.remove_dir_all(&temp_dir.path().join("a")).await.unwrap();
        assert!(!backend.exists(&temp_dir.path().join("a")).await.unwrap());
    }
}
