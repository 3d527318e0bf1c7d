//! Storage backend trait and implementations.
//!
//! This module defines the `StorageBackend` trait, the single seam through
//! which the library touches the filesystem. Everything above it (the
//! destination resolver, the arrival tracker, startup reconciliation) is
//! written against the trait so tests can wrap or replace the local
//! implementation.

mod local;

pub use self::local::LocalBackend;
use crate::error::Result;
use crate::models::FileInfo;
use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use std::path::Path;
use std::pin::Pin;

pub type FileInfoStream<'a> = Pin<Box<dyn Stream<Item = Result<FileInfo>> + Send + 'a>>;

/// Unified interface for filesystem access.
///
/// # Path Handling
/// All paths are **absolute**. Implementations reject relative paths with
/// [`InvalidPath`](crate::error::ErrorKind::InvalidPath); callers build
/// destinations from a root plus a path checked with
/// [`validate_path`](crate::validate_path).
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use shelver_storage::{StorageBackend, error::Result};
///
/// async fn still_there(backend: &dyn StorageBackend) -> Result<u64> {
///     let path = Path::new("/downloads/Jane Doe - My Novel.epub");
///     match backend.exists(path).await? {
///         true => Ok(backend.stat(path).await?.size),
///         false => Ok(0),
///     }
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the backend, for logging only.
    fn name(&self) -> &str;

    /// Check if a file or directory exists.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Get entry metadata without reading contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if nothing
    /// exists at `path`.
    async fn stat(&self, path: &Path) -> Result<FileInfo>;

    /// Direct entries (files and directories) of a directory, in no
    /// particular order. Entries that cannot be inspected are skipped.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the
    /// directory does not exist and [`WrongKind`](crate::error::ErrorKind::WrongKind)
    /// if `path` is a file.
    async fn children(&self, path: &Path) -> Result<Vec<FileInfo>>;

    /// Stream every regular file beneath a directory, recursively.
    ///
    /// Directories themselves are never yielded. A directory that does not
    /// exist yields an empty stream rather than an error, since it may have
    /// been removed between discovery and listing.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use futures::TryStreamExt;
    /// use std::path::Path;
    /// # use shelver_storage::{StorageBackend, error::Result};
    /// # async fn example(backend: &dyn StorageBackend) -> Result<()> {
    /// let mut stream = backend.list_stream(Path::new("/downloads/Some Bundle"));
    /// while let Some(info) = stream.try_next().await? {
    ///     println!("{}: {} bytes", info.path.display(), info.size);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    fn list_stream<'a>(&'a self, path: &'a Path) -> FileInfoStream<'a>;

    /// Collect [`list_stream()`](Self::list_stream) into a [`Vec`].
    async fn list(&self, path: &Path) -> Result<Vec<FileInfo>> {
        self.list_stream(path).try_collect().await
    }

    /// Move a file.
    ///
    /// # Notes
    /// - Parent directories of the destination are created as needed.
    /// - If the destination already exists it will be overwritten; callers
    ///   that must not clobber check [`exists()`](Self::exists) first.
    /// - Moves across filesystem boundaries fall back to copy then delete.
    ///   If the source cannot be deleted the copy is removed again and an
    ///   error returned.
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Create a directory and all of its missing parents.
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a directory and everything beneath it.
    async fn remove_dir_all(&self, path: &Path) -> Result<()>;
}
