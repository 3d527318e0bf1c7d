//! Entry metadata returned by storage backends.

use std::path::PathBuf;
use time::OffsetDateTime;

/// Whether an entry is a regular file or a directory.
///
/// Anything else (sockets, FIFOs, dangling symlinks) is never reported by a
/// backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// Entry metadata returned by storage backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Absolute path of the entry
    pub path: PathBuf,
    /// Size in bytes (zero for directories)
    pub size: u64,
    /// Last modified timestamp
    pub modified: OffsetDateTime,
    pub kind: EntryKind,
}
impl FileInfo {
    pub fn new(path: impl Into<PathBuf>, size: u64, modified: OffsetDateTime, kind: EntryKind) -> Self {
        Self { path: path.into(), size, modified, kind }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Final path component as a lossy UTF-8 string, for logging and for
    /// building destination names.
    pub fn file_name(&self) -> String {
        self.path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
    }
}
