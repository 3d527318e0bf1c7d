//! Shelving books that land in an inbox directory.
//!
//! An arrival (a book file, or a folder of them) is discovered either by the
//! [`Watcher`](watch::Watcher) or by startup [reconciliation](scan::reconcile),
//! handed to the [`Tracker`], left alone for the stabilization delay, then
//! extracted, classified and moved to
//! `<library>/<category>/<author folder>/<filename>`.

pub mod error;
mod naming;
pub mod organize;
pub mod scan;
mod service;
pub mod tracker;
pub mod watch;

pub use crate::organize::Action;
pub use crate::service::Service;
pub use crate::tracker::{ItemKind, Outcome, ProcessingGuard, ProcessingSet, Tracker, WatchedItem};
use shelver_classify::ClassifierHandle;
use shelver_storage::BackendHandle;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DELAY: Duration = Duration::from_secs(30);
pub const DEFAULT_MIN_SIZE: u64 = 1024;
pub const DEFAULT_UNKNOWN_AUTHOR: &str = "Unknown";

/// Everything an item needs to be shelved.
#[derive(Clone)]
pub struct Context {
    /// Watched root; only its direct children are arrivals.
    pub inbox: PathBuf,
    pub library: PathBuf,
    pub backend: BackendHandle,
    pub classifier: ClassifierHandle,
    /// How long an arrival is left alone before it is touched.
    pub delay: Duration,
    /// Smaller top-level files are treated as incomplete downloads.
    pub min_size: u64,
    pub layout: Layout,
    pub folders: FolderMode,
}
impl Context {
    pub fn new(
        inbox: impl Into<PathBuf>,
        library: impl Into<PathBuf>,
        backend: BackendHandle,
        classifier: ClassifierHandle,
    ) -> Self {
        Self {
            inbox: inbox.into(),
            library: library.into(),
            backend,
            classifier,
            delay: DEFAULT_DELAY,
            min_size: DEFAULT_MIN_SIZE,
            layout: Layout::default(),
            folders: FolderMode::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_folders(mut self, folders: FolderMode) -> Self {
        self.folders = folders;
        self
    }
}

/// Shape of the tree beneath each category directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Nest books under a formatted author directory.
    pub author_folders: bool,
    /// Name the moved file after its title (keeping the extension).
    pub title_filenames: bool,
    /// Author directory used when no author is known.
    pub unknown_author: String,
}
impl Default for Layout {
    fn default() -> Self {
        Self { author_folders: true, title_filenames: true, unknown_author: DEFAULT_UNKNOWN_AUTHOR.to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderMode {
    /// Treat directories in the inbox as arrivals at all.
    pub enabled: bool,
    /// Give a contained file that fails to shelve the unsorted fallback.
    pub fallback: bool,
}
impl Default for FolderMode {
    fn default() -> Self {
        Self { enabled: true, fallback: true }
    }
}
