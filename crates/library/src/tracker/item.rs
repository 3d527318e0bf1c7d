use crate::organize::Action;
use derive_more::Display;
use shelver_extract::is_supported;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ItemKind {
    #[display("file")]
    File,
    #[display("folder")]
    Folder,
}

/// A path in the inbox waiting to be shelved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedItem {
    pub path: PathBuf,
    pub kind: ItemKind,
    pub discovered_at: OffsetDateTime,
}
impl WatchedItem {
    pub fn new(path: impl Into<PathBuf>, kind: ItemKind) -> Self {
        Self { path: path.into(), kind, discovered_at: OffsetDateTime::now_utc() }
    }

    /// Decides whether an inbox entry is an arrival at all.
    ///
    /// Directories become folders (unless folder mode is off); files only
    /// count with a supported extension. Directories are never filtered by
    /// extension.
    pub fn from_entry(path: &Path, is_dir: bool, folders_enabled: bool) -> Option<Self> {
        match is_dir {
            true if folders_enabled => Some(Self::new(path, ItemKind::Folder)),
            true => None,
            false if is_supported(path) => Some(Self::new(path, ItemKind::File)),
            false => None,
        }
    }
}

/// How a call to [`Tracker::handle()`](super::Tracker::handle) ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Another attempt holds this path; nothing was done.
    AlreadyProcessing,
    /// A folder arrived while folder mode is off.
    Ignored,
    /// Gone by the end of the stabilization delay.
    Vanished,
    /// Below the minimum size; left in place as an incomplete download.
    TooSmall(u64),
    /// A folder without supported files; it was deleted.
    EmptyFolder,
    /// The arrival could not be inspected; left in place.
    Unreadable,
    File(Action),
    /// One action per contained supported file, and whether the source
    /// folder was removed afterwards.
    Folder { actions: Vec<Action>, removed: bool },
}
