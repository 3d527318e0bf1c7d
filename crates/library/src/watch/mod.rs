//! Inbox watching.
//!
//! Wraps a non-recursive [`notify`] watcher on the inbox. Its callback runs
//! on notify's own thread and does nothing but translate events into
//! [`WatchedItem`]s and push them down a channel; the service drains that
//! channel and spawns the long-running work.

use crate::error::{ErrorKind, Result};
use crate::tracker::WatchedItem;
use exn::ResultExt;
use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

pub struct Watcher {
    // Dropping the notify watcher stops event delivery.
    _watcher: RecommendedWatcher,
    receiver: UnboundedReceiver<WatchedItem>,
}
impl Watcher {
    /// Starts watching the direct children of `inbox`.
    pub fn new(inbox: &Path, folders_enabled: bool) -> Result<Self> {
        let (sender, receiver) = unbounded_channel();
        let root = InboxRoot::new(inbox);
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| match result {
            Ok(event) => {
                for item in root.arrivals(&event, folders_enabled) {
                    tracing::info!(path = %item.path.display(), kind = %item.kind, "New arrival");
                    // Only fails once the receiver is gone, i.e. during shutdown.
                    let _ = sender.send(item);
                }
            },
            Err(error) => tracing::warn!(error = %error, "Watch error"),
        })
        .or_raise(|| ErrorKind::Watch)?;
        watcher.watch(inbox, RecursiveMode::NonRecursive).or_raise(|| ErrorKind::Watch)?;
        tracing::info!(inbox = %inbox.display(), "Watching inbox");
        Ok(Self { _watcher: watcher, receiver })
    }

    /// Next arrival, or `None` if the watcher has stopped.
    pub async fn next(&mut self) -> Option<WatchedItem> {
        self.receiver.recv().await
    }
}

/// The inbox as configured, plus its canonical form: some platforms report
/// event paths with symlinks resolved.
struct InboxRoot {
    configured: PathBuf,
    canonical: Option<PathBuf>,
}
impl InboxRoot {
    fn new(inbox: &Path) -> Self {
        Self { configured: inbox.to_path_buf(), canonical: std::fs::canonicalize(inbox).ok() }
    }

    /// Re-roots `path` onto the configured inbox if it is a direct child,
    /// so watch events and reconciliation agree on the same key.
    fn direct_child(&self, path: &Path) -> Option<PathBuf> {
        let parent = path.parent()?;
        if parent != self.configured && self.canonical.as_deref() != Some(parent) {
            return None;
        }
        Some(self.configured.join(path.file_name()?))
    }

    /// Arrivals carried by one event: something created in the inbox, or
    /// renamed/moved into it.
    fn arrivals(&self, event: &Event, folders_enabled: bool) -> Vec<WatchedItem> {
        let paths: Vec<&PathBuf> = match event.kind {
            EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths.iter().collect(),
            // `[from, to]`
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event.paths.last().into_iter().collect(),
            // Backends that cannot tell the two sides apart; only the side that exists arrived.
            EventKind::Modify(ModifyKind::Name(RenameMode::Any)) => {
                event.paths.iter().filter(|path| path.exists()).collect()
            },
            _ => Vec::new(),
        };
        paths
            .into_iter()
            .filter_map(|path| self.direct_child(path))
            .filter_map(|path| {
                let is_dir = match event.kind {
                    EventKind::Create(CreateKind::Folder) => true,
                    EventKind::Create(CreateKind::File) => false,
                    _ => path.is_dir(),
                };
                WatchedItem::from_entry(&path, is_dir, folders_enabled)
            })
            .collect()
    }
}
