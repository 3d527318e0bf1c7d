use dashmap::DashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Paths with a processing attempt in flight.
///
/// Cloning shares the same set. Membership is taken with
/// [`try_acquire()`](Self::try_acquire) and released when the returned
/// guard drops, so every exit from a handler (including a panic) frees the
/// path.
#[derive(Debug, Clone, Default)]
pub struct ProcessingSet {
    inner: Arc<DashSet<PathBuf>>,
}
impl ProcessingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claims `path`, or returns `None` if it is already claimed.
    ///
    /// The check and the insert are a single operation on one shard, so two
    /// racing callers can never both succeed. Unrelated paths do not contend.
    pub fn try_acquire(&self, path: &Path) -> Option<ProcessingGuard> {
        let path = path.to_path_buf();
        self.inner.insert(path.clone()).then(|| ProcessingGuard { set: Arc::clone(&self.inner), path })
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.inner.contains(path)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Membership of one path in a [`ProcessingSet`], released on drop.
#[must_use = "the path is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ProcessingGuard {
    set: Arc<DashSet<PathBuf>>,
    path: PathBuf,
}
impl ProcessingGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}
impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.set.remove(&self.path);
    }
}
