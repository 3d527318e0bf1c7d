//! Per-item processing: dedup, stabilization, validation, then shelving.
//!
//! [`Tracker::handle()`] drives one arrival to an [`Outcome`]:
//!
//! 1. claim the path in the [`ProcessingSet`] (a second, concurrent claim is
//!    [`Outcome::AlreadyProcessing`]);
//! 2. sleep for the stabilization delay;
//! 3. re-check the path: gone is [`Outcome::Vanished`], a file below the
//!    minimum size is [`Outcome::TooSmall`];
//! 4. shelve the file, or every supported file inside the folder, falling
//!    back to `unsorted/` on failure.
//!
//! The claim is held by a guard, so the path is released on every exit.

mod item;
mod processing;

pub use self::item::{ItemKind, Outcome, WatchedItem};
pub use self::processing::{ProcessingGuard, ProcessingSet};
use crate::Context;
use crate::organize::{self, Action, organize_file};
use futures::StreamExt;
use shelver_extract::is_supported;
use shelver_storage::error::ErrorKind as StorageErrorKind;
use shelver_storage::{EntryKind, FileInfo};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::instrument;

/// Runs arrivals through the shelving state machine.
///
/// Cheap to clone; clones share the context and the processing set.
#[derive(Clone)]
pub struct Tracker {
    ctx: Arc<Context>,
    processing: ProcessingSet,
}
impl Tracker {
    pub fn new(ctx: Arc<Context>, processing: ProcessingSet) -> Self {
        Self { ctx, processing }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn processing(&self) -> &ProcessingSet {
        &self.processing
    }

    /// Runs [`handle()`](Self::handle) as an independent task.
    pub fn spawn(&self, item: WatchedItem) -> JoinHandle<Outcome> {
        let tracker = self.clone();
        tokio::spawn(async move { tracker.handle(item).await })
    }

    /// Processes one arrival to completion. Never fails: every ending is an
    /// [`Outcome`], and each is logged.
    #[instrument(skip_all, fields(path = %item.path.display(), kind = %item.kind))]
    pub async fn handle(&self, item: WatchedItem) -> Outcome {
        if item.kind == ItemKind::Folder && !self.ctx.folders.enabled {
            tracing::debug!("Folder mode is off, ignoring");
            return Outcome::Ignored;
        }
        let Some(_guard) = self.processing.try_acquire(&item.path) else {
            tracing::debug!("Already being processed, ignoring");
            return Outcome::AlreadyProcessing;
        };

        tracing::info!(delay_secs = self.ctx.delay.as_secs(), "Waiting for arrival to settle");
        tokio::time::sleep(self.ctx.delay).await;

        let info = match self.ctx.backend.stat(&item.path).await {
            Ok(info) => info,
            Err(error) if matches!(&*error, StorageErrorKind::NotFound(_)) => {
                tracing::warn!("Disappeared before processing");
                return Outcome::Vanished;
            },
            Err(error) => {
                tracing::error!(error = ?error, "Could not inspect arrival, leaving it");
                return Outcome::Unreadable;
            },
        };
        match info.kind {
            EntryKind::File => self.handle_file(info).await,
            EntryKind::Directory if self.ctx.folders.enabled => self.handle_folder(info).await,
            EntryKind::Directory => Outcome::Ignored,
        }
    }

    async fn handle_file(&self, info: FileInfo) -> Outcome {
        if info.size < self.ctx.min_size {
            tracing::warn!(size = info.size, min_size = self.ctx.min_size, "File too small, skipping");
            return Outcome::TooSmall(info.size);
        }
        Outcome::File(self.shelve(&info.path, true).await)
    }

    /// Every supported file beneath the folder is shelved on its own; one
    /// failing does not stop the rest. The folder (with anything else left
    /// in it) is deleted only once every book has left, and never if part of
    /// it could not be read.
    async fn handle_folder(&self, info: FileInfo) -> Outcome {
        let (books, unreadable) = self.books_in(&info.path).await;

        if books.is_empty() && unreadable > 0 {
            tracing::error!(unreadable, "No readable books in folder, leaving it");
            return Outcome::Unreadable;
        }
        if books.is_empty() {
            tracing::warn!("No supported files in folder");
            match self.ctx.backend.remove_dir_all(&info.path).await {
                Ok(()) => tracing::info!("Empty folder deleted"),
                Err(error) => tracing::error!(error = ?error, "Could not delete empty folder"),
            }
            return Outcome::EmptyFolder;
        }

        tracing::info!(count = books.len(), "Shelving folder contents");
        let mut actions = Vec::with_capacity(books.len());
        for book in books {
            actions.push(self.shelve(&book.path, self.ctx.folders.fallback).await);
        }

        let removed = match unreadable == 0 && actions.iter().all(Action::has_left) {
            true => match self.ctx.backend.remove_dir_all(&info.path).await {
                Ok(()) => {
                    tracing::info!("Source folder deleted");
                    true
                },
                Err(error) => {
                    tracing::error!(error = ?error, "Could not delete source folder");
                    false
                },
            },
            false => {
                tracing::warn!(unreadable, "Some files could not be moved, keeping source folder");
                false
            },
        };
        Outcome::Folder { actions, removed }
    }

    /// Supported files beneath `folder`, plus how many entries could not be
    /// read. Unreadable entries are logged and skipped.
    async fn books_in(&self, folder: &Path) -> (Vec<FileInfo>, usize) {
        let mut books = Vec::new();
        let mut unreadable = 0;
        let mut files = self.ctx.backend.list_stream(folder);
        while let Some(file) = files.next().await {
            match file {
                Ok(file) if is_supported(&file.path) => books.push(file),
                Ok(_) => {},
                Err(error) => {
                    unreadable += 1;
                    tracing::warn!(error = ?error, "Skipping unreadable entry in folder");
                },
            }
        }
        (books, unreadable)
    }

    async fn shelve(&self, path: &Path, fallback: bool) -> Action {
        match organize_file(&self.ctx, path).await {
            Ok(action) => return action,
            Err(error) if fallback => {
                tracing::warn!(path = %path.display(), error = ?error, "Shelving failed, falling back to unsorted");
            },
            Err(error) => {
                tracing::error!(path = %path.display(), error = ?error, "Shelving failed, leaving file in place");
                return Action::LeftInPlace(path.to_path_buf());
            },
        }
        organize::fallback(&self.ctx, path).await
    }
}
