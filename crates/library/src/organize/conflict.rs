use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use shelver_storage::BackendHandle;
use std::path::{Path, PathBuf};

/// Highest `_n` suffix probed before bailing with [`ErrorKind::Conflict`].
const MAX_CONFLICT_DEPTH: usize = 10_000;

/// First unoccupied path for `filename` in `directory`: the name itself,
/// then `<stem>_1<ext>`, `<stem>_2<ext>`, and so on.
///
/// This is a check at decision time, not a reservation. Something else
/// writing the same name between this check and the move is not detected.
pub(crate) async fn first_free(backend: &BackendHandle, directory: &Path, filename: &str) -> Result<PathBuf> {
    let candidate = directory.join(filename);
    if !backend.exists(&candidate).await.or_raise(|| ErrorKind::Storage)? {
        return Ok(candidate);
    }
    let (stem, extension) = split_filename(filename);
    for n in 1..=MAX_CONFLICT_DEPTH {
        let candidate = directory.join(format!("{stem}_{n}{extension}"));
        if !backend.exists(&candidate).await.or_raise(|| ErrorKind::Storage)? {
            tracing::debug!(taken = filename, destination = %candidate.display(), "Destination taken, using suffix");
            return Ok(candidate);
        }
    }
    exn::bail!(ErrorKind::Conflict(directory.join(filename)))
}

/// Splits at the last dot. A leading dot (`.hidden`) or a trailing one
/// (`file.`) is part of the stem.
fn split_filename(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < filename.len() => filename.split_at(dot),
        _ => (filename, ""),
    }
}
