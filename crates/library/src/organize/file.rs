use crate::Context;
use crate::error::{ErrorKind, Result};
use crate::organize::destination::{filename, resolve};
use exn::{OptionExt, ResultExt};
use shelver_classify::Category;
use shelver_extract::models::Metadata;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Where a file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Shelved at its resolved destination.
    Moved { to: PathBuf, category: Category },
    /// Shelving failed; moved unchanged into `<library>/unsorted/`.
    FellBack(PathBuf),
    /// Nothing could be moved; the file is still at this path.
    LeftInPlace(PathBuf),
}
impl Action {
    /// `true` unless the file is still where it was found.
    pub fn has_left(&self) -> bool {
        !matches!(self, Self::LeftInPlace(_))
    }
}

/// Extracts, classifies, resolves and moves a single file.
///
/// Extraction and classification cannot fail (they degrade to empty
/// metadata and [`Category::Unsorted`]); errors come from resolving the
/// destination or from the move itself.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn organize_file(ctx: &Context, path: &Path) -> Result<Action> {
    let original = original_name(path)?;
    let metadata = extract(path).await;
    tracing::info!(
        title = %metadata.title,
        author = %metadata.author,
        source = %metadata.source,
        "Extracted metadata"
    );

    let category = ctx.classifier.classify(&metadata, &original).await;
    tracing::info!(%category, classifier = ctx.classifier.name(), "Classified");

    let name = filename(&metadata, &original, &ctx.layout);
    let to = resolve(&ctx.backend, &ctx.library, category, &metadata.author, &name, &ctx.layout).await?;
    ctx.backend.rename(path, &to).await.or_raise(|| ErrorKind::Storage)?;
    tracing::info!(%category, destination = %to.display(), "Shelved");
    Ok(Action::Moved { to, category })
}

/// Moves `path`, keeping its name, into `<library>/unsorted/`.
///
/// An existing file of the same name there is never replaced; that, like
/// any other failure, leaves the file where it is.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn fallback(ctx: &Context, path: &Path) -> Action {
    match try_fallback(ctx, path).await {
        Ok(to) => {
            tracing::info!(destination = %to.display(), "Moved to unsorted after failure");
            Action::FellBack(to)
        },
        Err(error) => {
            tracing::error!(error = ?error, "Fallback move failed, leaving file in place");
            Action::LeftInPlace(path.to_path_buf())
        },
    }
}

async fn try_fallback(ctx: &Context, path: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_raise(|| ErrorKind::InvalidDestination(path.to_path_buf()))?;
    let to = ctx.library.join(Category::Unsorted.as_str()).join(name);
    if ctx.backend.exists(&to).await.or_raise(|| ErrorKind::Storage)? {
        exn::bail!(ErrorKind::Occupied(to));
    }
    ctx.backend.rename(path, &to).await.or_raise(|| ErrorKind::Storage)?;
    Ok(to)
}

fn original_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_raise(|| ErrorKind::InvalidDestination(path.to_path_buf()))
}

/// Runs the (blocking) extractor off the async workers.
async fn extract(path: &Path) -> Metadata {
    let owned = path.to_path_buf();
    match tokio::task::spawn_blocking(move || shelver_extract::extract(owned)).await {
        Ok(metadata) => metadata,
        Err(error) => {
            tracing::warn!(error = %error, "Metadata extraction aborted");
            Metadata::default()
        },
    }
}
