mod anthropic;
mod category;
pub mod error;
pub mod prompt;

pub use crate::anthropic::{AnthropicClassifier, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
pub use crate::category::Category;
use crate::error::Result;
use async_trait::async_trait;
use shelver_extract::models::Metadata;
use std::sync::Arc;

pub type ClassifierHandle = Arc<dyn Classify + Send + Sync>;

/// Assigns a [`Category`] to a book.
///
/// Implementors provide the fallible [`try_classify()`](Self::try_classify);
/// callers use [`classify()`](Self::classify), which always produces a
/// category.
#[async_trait]
pub trait Classify: Send + Sync {
    /// Name of the classifier, for logging only.
    fn name(&self) -> &str;

    /// Classify from extracted metadata and the item's bare filename
    /// (no directories).
    async fn try_classify(&self, metadata: &Metadata, filename: &str) -> Result<Category>;

    /// Like [`try_classify()`](Self::try_classify), but any failure is
    /// logged and answered with [`Category::Unsorted`].
    async fn classify(&self, metadata: &Metadata, filename: &str) -> Category {
        match self.try_classify(metadata, filename).await {
            Ok(category) => category,
            Err(error) => {
                tracing::warn!(classifier = self.name(), filename, error = ?error, "Classification failed, using unsorted");
                Category::Unsorted
            },
        }
    }
}
