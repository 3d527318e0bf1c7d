use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

/// How long to leave a new arrival alone before acting on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Stabilization {
    pub delay_secs: u64,
    /// Files smaller than this (in bytes) are treated as incomplete downloads.
    pub min_size: u64,
}
impl Stabilization {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}
impl Default for Stabilization {
    fn default() -> Self {
        Self { delay_secs: 30, min_size: 1024 }
    }
}

/// Shape of the destination tree beneath each category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    /// Nest books under a "Last, First" author directory.
    pub author_folders: bool,
    /// Rename books to their title (keeping the extension) when one is known.
    pub title_filenames: bool,
    /// Author directory used when no author could be determined.
    pub unknown_author: String,
}
impl Default for Layout {
    fn default() -> Self {
        Self { author_folders: true, title_filenames: true, unknown_author: "Unknown".to_string() }
    }
}

/// Handling of directories dropped into the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Folders {
    /// Process directories at all; when off they are ignored.
    pub enabled: bool,
    /// Send a contained file that fails to move to `unsorted/` instead of
    /// leaving it where it is.
    pub fallback: bool,
}
impl Default for Folders {
    fn default() -> Self {
        Self { enabled: true, fallback: true }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Classifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub endpoint: String,
    pub timeout_secs: u64,
}
impl Classifier {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
impl Default for Classifier {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "claude-haiku-4-5-20251001".to_string(),
            max_tokens: 10,
            endpoint: "https://api.anthropic.com/v1".to_string(),
            timeout_secs: 30,
        }
    }
}
// Configuration gets logged at startup; keep the key out of it.
impl Debug for Classifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Classifier")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
