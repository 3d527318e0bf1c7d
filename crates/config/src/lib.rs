//! Layered configuration for shelver.
//!
//! Sources, from lowest to highest precedence:
//! 1. built-in defaults,
//! 2. a configuration file (TOML, YAML or JSON, chosen by extension),
//! 3. `SHELVER_`-prefixed environment variables, nested with `__`
//!    (`SHELVER_STABILIZATION__DELAY_SECS=5`),
//! 4. `ANTHROPIC_API_KEY`,
//! 5. command-line [`Overrides`].

pub mod error;
mod sections;

pub use crate::sections::{Classifier, Folders, Layout, Stabilization};
use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "SHELVER_";
const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
const FILE_NAMES: [&str; 3] = ["config.toml", "config.yaml", "config.json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory watched for new arrivals.
    pub inbox: PathBuf,
    /// Root of the categorised library.
    pub library: PathBuf,
    /// Append logs here as well as to stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    pub stabilization: Stabilization,
    pub layout: Layout,
    pub folders: Folders,
    pub classifier: Classifier,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            inbox: PathBuf::from("/downloads"),
            library: PathBuf::from("/books"),
            log_file: None,
            stabilization: Stabilization::default(),
            layout: Layout::default(),
            folders: Folders::default(),
            classifier: Classifier::default(),
        }
    }
}

/// Values given on the command line; `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub inbox: Option<PathBuf>,
    pub library: Option<PathBuf>,
    pub delay_secs: Option<u64>,
}

impl Config {
    /// Load, merge and validate configuration.
    ///
    /// With no explicit `file`, the first of `config.toml`, `config.yaml` and
    /// `config.json` in the platform configuration directory is used, if any.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let file = match file {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_file(),
        };
        if let Some(path) = &file {
            tracing::debug!(path = %path.display(), "Using configuration file");
        }
        Self::from_figment(Self::figment(file.as_deref(), overrides)?)
    }

    /// Every source merged in precedence order, without extracting.
    pub fn figment(file: Option<&Path>, overrides: &Overrides) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = Self::merge_file(figment, path)?;
        }
        figment = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&[API_KEY_VAR]).map(|_| "classifier.api_key".into()));
        if let Some(inbox) = &overrides.inbox {
            figment = figment.merge(Serialized::default("inbox", inbox));
        }
        if let Some(library) = &overrides.library {
            figment = figment.merge(Serialized::default("library", library));
        }
        if let Some(delay) = overrides.delay_secs {
            figment = figment.merge(Serialized::default("stabilization.delay_secs", delay));
        }
        Ok(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_file() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("", "", "shelver")?;
        FILE_NAMES.iter().map(|name| dirs.config_dir().join(name)).find(|path| path.is_file())
    }

    fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
        let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
        Ok(match extension.as_deref() {
            Some("toml") => figment.merge(Toml::file_exact(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
            Some("json") => figment.merge(Json::file_exact(path)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
        })
    }

    /// The inbox and library must be absolute, distinct and disjoint: a
    /// library inside the inbox would be re-discovered as a new arrival.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| exn::Exn::from(ErrorKind::Invalid(message));
        for (name, path) in [("inbox", &self.inbox), ("library", &self.library)] {
            if !path.is_absolute() {
                return Err(invalid(format!("{name} must be an absolute path, got {}", path.display())));
            }
        }
        if self.inbox == self.library {
            return Err(invalid("inbox and library must be different directories".to_string()));
        }
        if self.library.starts_with(&self.inbox) || self.inbox.starts_with(&self.library) {
            return Err(invalid("inbox and library must not contain one another".to_string()));
        }
        let unknown = self.layout.unknown_author.trim();
        if unknown.is_empty() || unknown.contains(['/', '\\']) || unknown == "." || unknown == ".." {
            return Err(invalid("layout.unknown_author must be a single non-empty directory name".to_string()));
        }
        if self.classifier.max_tokens == 0 {
            return Err(invalid("classifier.max_tokens must be at least 1".to_string()));
        }
        if self.classifier.timeout_secs == 0 {
            return Err(invalid("classifier.timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}
