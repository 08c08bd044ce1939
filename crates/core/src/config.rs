//! TOML-based configuration for rostergen.
//!
//! Every field has a default, so an absent or empty file is a valid
//! configuration. The reference tables are compiled in and cannot be
//! configured.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;
use crate::history::SourceKind;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterConfig {
    /// Minimum tracing level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where author records come from.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Where the AUTHORS file goes.
    #[serde(default)]
    pub output: OutputConfig,

    /// How the roster is ordered.
    #[serde(default)]
    pub collation: CollationConfig,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            history: HistoryConfig::default(),
            output: OutputConfig::default(),
            collation: CollationConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Revision-history export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    /// Path to the git repository (default `.`).
    #[serde(default = "default_repo")]
    pub repo: PathBuf,

    /// Revisions whose history is exported (default `master`, `1.2.x`).
    #[serde(default = "default_revisions")]
    pub revisions: Vec<String>,

    /// Export implementation.
    #[serde(default)]
    pub source: SourceKind,

    /// `git` executable used by the `command` source.
    #[serde(default = "default_git_binary")]
    pub git_binary: String,
}

fn default_repo() -> PathBuf {
    PathBuf::from(".")
}
fn default_revisions() -> Vec<String> {
    vec!["master".into(), "1.2.x".into()]
}
fn default_git_binary() -> String {
    "git".into()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            revisions: default_revisions(),
            source: SourceKind::default(),
            git_binary: default_git_binary(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// AUTHORS file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Output path (default `AUTHORS`, relative to the working directory).
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("AUTHORS")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Collation
// ---------------------------------------------------------------------------

/// Roster ordering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CollationConfig {
    /// Locale name passed to `setlocale`. Empty selects the locale from
    /// the environment; `C` gives plain byte order.
    #[serde(default)]
    pub locale: String,
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl RosterConfig {
    /// Load a [`RosterConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: RosterConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Validate that all required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.revisions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "history.revisions".into(),
                detail: "at least one revision is required".into(),
            });
        }
        if let Some(rev) = self.history.revisions.iter().find(|r| r.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "history.revisions".into(),
                detail: format!("revision names must not be blank (got {:?})", rev),
            });
        }
        if self.history.git_binary.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "history.git_binary".into(),
                detail: "git binary must not be empty".into(),
            });
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.path".into(),
                detail: "output path must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Convenience: load and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML, e.g. for `rostergen init`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
