//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Folio has two configuration scopes:
//! - **Global**: user-level settings
//! - **Project**: per-project overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$FOLIO_CONFIG` if set
//! 2. `<platform config dir>/folio/config.toml`
//! 3. `~/.folio/config.toml`
//!
//! # Project Config Location
//!
//! `folio.toml` in the project directory.
//!
//! # Example
//!
//! ```no_run
//! use folio::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//! println!("Separator: {}", config.separator());
//! println!("Synthetic section: {}", config.synthetic_section_title());
//! ```

pub mod schema;

pub use schema::{ComposeSection, ConfigFile, NamingSection};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default hierarchical title separator.
pub const DEFAULT_SEPARATOR: &str = "/";

/// Default synthetic section title.
pub const DEFAULT_SYNTHETIC_TITLE: &str = "General";

/// Default maximum slug length.
pub const DEFAULT_MAX_SLUG_LEN: usize = 50;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Resolved configuration with precedence applied.
#[derive(Debug, Clone, Default)]
pub struct Config {
    merged: ConfigFile,
}

impl Config {
    /// Build directly from a parsed file (used by tests and the CLI's
    /// `--config` override).
    pub fn from_file(file: ConfigFile) -> Self {
        Self { merged: file }
    }

    /// Load configuration for a project directory.
    ///
    /// Missing files are fine; present-but-invalid files are errors.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let mut merged = ConfigFile::default();

        if let Some(path) = global_config_path() {
            if let Some(file) = read_config(&path)? {
                merged = merged.merged_with(&file);
            }
        }

        if let Some(dir) = project_dir {
            let path = dir.join("folio.toml");
            if let Some(file) = read_config(&path)? {
                merged = merged.merged_with(&file);
            }
        }

        Ok(Self { merged })
    }

    /// The hierarchical title separator.
    pub fn separator(&self) -> &str {
        self.merged
            .compose
            .as_ref()
            .and_then(|c| c.separator.as_deref())
            .unwrap_or(DEFAULT_SEPARATOR)
    }

    /// Title for the synthetic default section.
    pub fn synthetic_section_title(&self) -> &str {
        self.merged
            .compose
            .as_ref()
            .and_then(|c| c.synthetic_section_title.as_deref())
            .unwrap_or(DEFAULT_SYNTHETIC_TITLE)
    }

    /// Maximum generated slug length.
    pub fn max_slug_len(&self) -> usize {
        self.merged
            .naming
            .as_ref()
            .and_then(|n| n.max_slug_len)
            .unwrap_or(DEFAULT_MAX_SLUG_LEN)
    }
}

fn global_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("FOLIO_CONFIG") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    if let Some(dir) = dirs::config_dir() {
        let candidate = dir.join("folio").join("config.toml");
        if candidate.exists() {
            return Some(candidate);
        }
    }
    dirs::home_dir().map(|home| home.join(".folio").join("config.toml"))
}

fn read_config(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let file = ConfigFile::from_toml(&text).map_err(|err| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(Some(file))
}
