//! Project configuration management for `mdlive.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # one file per TOML table
//! │   ├── source     # [source]
//! │   ├── markdown   # [markdown]
//! │   └── serve      # [serve]
//! ├── error.rs       # ConfigError
//! └── mod.rs         # Config (this file)
//! ```
//!
//! The config file is optional. Every section defaults to the fixed layout
//! (`builds/markdown/**/*.md` rendered into `builds/markdown/output/`, served
//! on `127.0.0.1:8000` with live reload and browser auto-open).

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{MarkdownConfig, ServeConfig, SourceConfig};

use crate::{cli::Cli, log, utils::path::normalize_path};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing mdlive.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Source tree and output layout
    #[serde(default)]
    pub source: SourceConfig,

    /// Markdown conversion options
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl Config {
    /// Build the configuration for this invocation.
    ///
    /// The project root is `--root` or the current directory. A missing
    /// config file is not an error: defaults apply.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Cannot read the current directory")?;
        let root = normalize_path(&cli.root.as_deref().map_or(cwd.clone(), |r| cwd.join(r)));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            crate::debug!("config"; "{} not found, using defaults", config_path.display());
            Self::default()
        };

        config.set_root(&root);
        config.validate()?;

        Ok(config)
    }

    /// Read and parse `path`, warning about keys mdlive does not know.
    fn from_path(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let (config, unknown) = Self::parse_with_ignored(&text)?;
        warn_unknown_keys(path, &unknown);
        Ok(config)
    }

    /// Parse TOML text. Returns the config plus the dotted paths of every
    /// key serde skipped.
    fn parse_with_ignored(text: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut unknown = Vec::new();
        let config: Self = serde_ignored::deserialize(toml::Deserializer::new(text), |key| {
            unknown.push(key.to_string());
        })?;
        Ok((config, unknown))
    }

    /// Set the root directory and resolve relative paths against it.
    pub fn set_root(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        self.source.dir = root.join(&self.source.dir);
        self.source.output = root.join(&self.source.output);
    }

    /// `path` relative to the project root when it lies inside it.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    /// Validate cross-section constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source.validate()?;
        self.serve.validate()?;
        Ok(())
    }
}

fn warn_unknown_keys(path: &Path, keys: &[String]) {
    if keys.is_empty() {
        return;
    }
    let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
    log!("warning"; "{} has unknown keys, ignoring: {}", name, keys.join(", "));
}

#[cfg(test)]
pub fn test_parse_config(content: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
