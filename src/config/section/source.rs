//! `[source]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [source]
//! dir = "builds/markdown"            # Source root, watched recursively
//! pattern = "**/*.md"                # Document glob, relative to `dir`
//! output = "builds/markdown/output"  # Rendered HTML destination
//! ```
//!
//! `output` may sit inside `dir`. It is never scanned for documents.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Source tree layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source root directory.
    pub dir: PathBuf,

    /// Glob selecting documents, matched against paths relative to `dir`.
    pub pattern: String,

    /// Output directory for rendered HTML.
    pub output: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("builds/markdown"),
            pattern: "**/*.md".to_string(),
            output: PathBuf::from("builds/markdown/output"),
        }
    }
}

impl SourceConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        glob::Pattern::new(&self.pattern).map_err(|e| {
            ConfigError::Validation(format!("source.pattern `{}`: {}", self.pattern, e.msg))
        })?;
        if self.dir == self.output {
            return Err(ConfigError::Validation(
                "source.output must differ from source.dir".into(),
            ));
        }
        Ok(())
    }
}
