//! Backend configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid config:
//!
//! ```toml
//! create_on_write = true
//! recursive_remove = false
//! read_only = false
//!
//! [separators]
//! segment = "/"
//! extension = "."
//! ```

use std::path::Path as HostPath;

use serde::Deserialize;
use thiserror::Error;

use crate::path::Separators;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Segment and extension separators must differ.
    #[error("segment and extension separators are both {0:?}")]
    InvalidSeparators(char),
}

/// Behaviour knobs shared by the bundled backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FsConfig {
    pub separators: Separators,

    /// `write` to a missing path creates the file when its parent is an
    /// existing directory. Off by default: callers `add` first.
    pub create_on_write: bool,

    /// `remove` on a non-empty directory removes the whole subtree instead
    /// of failing.
    pub recursive_remove: bool,

    /// Refuse every mutation.
    pub read_only: bool,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            separators: Separators::DEFAULT,
            create_on_write: false,
            recursive_remove: false,
            read_only: false,
        }
    }
}

impl FsConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: FsConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<HostPath>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.separators.segment == self.separators.extension {
            return Err(ConfigError::InvalidSeparators(self.separators.segment));
        }
        Ok(())
    }

    pub fn with_create_on_write(mut self, enabled: bool) -> Self {
        self.create_on_write = enabled;
        self
    }

    pub fn with_recursive_remove(mut self, enabled: bool) -> Self {
        self.recursive_remove = enabled;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_separators(mut self, separators: Separators) -> Self {
        self.separators = separators;
        self
    }
}
