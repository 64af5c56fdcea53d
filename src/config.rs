//! Configuration file support
//!
//! Loads settings from ~/.rangelight.toml (or %USERPROFILE%\.rangelight.toml
//! on Windows).
//!
//! Example:
//! ```text
//! # rangelight configuration
//! syntax-dir = "/usr/share/rangelight"
//! cache-rule-sets = true
//!
//! [palette]
//! keyword = "hsl(286, 60%, 67%)"
//! string = "#98c379"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::{HighlightError, Result};

const CONFIG_FILE: &str = ".rangelight.toml";

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct HighlighterConfig {
    /// Directory holding `syntax.<name>.toml` rule sets
    pub syntax_dir: Option<PathBuf>,
    /// Whether loaded rule sets are reused across highlight calls
    pub cache_rule_sets: bool,
    /// Initial palette override, category to color
    pub palette: Option<BTreeMap<String, String>>,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            syntax_dir: None,
            cache_rule_sets: true,
            palette: None,
        }
    }
}

impl HighlighterConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(CONFIG_FILE))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(CONFIG_FILE))
        }
    }

    /// Load configuration from the default location.
    ///
    /// A missing or broken file yields defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match Self::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring config file");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file. A missing file yields defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| HighlightError::Config(e.to_string()))
    }
}
