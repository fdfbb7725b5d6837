//! Build configuration from textree.toml

use crate::hierarchy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up by [`BuildConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "textree.toml";

/// Settings that control heading detection and tokenizing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Heading commands in top-down order, tried before any synthetic `sub...section` name
    pub canonical_levels: Vec<String>,

    /// Largest number of `sub` prefixes generated for synthetic level names
    pub max_sub_prefixes: usize,

    /// Brace/environment nesting beyond which the tokenizer keeps raw text
    pub max_nesting: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            canonical_levels: vec![
                "chapter".to_string(),
                "section".to_string(),
                "subsection".to_string(),
            ],
            max_sub_prefixes: 8,
            max_nesting: 256,
        }
    }
}

impl BuildConfig {
    /// Load configuration from a textree.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(BuildConfig)` - Loaded configuration, missing keys filled with defaults
    /// * `Err(ConfigError)` - Error reading or parsing the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;

        let config: BuildConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))?;

        log::debug!("Loaded build configuration from {}", path.display());
        Ok(config)
    }

    /// Load textree.toml from `dir` when it exists, otherwise use defaults
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self, ConfigError> {
        let candidate = dir.as_ref().join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Whether `name` is something lookups may legitimately ask for
    ///
    /// Canonical level names and any `(sub)*section` name qualify, whether or not
    /// the current document uses them.
    pub fn is_heading_keyword(&self, name: &str) -> bool {
        hierarchy::is_heading_keyword(&self.canonical_levels, name)
    }
}

/// Errors that can occur when loading build configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
    /// IO error when reading the file
    IoError(PathBuf, std::io::Error),

    /// Error parsing TOML
    ParseError(PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => write!(f, "IO error reading {}: {}", path.display(), e),
            ConfigError::ParseError(path, e) => {
                write!(f, "TOML parse error in {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
