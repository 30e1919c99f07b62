//! Configuration system for treequill.
//!
//! This module provides the configuration structure for treequill with sensible
//! defaults and support for serialization/deserialization via serde.
//! Configuration is loaded from a TOML file and can be overridden by
//! command-line arguments.
//!
//! # Example
//!
//! ```
//! use treequill::config::Config;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.save_debounce_ms, 500);
//! assert!(!config.compress);
//!
//! // Create custom configuration
//! let custom = Config {
//!     compress: true,
//!     indent_size: 4,
//!     ..Config::default()
//! };
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the treequill application.
///
/// All fields have sensible defaults via `Config::default()`.
///
/// # Fields
///
/// * `storage_dir` - Where stored trees live (default: platform data dir)
/// * `compress` - Gzip stored and exported documents (default: false)
/// * `save_debounce_ms` - Quiet period before a batched save is written (default: 500)
/// * `create_backup` - Create .bak files before overwriting (default: false)
/// * `indent_size` - Spaces per indentation level in written JSON (default: 2)
/// * `auto_expand_results` - Expand the selected search result's ancestors in the display (default: true)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory for stored trees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// Gzip stored documents
    #[serde(default)]
    pub compress: bool,

    /// Quiet period, in milliseconds, before a batched save is written
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,

    /// Create .bak files before overwriting
    #[serde(default)]
    pub create_backup: bool,

    /// Number of spaces per indentation level
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Expand the selected result's ancestors in the display projection
    #[serde(default = "default_auto_expand_results")]
    pub auto_expand_results: bool,
}

/// Returns the default debounce period.
fn default_save_debounce_ms() -> u64 {
    500
}

/// Returns the default indentation size.
fn default_indent_size() -> usize {
    2
}

fn default_auto_expand_results() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: None,
            compress: false,
            save_debounce_ms: default_save_debounce_ms(),
            create_backup: false,
            indent_size: default_indent_size(),
            auto_expand_results: default_auto_expand_results(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/treequill/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("treequill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(path),
            None => Self::default(),
        }
    }

    /// Loads configuration from a specific file, falling back to defaults.
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, toml_string)?;

        Ok(())
    }

    /// Returns the storage directory, defaulting to `<data dir>/treequill`.
    pub fn resolved_storage_dir(&self) -> Option<PathBuf> {
        self.storage_dir.clone().or_else(|| {
            dirs::data_dir().map(|mut path| {
                path.push("treequill");
                path
            })
        })
    }

    /// Returns the debounce period as a `Duration`.
    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}
