//! Configuration file handling.
//!
//! This module provides loading and saving of pipfix configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/pipfix/config.toml` (or `$XDG_CONFIG_HOME/pipfix/`)
//! - macOS: `~/Library/Application Support/pipfix/config.toml`
//! - Windows: `%APPDATA%\pipfix\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! python = "/usr/bin/python3"
//! vendor_markers = ["ubuntu", "zorin", "debian"]
//! log_level = "warn"
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::version::VendorMarkers;

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use pipfix::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Interpreter: {}", config.python);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interpreter used to run `-m pip list`.
    ///
    /// Default: `python3` (`python` on Windows)
    pub python: String,

    /// Substrings that mark a vendor-suffixed version, matched
    /// case-insensitively.
    ///
    /// Default: `["ubuntu", "zorin"]`
    pub vendor_markers: Vec<String>,

    /// Log filter used when `RUST_LOG` is not set.
    ///
    /// Default: "warn"
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let python = if cfg!(target_os = "windows") {
            "python"
        } else {
            "python3"
        };

        Self {
            python: python.to_string(),
            vendor_markers: VendorMarkers::default().as_slice().to_vec(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path, with the same rules as
    /// [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use pipfix::Config;
    ///
    /// let path = Config::config_path();
    /// assert!(path.ends_with("pipfix/config.toml"));
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pipfix")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Vendor markers as a matcher.
    pub fn markers(&self) -> VendorMarkers {
        VendorMarkers::new(&self.vendor_markers)
    }
}
