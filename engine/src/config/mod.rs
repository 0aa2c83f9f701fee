//! Configuration management
//!
//! This module handles loading, validation, and management of the driver
//! configuration. Configuration is stored in TOML format at
//! ~/.executive-edge/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level
//! - **content**: Optional catalog file replacing the built-in assessment content
//! - **display**: Report options for the terminal driver
//!
//! # Path Expansion
//!
//! `content.catalog` supports `~` expansion. The file is read and validated
//! when the catalog is requested, not when the config is loaded.
//!
//! # Examples
//!
//! ```no_run
//! use edge_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Log level: {}", config.core.log_level);
//! let catalog = config.catalog()?;
//! println!("{} scenarios", catalog.scenarios.len());
//! # Ok(())
//! # }
//! ```

use sdk::catalog::Catalog;
use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Valid `core.log_level` values
const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Core settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Assessment content
    #[serde(default)]
    pub content: ContentConfig,

    /// Report display options
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Assessment content configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    /// JSON catalog file (supports ~ expansion). Built-in content when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

/// Report display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// List per-question response times in the text report
    #[serde(default = "default_true")]
    pub show_timings: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_timings: default_true(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the default location
    /// (~/.executive-edge/config.toml), writing defaults there if the file
    /// doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or written
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, EngineError> {
        let mut config: Config = toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;

        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config = Self::default();

        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.executive-edge/config.toml)
    fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".executive-edge").join("config.toml"))
    }

    /// Validate fields and expand paths
    fn validate_and_process(&mut self) -> Result<(), EngineError> {
        if !VALID_LOG_LEVELS.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if let Some(catalog) = &self.content.catalog {
            self.content.catalog = Some(expand_path(catalog)?);
        }

        Ok(())
    }

    /// The assessment content this configuration selects
    ///
    /// # Errors
    ///
    /// Returns `Config` if the catalog file cannot be read, or
    /// `InvalidCatalog` if its content fails validation.
    pub fn catalog(&self) -> Result<Catalog, EngineError> {
        match &self.content.catalog {
            None => Ok(Catalog::builtin()),
            Some(path) => {
                let json = fs::read_to_string(path).map_err(|e| {
                    EngineError::Config(format!("Failed to read catalog {:?}: {}", path, e))
                })?;
                Catalog::from_json(&json)
            }
        }
    }
}

/// Expand ~ in path to user's home directory
fn expand_path(path: &Path) -> Result<PathBuf, EngineError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| EngineError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}
