//! Configuration loader

use crate::config::ZucchinaConfig;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Configuration loader for various formats
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ZucchinaConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext {
            "json" => Self::from_json(&content),
            "toml" | "" => Self::from_toml(&content),
            _ => Err(Error::Config(format!("Unknown config format: {}", ext))),
        }
    }

    /// Load configuration from `path`, or from the default location.
    /// A missing default file yields the default configuration.
    pub fn load_or_default(path: Option<&Path>) -> Result<ZucchinaConfig> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::load(path)
            }
            _ => Ok(ZucchinaConfig::default()),
        }
    }

    /// `$XDG_CONFIG_HOME/zucchina/config.toml` (or the platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zucchina").join("config.toml"))
    }

    /// Parse JSON configuration
    pub fn from_json(content: &str) -> Result<ZucchinaConfig> {
        serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid JSON: {}", e)))
    }

    /// Parse TOML configuration
    pub fn from_toml(content: &str) -> Result<ZucchinaConfig> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }
}
