//! Configuration type definitions
//!
//! These types represent the runtime configuration for the Zucchina server
//! and CLI. Every field has a default, so an empty file is a valid config.

use serde::{Deserialize, Serialize};

/// Root configuration for Zucchina
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ZucchinaConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Document fetching configuration
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Global logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Public base URL the rendered documents are served from.
    /// The managed-config line of every served document points here.
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Country hint used when a request carries none
    #[serde(default = "default_country")]
    pub default_country: String,

    /// Whether request tokens may name local files
    #[serde(default)]
    pub allow_local_sources: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            public_url: default_public_url(),
            default_country: default_country(),
            allow_local_sources: false,
        }
    }
}

impl ServerConfig {
    /// URL a rendered document identified by `token` is served from
    pub fn document_url(&self, token: &str) -> String {
        format!("{}/{}", self.public_url.trim_end_matches('/'), token)
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_public_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_country() -> String {
    "IT".to_string()
}

/// Document fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent sent with remote requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds (None = no timeout)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

fn default_user_agent() -> String {
    "Zuccina 1.0.1".to_string()
}

/// Global logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
