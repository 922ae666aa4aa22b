//! Configuration management for hvacd.
//!
//! Loads settings from /etc/hvacd/config.toml (overridable via the
//! HVACD_CONFIG environment variable) or falls back to defaults. A missing
//! or unreadable file is not fatal: the daemon runs with defaults and the
//! LLM section decides on its own whether enhancement is available.

use hvac_common::llm::LlmConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default config file path
pub const CONFIG_PATH: &str = "/etc/hvacd/config.toml";

/// Environment variable overriding the config file path
pub const CONFIG_ENV: &str = "HVACD_CONFIG";

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the API listener
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Allow any origin. The browser frontend is served separately, so the
    /// API answers cross-origin by default.
    #[serde(default = "default_permissive_cors")]
    pub permissive_cors: bool,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_permissive_cors() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            permissive_cors: default_permissive_cors(),
        }
    }
}

/// Daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

impl Config {
    /// Load from the configured path, falling back to defaults
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Load from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Invalid config at {}, using defaults: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
