//! Configuration module

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Directory holding a local config, like `.git`
pub const CONFIG_DIR: &str = ".pointree";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub graph: GraphConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Points server connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server URL (e.g., "http://127.0.0.1:5000")
    #[serde(default = "default_server_url")]
    pub url: String,

    /// Request timeout in seconds; unset means wait for the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            timeout_secs: None,
        }
    }
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

/// Graph node sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_base_size")]
    pub base_size: f64,

    #[serde(default = "default_level_decrease")]
    pub level_decrease: f64,

    #[serde(default = "default_min_size")]
    pub min_size: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_size: default_base_size(),
            level_decrease: default_level_decrease(),
            min_size: default_min_size(),
        }
    }
}

fn default_base_size() -> f64 {
    30.0
}

fn default_level_decrease() -> f64 {
    6.0
}

fn default_min_size() -> f64 {
    12.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Label for points with a blank title
    #[serde(default = "default_unnamed_label")]
    pub unnamed_label: String,

    /// Colored terminal output
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            unnamed_label: default_unnamed_label(),
            color: default_color(),
        }
    }
}

fn default_unnamed_label() -> String {
    "Unnamed Item".to_string()
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load config from default locations
    pub fn load() -> Result<Self> {
        // Try local config first, then global
        if let Some(local) = Self::find_local_config() {
            return Self::load_from(&local);
        }

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                return Self::load_from(&global);
            }
        }

        Ok(Self::default())
    }

    /// Load from an explicit path if given, else from default locations
    pub fn load_with(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Find local .pointree/config.toml walking up directories
    pub fn find_local_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_config_from(&current)
    }

    fn find_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_DIR).join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Get global config path (~/.pointree/config.toml)
    pub fn global_config_path() -> Option<PathBuf> {
        directories::UserDirs::new().map(|u| u.home_dir().join(CONFIG_DIR).join("config.toml"))
    }
}
