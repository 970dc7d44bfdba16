//! Configuration loading and management
//!
//! Handles parsing of `taskman.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file inside the data directory
pub const CONFIG_FILENAME: &str = "taskman.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

/// Storage-related configuration: backing and derived artifact file names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Credential backing artifact
    #[serde(default = "default_user_file")]
    pub user_file: String,

    /// Task backing artifact
    #[serde(default = "default_task_file")]
    pub task_file: String,

    /// Task-level report artifact
    #[serde(default = "default_task_overview_file")]
    pub task_overview_file: String,

    /// Identity-level report artifact
    #[serde(default = "default_user_overview_file")]
    pub user_overview_file: String,
}

fn default_user_file() -> String {
    "user.txt".to_string()
}

fn default_task_file() -> String {
    "tasks.txt".to_string()
}

fn default_task_overview_file() -> String {
    "task_overview.txt".to_string()
}

fn default_user_overview_file() -> String {
    "user_overview.txt".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            user_file: default_user_file(),
            task_file: default_task_file(),
            task_overview_file: default_task_overview_file(),
            user_overview_file: default_user_overview_file(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Identity permitted to view statistics; also seeded on first run
    #[serde(default = "default_admin_name")]
    pub admin_name: String,

    /// Secret for the seeded admin identity
    #[serde(default = "default_admin_secret")]
    pub admin_secret: String,
}

fn default_admin_name() -> String {
    "admin".to_string()
}

fn default_admin_secret() -> String {
    "password".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_name: default_admin_name(),
            admin_secret: default_admin_secret(),
        }
    }
}

impl Config {
    /// Load configuration from a specific file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(CONFIG_FILENAME);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.auth.admin_name.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "auth.admin_name cannot be empty".to_string(),
            ));
        }

        let names = [
            &self.storage.user_file,
            &self.storage.task_file,
            &self.storage.task_overview_file,
            &self.storage.user_overview_file,
        ];
        for name in names {
            if name.trim().is_empty() {
                return Err(crate::error::Error::InvalidConfig(
                    "storage file names cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
