//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::AmlStoreConfig;
use config::ConfigError;
use std::path::{Path, PathBuf};

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Platform config file (`<config dir>/amlstore/config.toml`), if the platform has one.
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "amlstore", "amlstore")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the global file, an optional explicit file, and environment.
    pub fn load(config_file: Option<&Path>) -> Result<AmlStoreConfig, ConfigError> {
        MergeService::load(config_file)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<AmlStoreConfig, ConfigError> {
        MergeService::load_from_file(path)
    }

    /// Create default configuration.
    pub fn default() -> AmlStoreConfig {
        AmlStoreConfig::default()
    }
}
