//! MergeService: orchestrates sources, applies defaults, deserializes to AmlStoreConfig.

use crate::config::sources::{environment, file};
use crate::config::{AmlStoreConfig, DEFAULT_ADDRESS};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(config_file: Option<&Path>) -> Result<AmlStoreConfig, ConfigError> {
        let builder = Self::builder_with_defaults()?;
        let builder = file::add_global_to_builder(builder);
        let builder = match config_file {
            Some(path) => file::add_required_to_builder(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<AmlStoreConfig, ConfigError> {
        let builder = Self::builder_with_defaults()?;
        let builder = file::add_required_to_builder(builder, path)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.address", DEFAULT_ADDRESS)?
            .set_default("logging.enabled", true)?
            .set_default("logging.level", "info")
    }
}
