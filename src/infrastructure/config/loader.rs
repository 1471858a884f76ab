use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Log directory cannot be empty")]
    EmptyLogDirectory,

    #[error("Default category name cannot be empty")]
    EmptyDefaultCategory,

    #[error("Invalid max_file_size_bytes: {0}. Must be at least 1")]
    InvalidMaxFileSize(u64),

    #[error("Invalid max_rollover_index: {0}. Must be at least 1")]
    InvalidMaxRolloverIndex(u32),

    #[error("Invalid default category name '{0}': must not contain path separators")]
    InvalidCategoryName(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. catlog.yaml in the working directory (optional)
    /// 3. Environment variables (CATLOG_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("catlog.yaml"))
            .merge(Env::prefixed("CATLOG_"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.log_directory.as_os_str().is_empty() {
            return Err(ConfigError::EmptyLogDirectory);
        }

        if config.default_category_name.is_empty() {
            return Err(ConfigError::EmptyDefaultCategory);
        }

        if config.default_category_name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidCategoryName(
                config.default_category_name.clone(),
            ));
        }

        if config.max_file_size_bytes == 0 {
            return Err(ConfigError::InvalidMaxFileSize(config.max_file_size_bytes));
        }

        if config.max_rollover_index == 0 {
            return Err(ConfigError::InvalidMaxRolloverIndex(
                config.max_rollover_index,
            ));
        }

        Ok(())
    }
}
