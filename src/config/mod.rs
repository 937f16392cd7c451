//! Configuration management for GlyphBox
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `GLYPHBOX__<section>__<key>`
//!
//! Examples:
//! - `GLYPHBOX__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `GLYPHBOX__FETCH__MAX_FONT_BYTES=50MB`
//! - `GLYPHBOX__STORAGE__BUCKET=fonts-prod`
//!
//! The deployment environment label comes from `GLYPHBOX_ENV` (or
//! `DEPLOY_ENV`), defaulting to `development`; storage credentials are read
//! only from the environment, never from the TOML file.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/glyphbox.toml`.
//! This can be overridden using the `GLYPHBOX_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{
    ApiLimits, Config, FetchConfig, PipelineConfig, ServerConfig, StorageConfig, StorageProvider,
    SubsetConfig,
};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or validation
    /// fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
