//! Configuration management for the patient intake engine
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (PATIENT_INTAKE__ prefix)
//!
//! # Question Catalog
//!
//! The question catalog is configuration data kept in its own file
//! (`settings.catalog_path`, YAML by default) and loaded through
//! `QuestionsConfig`.

pub mod questions;
pub mod settings;

pub use questions::{CatalogIssue, QuestionsConfig};
pub use settings::{
    load_settings, load_settings_from, ExtractionConfig, MessagesConfig, ObservabilityConfig,
    RuntimeEnvironment, SessionConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
