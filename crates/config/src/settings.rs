//! Main settings module

use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Placeholder for the localized validation reason in follow-up templates
pub const ERROR_PLACEHOLDER: &str = "{error}";
/// Placeholder for the question text in follow-up templates
pub const QUESTION_PLACEHOLDER: &str = "{question}";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Catalog lint issues are fatal in strict environments
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Path to the question catalog (YAML, JSON or TOML)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub messages: MessagesConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn default_catalog_path() -> String {
    "config/questions.yaml".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: RuntimeEnvironment::default(),
            catalog_path: default_catalog_path(),
            extraction: ExtractionConfig::default(),
            messages: MessagesConfig::default(),
            session: SessionConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Keyword lists for yes/no extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_affirmative_keywords")]
    pub affirmative_keywords: Vec<String>,
    #[serde(default = "default_negative_keywords")]
    pub negative_keywords: Vec<String>,
}

fn default_affirmative_keywords() -> Vec<String> {
    vec!["sí".to_string(), "si".to_string(), "yes".to_string()]
}

fn default_negative_keywords() -> Vec<String> {
    vec!["no".to_string(), "none".to_string()]
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            affirmative_keywords: default_affirmative_keywords(),
            negative_keywords: default_negative_keywords(),
        }
    }
}

/// User-facing strings
///
/// `too_short` and `too_long` may use `{min}` / `{max}`; follow-up templates
/// use `{error}` and `{question}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_required")]
    pub required: String,
    #[serde(default = "default_too_short")]
    pub too_short: String,
    #[serde(default = "default_too_long")]
    pub too_long: String,
    #[serde(default = "default_pattern_mismatch")]
    pub pattern_mismatch: String,
    #[serde(default = "default_unknown_question")]
    pub unknown_question: String,
    #[serde(default = "default_processing_error")]
    pub processing_error: String,
    /// Re-ask after a validation failure
    #[serde(default = "default_follow_up_template")]
    pub follow_up_template: String,
    /// Re-ask after an unexpected processing error
    #[serde(default = "default_fallback_template")]
    pub fallback_template: String,
}

fn default_required() -> String {
    "Este campo es obligatorio".to_string()
}

fn default_too_short() -> String {
    "La respuesta debe tener al menos {min} caracteres".to_string()
}

fn default_too_long() -> String {
    "La respuesta no puede tener más de {max} caracteres".to_string()
}

fn default_pattern_mismatch() -> String {
    "El formato de la respuesta no es válido".to_string()
}

fn default_unknown_question() -> String {
    "Question mapping not found".to_string()
}

fn default_processing_error() -> String {
    "Error processing response".to_string()
}

fn default_follow_up_template() -> String {
    "{error}. Por favor, {question}".to_string()
}

fn default_fallback_template() -> String {
    "No pude entender tu respuesta. {question}".to_string()
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            required: default_required(),
            too_short: default_too_short(),
            too_long: default_too_long(),
            pattern_mismatch: default_pattern_mismatch(),
            unknown_question: default_unknown_question(),
            processing_error: default_processing_error(),
            follow_up_template: default_follow_up_template(),
            fallback_template: default_fallback_template(),
        }
    }
}

/// Interview session behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Failed attempts before a question is skipped; 0 re-asks forever
    #[serde(default)]
    pub max_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_attempts: 0 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "catalog_path".to_string(),
                message: "Must not be empty".to_string(),
            });
        }

        self.validate_extraction()?;
        self.validate_messages()?;
        self.validate_observability()?;

        Ok(())
    }

    fn validate_extraction(&self) -> Result<(), ConfigError> {
        let lists = [
            ("extraction.affirmative_keywords", &self.extraction.affirmative_keywords),
            ("extraction.negative_keywords", &self.extraction.negative_keywords),
        ];
        for (field, keywords) in lists {
            if keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "At least one non-blank keyword is required".to_string(),
                });
            }
        }
        Ok(())
    }

    fn validate_messages(&self) -> Result<(), ConfigError> {
        let messages = &self.messages;

        if !messages.follow_up_template.contains(ERROR_PLACEHOLDER)
            || !messages.follow_up_template.contains(QUESTION_PLACEHOLDER)
        {
            return Err(ConfigError::InvalidValue {
                field: "messages.follow_up_template".to_string(),
                message: format!(
                    "Must contain {} and {}",
                    ERROR_PLACEHOLDER, QUESTION_PLACEHOLDER
                ),
            });
        }

        if !messages.fallback_template.contains(QUESTION_PLACEHOLDER) {
            return Err(ConfigError::InvalidValue {
                field: "messages.fallback_template".to_string(),
                message: format!("Must contain {}", QUESTION_PLACEHOLDER),
            });
        }

        Ok(())
    }

    fn validate_observability(&self) -> Result<(), ConfigError> {
        let level = self.observability.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "observability.log_level".to_string(),
                message: format!("Must be one of {:?}, got {}", LOG_LEVELS, level),
            });
        }
        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority: env vars > config/{env} > config/default > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from("config", env)
}

/// Same layering as [`load_settings`], reading files from `config_dir`
pub fn load_settings_from<P: AsRef<Path>>(
    config_dir: P,
    env: Option<&str>,
) -> Result<Settings, ConfigError> {
    load_layered(config_dir.as_ref(), env, None)
}

fn load_layered(
    config_dir: &Path,
    env: Option<&str>,
    env_vars: Option<Map<String, String>>,
) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    let default_path = config_dir.join("default");
    builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        let env_path = config_dir.join(env_name);
        builder = builder.add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("PATIENT_INTAKE")
            .separator("__")
            .try_parsing(true)
            .source(env_vars),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        environment = ?settings.environment,
        catalog_path = %settings.catalog_path,
        "Settings loaded"
    );

    Ok(settings)
}
