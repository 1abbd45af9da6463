//! Question Catalog Configuration
//!
//! The catalog file is an ordered list of question entries:
//!
//! ```yaml
//! questions:
//!   - id: firstName
//!     field_name: firstName
//!     category: personal
//!     question_text: "¿Cuál es su nombre de pila?"
//!     type: text
//!     validation_rules:
//!       required: true
//!       min_length: 2
//! ```
//!
//! List order is registration order, which is also the order of
//! `Catalog::by_category` and of completeness reports.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use patient_intake_core::{Catalog, CatalogEntry};

use crate::ConfigError;

/// Question catalog loaded from a YAML, JSON or TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionsConfig {
    #[serde(default)]
    pub questions: Vec<CatalogEntry>,
}

/// Problem found while linting a catalog file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIssue {
    pub id: String,
    pub message: String,
}

impl std::fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Question '{}': {}", self.id, self.message)
    }
}

impl QuestionsConfig {
    /// Load from a file, choosing the format by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let config = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            "json" => serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
            "toml" => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?
            }
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        tracing::info!(
            path = %path.display(),
            questions = config.questions.len(),
            "Loaded question catalog"
        );

        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Report inconsistencies without rejecting anything
    ///
    /// Checks for duplicate ids, blank field names, select questions without
    /// options and validation patterns that do not compile.
    pub fn lint(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for entry in &self.questions {
            if !seen.insert(entry.id.as_str()) {
                issues.push(CatalogIssue {
                    id: entry.id.clone(),
                    message: "duplicate id, the later entry wins".to_string(),
                });
            }

            if let Err(e) = entry.definition.check(&entry.id) {
                issues.push(CatalogIssue {
                    id: entry.id.clone(),
                    message: e.to_string(),
                });
            }

            let pattern = entry
                .definition
                .validation_rules
                .as_ref()
                .and_then(|r| r.pattern.as_deref());
            if let Some(pattern) = pattern {
                if let Err(e) = regex::Regex::new(pattern) {
                    issues.push(CatalogIssue {
                        id: entry.id.clone(),
                        message: format!("pattern does not compile: {}", e),
                    });
                }
            }
        }

        issues
    }

    /// Register every entry into a new catalog
    ///
    /// Lint issues are logged and handed back so the caller can decide
    /// whether they are fatal.
    pub fn into_catalog(self) -> (Catalog, Vec<CatalogIssue>) {
        let issues = self.lint();
        for issue in &issues {
            tracing::warn!(question_id = %issue.id, "{}", issue.message);
        }
        (Catalog::from_entries(self.questions), issues)
    }
}
