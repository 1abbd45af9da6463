//! Intake engine facade
//!
//! Bundles the shared catalog with the processor, mapper and tracker so a
//! chat endpoint only needs one handle.

use std::sync::Arc;

use patient_intake_config::{ConfigError, QuestionsConfig, Settings};
use patient_intake_core::{
    Catalog, CatalogEntry, CompletenessStats, ExtractedAnswers, ExtractionResult, IntakeRecord,
    QuestionDefinition,
};

use crate::processor::ResponseProcessor;
use crate::progress::{CompletenessTracker, RecordMapper};
use crate::AgentError;

/// Answer extraction and validation engine for one question catalog
pub struct IntakeEngine {
    catalog: Arc<Catalog>,
    processor: ResponseProcessor,
    mapper: RecordMapper,
    tracker: CompletenessTracker,
    settings: Settings,
}

impl IntakeEngine {
    pub fn new(catalog: Arc<Catalog>, settings: Settings) -> Self {
        Self {
            processor: ResponseProcessor::from_settings(Arc::clone(&catalog), &settings),
            mapper: RecordMapper::new(Arc::clone(&catalog)),
            tracker: CompletenessTracker::new(Arc::clone(&catalog)),
            catalog,
            settings,
        }
    }

    /// Load the catalog file named by `settings.catalog_path`
    ///
    /// Lint issues are logged; in strict environments they abort startup.
    pub fn from_settings(settings: Settings) -> Result<Self, AgentError> {
        let (catalog, issues) = QuestionsConfig::load(&settings.catalog_path)?.into_catalog();
        if settings.environment.is_strict() && !issues.is_empty() {
            let message = issues
                .iter()
                .map(|issue| issue.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ConfigError::InvalidValue {
                field: "catalog_path".to_string(),
                message,
            }
            .into());
        }

        let catalog = Arc::new(catalog);
        tracing::info!(
            environment = ?settings.environment,
            questions = catalog.len(),
            "Intake engine ready"
        );

        Ok(Self::new(catalog, settings))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn register(&self, id: impl Into<String>, definition: QuestionDefinition) {
        self.catalog.register(id, definition);
    }

    pub fn register_batch(&self, entries: impl IntoIterator<Item = CatalogEntry>) {
        self.catalog.register_batch(entries);
    }

    pub fn get(&self, id: &str) -> Option<Arc<QuestionDefinition>> {
        self.catalog.get(id)
    }

    pub fn by_category(&self, category: &str) -> Vec<(String, Arc<QuestionDefinition>)> {
        self.catalog.by_category(category)
    }

    pub fn process(
        &self,
        question_id: &str,
        raw_response: &str,
        current_record: Option<&IntakeRecord>,
    ) -> ExtractionResult {
        self.processor
            .process(question_id, raw_response, current_record)
    }

    pub fn map_to_record(&self, extracted: &ExtractedAnswers) -> IntakeRecord {
        self.mapper.map_to_record(extracted)
    }

    pub fn completeness(
        &self,
        extracted: &ExtractedAnswers,
        category: Option<&str>,
    ) -> CompletenessStats {
        self.tracker.completeness(extracted, category)
    }

    pub fn completeness_by_category(
        &self,
        extracted: &ExtractedAnswers,
    ) -> Vec<(String, CompletenessStats)> {
        self.tracker.completeness_by_category(extracted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patient_intake_config::RuntimeEnvironment;
    use patient_intake_core::{AnswerValue, ExpectedType};
    use std::io::Write;

    const BROKEN_CATALOG: &str = r#"
questions:
  - id: gender
    field_name: gender
    category: personal
    question_text: "¿Sexo?"
    type: select
"#;

    fn catalog_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn settings_for(file: &tempfile::NamedTempFile, environment: RuntimeEnvironment) -> Settings {
        Settings {
            environment,
            catalog_path: file.path().display().to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_registration_visible_to_processing() {
        let engine = IntakeEngine::new(Arc::new(Catalog::new()), Settings::default());
        assert!(engine.get("age").is_none());

        engine.register(
            "age",
            QuestionDefinition::new("age", "personal", "¿Edad?", ExpectedType::Number),
        );
        let result = engine.process("age", "30", None);
        assert_eq!(result.extracted_value(), Some(&AnswerValue::Integer(30)));
        assert_eq!(engine.by_category("personal").len(), 1);
    }

    #[test]
    fn test_lint_issues_tolerated_in_development() {
        let file = catalog_file(BROKEN_CATALOG);
        let engine =
            IntakeEngine::from_settings(settings_for(&file, RuntimeEnvironment::Development))
                .unwrap();
        assert_eq!(engine.catalog().len(), 1);
    }

    #[test]
    fn test_lint_issues_fatal_in_production() {
        let file = catalog_file(BROKEN_CATALOG);
        let result =
            IntakeEngine::from_settings(settings_for(&file, RuntimeEnvironment::Production));
        match result {
            Err(AgentError::Config(ConfigError::InvalidValue { field, message })) => {
                assert_eq!(field, "catalog_path");
                assert!(message.contains("select question has no options"));
            }
            _ => panic!("expected lint issues to abort startup"),
        }
    }

    #[test]
    fn test_missing_catalog_file() {
        let settings = Settings {
            catalog_path: "missing/questions.yaml".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            IntakeEngine::from_settings(settings),
            Err(AgentError::Config(ConfigError::FileNotFound(_)))
        ));
    }
}
