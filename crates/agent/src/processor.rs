//! Response Processor
//!
//! Runs one raw answer through lookup, normalization, type extraction,
//! validation and follow-up composition. Every path ends in an
//! [`ExtractionResult`]; nothing crosses this boundary as `Err` or panic.

use std::sync::Arc;

use patient_intake_config::Settings;
use patient_intake_core::{
    AnswerValue, Catalog, ExtractionResult, IntakeRecord, QuestionDefinition, RejectionKind,
};
use patient_intake_text_processing::{
    normalize_answer, AnswerExtractor, TextProcessingError, ValidationOutcome, Validator,
    YesNoKeywords,
};

use crate::follow_up::FollowUpComposer;

/// Turns raw patient answers into accepted values or re-prompts
pub struct ResponseProcessor {
    catalog: Arc<Catalog>,
    extractor: AnswerExtractor,
    validator: Validator,
    composer: FollowUpComposer,
}

impl ResponseProcessor {
    /// Processor with default keywords and messages
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            extractor: AnswerExtractor::new(),
            validator: Validator::new(),
            composer: FollowUpComposer::default(),
        }
    }

    pub fn from_settings(catalog: Arc<Catalog>, settings: &Settings) -> Self {
        let keywords = YesNoKeywords::new(
            settings.extraction.affirmative_keywords.clone(),
            settings.extraction.negative_keywords.clone(),
        );

        Self {
            catalog,
            extractor: AnswerExtractor::with_keywords(keywords),
            validator: Validator::new(),
            composer: FollowUpComposer::new(settings.messages.clone()),
        }
    }

    pub fn composer(&self) -> &FollowUpComposer {
        &self.composer
    }

    /// Process one answer to the question registered under `question_id`
    ///
    /// `_current_record` is accepted for callers that track the record being
    /// filled; no rule consults it yet.
    pub fn process(
        &self,
        question_id: &str,
        raw_response: &str,
        _current_record: Option<&IntakeRecord>,
    ) -> ExtractionResult {
        let definition = match self.catalog.require(question_id) {
            Ok(definition) => definition,
            Err(e) => {
                tracing::warn!(error = %e, "No question mapping registered");
                return ExtractionResult::Rejected {
                    kind: RejectionKind::UnknownQuestion,
                    error: self.composer.messages().unknown_question.clone(),
                    follow_up_question: None,
                };
            }
        };

        match self.extract_and_validate(&definition, raw_response) {
            Ok((value, ValidationOutcome::Valid)) => {
                tracing::debug!(
                    question_id,
                    field = %definition.field_name,
                    value = %value,
                    "Answer accepted"
                );
                ExtractionResult::Accepted {
                    field_name: definition.field_name.clone(),
                    value,
                }
            }
            Ok((value, ValidationOutcome::Invalid(failure))) => {
                tracing::debug!(
                    question_id,
                    value = %value,
                    failure = %failure,
                    "Answer rejected"
                );
                let error = self.composer.describe(&failure);
                let follow_up = self.composer.compose(&definition, &error);
                ExtractionResult::Rejected {
                    kind: RejectionKind::ValidationFailed(failure),
                    error,
                    follow_up_question: Some(follow_up),
                }
            }
            Err(e) => {
                tracing::warn!(question_id, error = %e, "Failed to process response");
                ExtractionResult::Rejected {
                    kind: RejectionKind::ExtractionException,
                    error: self.composer.messages().processing_error.clone(),
                    follow_up_question: Some(self.composer.compose_fallback(&definition)),
                }
            }
        }
    }

    fn extract_and_validate(
        &self,
        definition: &QuestionDefinition,
        raw_response: &str,
    ) -> Result<(AnswerValue, ValidationOutcome), TextProcessingError> {
        let cleaned = normalize_answer(raw_response);
        let value = self
            .extractor
            .extract(definition.expected_type, &cleaned, &definition.options);
        let outcome = self
            .validator
            .validate(&value, definition.validation_rules.as_ref())?;
        Ok((value, outcome))
    }
}
