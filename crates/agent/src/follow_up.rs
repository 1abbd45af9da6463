//! Follow-up composition
//!
//! Turns a validation failure into a re-ask that repeats the original
//! question. The composer only combines the localized reason with the
//! question text; it never adds anything else.

use patient_intake_config::settings::{ERROR_PLACEHOLDER, QUESTION_PLACEHOLDER};
use patient_intake_config::MessagesConfig;
use patient_intake_core::{QuestionDefinition, ValidationFailure};

/// Renders validation reasons and follow-up prompts from configured strings
#[derive(Debug, Clone, Default)]
pub struct FollowUpComposer {
    messages: MessagesConfig,
}

impl FollowUpComposer {
    pub fn new(messages: MessagesConfig) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &MessagesConfig {
        &self.messages
    }

    /// Localized reason for a failed rule
    pub fn describe(&self, failure: &ValidationFailure) -> String {
        match failure {
            ValidationFailure::Required => self.messages.required.clone(),
            ValidationFailure::TooShort { min_length } => {
                let min = min_length.to_string();
                fill(&self.messages.too_short, &[("{min}", min.as_str())])
            }
            ValidationFailure::TooLong { max_length } => {
                let max = max_length.to_string();
                fill(&self.messages.too_long, &[("{max}", max.as_str())])
            }
            ValidationFailure::PatternMismatch { .. } => self.messages.pattern_mismatch.clone(),
        }
    }

    /// `"{error}. Por favor, {question}"` with the question lowercased
    pub fn compose(&self, definition: &QuestionDefinition, error: &str) -> String {
        let question = definition.question_text.to_lowercase();
        fill(
            &self.messages.follow_up_template,
            &[(ERROR_PLACEHOLDER, error), (QUESTION_PLACEHOLDER, question.as_str())],
        )
    }

    /// Generic re-ask used when processing failed unexpectedly
    pub fn compose_fallback(&self, definition: &QuestionDefinition) -> String {
        fill(
            &self.messages.fallback_template,
            &[(QUESTION_PLACEHOLDER, definition.question_text.as_str())],
        )
    }
}

/// Single-pass placeholder substitution
///
/// Substituted values are never scanned again, so an error text containing
/// `{question}` is emitted literally.
fn fill(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    loop {
        let next = substitutions
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|pos| (pos, *key, *value)))
            .min_by_key(|(pos, _, _)| *pos);

        match next {
            Some((pos, key, value)) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + key.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}
