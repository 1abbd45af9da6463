//! Intake record and progress statistics

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::answer::AnswerValue;
use crate::question::QuestionDefinition;

/// Answers keyed by question id, as collected by the conversation
pub type ExtractedAnswers = HashMap<String, AnswerValue>;

/// Structured record being filled by the interview
///
/// Fields are only written through a `QuestionDefinition`, so every key is a
/// field declared by some catalog question.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IntakeRecord {
    fields: BTreeMap<String, AnswerValue>,
}

impl IntakeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an answer under the definition's target field, replacing any
    /// previous value
    pub fn set_answer(
        &mut self,
        definition: &QuestionDefinition,
        value: AnswerValue,
    ) -> Option<AnswerValue> {
        self.fields.insert(definition.field_name.clone(), value)
    }

    pub fn get(&self, field_name: &str) -> Option<&AnswerValue> {
        self.fields.get(field_name)
    }

    pub fn contains(&self, field_name: &str) -> bool {
        self.fields.contains_key(field_name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Completion of a question set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessStats {
    pub total_questions: usize,
    pub answered_questions: usize,
    /// Rounded to the nearest integer; 0 for an empty question set
    pub completeness_percentage: u32,
    /// Question texts still awaiting an answer
    pub missing_questions: Vec<String>,
}

impl CompletenessStats {
    pub fn is_complete(&self) -> bool {
        self.answered_questions == self.total_questions
    }
}

/// `round(answered / total * 100)`, with an empty set counting as 0%
pub fn completion_percentage(answered: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (answered as f64 / total as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::ExpectedType;

    #[test]
    fn test_set_answer_uses_field_name() {
        let def = QuestionDefinition::new("firstName", "personal", "¿Nombre?", ExpectedType::Text);
        let mut record = IntakeRecord::new();

        assert!(record.set_answer(&def, AnswerValue::from("alex")).is_none());
        let previous = record.set_answer(&def, AnswerValue::from("alexa"));

        assert_eq!(previous, Some(AnswerValue::from("alex")));
        assert_eq!(record.get("firstName"), Some(&AnswerValue::from("alexa")));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_completion_percentage() {
        assert_eq!(completion_percentage(0, 0), 0);
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(1, 8), 13);
        assert_eq!(completion_percentage(4, 4), 100);
    }

    #[test]
    fn test_stats_wire_shape() {
        let stats = CompletenessStats {
            total_questions: 2,
            answered_questions: 1,
            completeness_percentage: 50,
            missing_questions: vec!["¿Edad?".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            serde_json::json!({
                "totalQuestions": 2,
                "answeredQuestions": 1,
                "completenessPercentage": 50,
                "missingQuestions": ["¿Edad?"]
            })
        );
    }
}
