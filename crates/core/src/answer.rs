//! Answer values and per-turn extraction results

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Typed candidate value produced by an extractor
///
/// Only a successful number extraction yields `Integer`; dates, yes/no
/// answers, select options and every raw fallback are `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Integer(i64),
    Text(String),
}

impl AnswerValue {
    /// True for blank text; integers are never blank
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Integer(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl std::fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

/// Which validation rule rejected a value
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationFailure {
    #[error("value is required")]
    Required,

    #[error("value must be at least {min_length} characters")]
    TooShort { min_length: usize },

    #[error("value must be at most {max_length} characters")]
    TooLong { max_length: usize },

    #[error("value does not match pattern {pattern}")]
    PatternMismatch { pattern: String },
}

/// Why a turn did not produce a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "failure", rename_all = "snake_case")]
pub enum RejectionKind {
    /// No definition registered for the id; not retryable
    UnknownQuestion,
    /// The extracted value broke a rule; re-asked via follow-up
    ValidationFailed(ValidationFailure),
    /// Unexpected fault while extracting or validating; generic re-ask
    ExtractionException,
}

impl RejectionKind {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::UnknownQuestion)
    }
}

/// Outcome of processing one answer
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    Accepted {
        field_name: String,
        value: AnswerValue,
    },
    Rejected {
        kind: RejectionKind,
        /// Human-readable reason
        error: String,
        /// Re-prompt to send back verbatim
        follow_up_question: Option<String>,
    },
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn extracted_value(&self) -> Option<&AnswerValue> {
        match self {
            Self::Accepted { value, .. } => Some(value),
            Self::Rejected { .. } => None,
        }
    }

    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Accepted { field_name, .. } => Some(field_name),
            Self::Rejected { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Rejected { error, .. } => Some(error),
            Self::Accepted { .. } => None,
        }
    }

    pub fn rejection_kind(&self) -> Option<&RejectionKind> {
        match self {
            Self::Rejected { kind, .. } => Some(kind),
            Self::Accepted { .. } => None,
        }
    }

    pub fn needs_follow_up(&self) -> bool {
        matches!(
            self,
            Self::Rejected {
                follow_up_question: Some(_),
                ..
            }
        )
    }

    pub fn follow_up_question(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                follow_up_question, ..
            } => follow_up_question.as_deref(),
            Self::Accepted { .. } => None,
        }
    }
}

/// Flat JSON shape handed to the chat endpoint
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractionResultWire<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    extracted_value: Option<&'a AnswerValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    needs_follow_up: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    follow_up_question: Option<&'a str>,
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = ExtractionResultWire {
            success: self.is_success(),
            extracted_value: self.extracted_value(),
            field_name: self.field_name(),
            error: self.error(),
            needs_follow_up: self.needs_follow_up().then_some(true),
            follow_up_question: self.follow_up_question(),
        };
        wire.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_answer_value_blank() {
        assert!(AnswerValue::from("   ").is_blank());
        assert!(AnswerValue::from("").is_blank());
        assert!(!AnswerValue::from("x").is_blank());
        assert!(!AnswerValue::Integer(0).is_blank());
    }

    #[test]
    fn test_answer_value_untagged_json() {
        assert_eq!(serde_json::to_value(AnswerValue::Integer(42)).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(AnswerValue::from("no")).unwrap(), json!("no"));

        let parsed: AnswerValue = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(parsed, AnswerValue::Integer(7));
    }

    #[test]
    fn test_accepted_wire_shape() {
        let result = ExtractionResult::Accepted {
            field_name: "firstName".to_string(),
            value: AnswerValue::from("alex"),
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "success": true, "extractedValue": "alex", "fieldName": "firstName" })
        );
    }

    #[test]
    fn test_rejected_wire_shape() {
        let result = ExtractionResult::Rejected {
            kind: RejectionKind::ValidationFailed(ValidationFailure::Required),
            error: "Este campo es obligatorio".to_string(),
            follow_up_question: Some("Este campo es obligatorio. Por favor, ¿edad?".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "success": false,
                "error": "Este campo es obligatorio",
                "needsFollowUp": true,
                "followUpQuestion": "Este campo es obligatorio. Por favor, ¿edad?"
            })
        );
    }

    #[test]
    fn test_unknown_question_has_no_follow_up() {
        let result = ExtractionResult::Rejected {
            kind: RejectionKind::UnknownQuestion,
            error: "Question mapping not found".to_string(),
            follow_up_question: None,
        };
        assert!(!result.needs_follow_up());
        assert!(!result.rejection_kind().unwrap().is_retryable());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "success": false, "error": "Question mapping not found" })
        );
    }
}
