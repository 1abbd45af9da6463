//! Question definitions
//!
//! A `QuestionDefinition` describes one interview question: which record field
//! it fills, how its answer is interpreted and which rules the answer must
//! satisfy. Definitions are configuration data, loaded from the catalog file
//! and registered once at startup.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Expected answer type; selects the extractor that runs on the raw answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedType {
    /// Free text, taken as-is
    Text,
    /// Affirmative / negative answer
    YesNo,
    /// One of the question's options
    Select,
    /// Integer amount
    Number,
    /// Calendar date, canonicalized to `YYYY-MM-DD`
    Date,
}

impl ExpectedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::YesNo => "yesno",
            Self::Select => "select",
            Self::Number => "number",
            Self::Date => "date",
        }
    }
}

impl std::fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-question validation rules
///
/// `min` and `max` are carried for numeric questions but are not enforced by
/// the validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRules {
    #[serde(default)]
    pub required: bool,
    #[serde(default, alias = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, alias = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ValidationRules {
    /// Rules with only `required` set
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

/// Static descriptor for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    /// Target record field this question fills
    #[serde(alias = "fieldName")]
    pub field_name: String,
    /// Grouping label (e.g. "personal", "familyHistory")
    pub category: String,
    /// Canonical prompt, repeated verbatim in follow-ups
    #[serde(alias = "questionText")]
    pub question_text: String,
    /// Determines which extractor runs
    #[serde(rename = "type", alias = "expectedType")]
    pub expected_type: ExpectedType,
    /// Allowed answers, in tie-break order (select only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(
        default,
        alias = "validationRules",
        skip_serializing_if = "Option::is_none"
    )]
    pub validation_rules: Option<ValidationRules>,
}

impl QuestionDefinition {
    pub fn new(
        field_name: impl Into<String>,
        category: impl Into<String>,
        question_text: impl Into<String>,
        expected_type: ExpectedType,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            category: category.into(),
            question_text: question_text.into(),
            expected_type,
            options: Vec::new(),
            validation_rules: None,
        }
    }

    /// Set the allowed options (order is the select tie-break order)
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.validation_rules = Some(rules);
        self
    }

    pub fn is_required(&self) -> bool {
        self.validation_rules
            .as_ref()
            .map(|r| r.required)
            .unwrap_or(false)
    }

    /// Check internal consistency of the definition
    ///
    /// Registration never calls this; catalog loaders use it to report
    /// problems in configuration files.
    pub fn check(&self, id: &str) -> Result<(), Error> {
        if self.field_name.trim().is_empty() {
            return Err(Error::InvalidDefinition {
                id: id.to_string(),
                message: "field name is blank".to_string(),
            });
        }
        if self.expected_type == ExpectedType::Select && self.options.is_empty() {
            return Err(Error::InvalidDefinition {
                id: id.to_string(),
                message: "select question has no options".to_string(),
            });
        }
        Ok(())
    }
}

/// A question id paired with its definition, as found in catalog files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(flatten)]
    pub definition: QuestionDefinition,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, definition: QuestionDefinition) -> Self {
        Self {
            id: id.into(),
            definition,
        }
    }
}
