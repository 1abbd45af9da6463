//! Rule-based answer validation
//!
//! Rules are evaluated in a fixed order and the first failure wins:
//! `required` → `min_length` → `max_length` → `pattern`. Lengths and patterns
//! apply to the string form of the value. Numeric `min`/`max` bounds are not
//! enforced here.

use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;

use patient_intake_core::{AnswerValue, ValidationFailure, ValidationRules};

use crate::error::{Result, TextProcessingError};

/// Verdict for one candidate value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(ValidationFailure),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Valid => None,
            Self::Invalid(failure) => Some(failure),
        }
    }
}

/// Applies validation rules, caching compiled patterns
#[derive(Debug, Default)]
pub struct Validator {
    /// Compiled patterns keyed by source (lazy-compiled on first use)
    compiled_patterns: RwLock<HashMap<String, Regex>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `value` against `rules`; no rules always passes
    ///
    /// Returns `Err` only when a configured pattern does not compile.
    pub fn validate(
        &self,
        value: &AnswerValue,
        rules: Option<&ValidationRules>,
    ) -> Result<ValidationOutcome> {
        let Some(rules) = rules else {
            return Ok(ValidationOutcome::Valid);
        };

        if rules.required && value.is_blank() {
            return Ok(ValidationOutcome::Invalid(ValidationFailure::Required));
        }

        let text = value.to_string();
        let length = text.chars().count();

        if let Some(min_length) = rules.min_length {
            if length < min_length {
                return Ok(ValidationOutcome::Invalid(ValidationFailure::TooShort {
                    min_length,
                }));
            }
        }

        if let Some(max_length) = rules.max_length {
            if length > max_length {
                return Ok(ValidationOutcome::Invalid(ValidationFailure::TooLong {
                    max_length,
                }));
            }
        }

        if let Some(pattern) = &rules.pattern {
            if !self.is_match(pattern, &text)? {
                return Ok(ValidationOutcome::Invalid(
                    ValidationFailure::PatternMismatch {
                        pattern: pattern.clone(),
                    },
                ));
            }
        }

        Ok(ValidationOutcome::Valid)
    }

    fn is_match(&self, pattern: &str, text: &str) -> Result<bool> {
        {
            let cache = self.compiled_patterns.read();
            if let Some(regex) = cache.get(pattern) {
                return Ok(regex.is_match(text));
            }
        }

        let regex = Regex::new(pattern).map_err(|source| TextProcessingError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let matched = regex.is_match(text);

        self.compiled_patterns
            .write()
            .insert(pattern.to_string(), regex);

        Ok(matched)
    }
}
