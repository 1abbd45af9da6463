//! Type-directed answer extraction
//!
//! One extractor per expected answer type. Every extractor receives the
//! answer already trimmed and lowercased (see [`normalize_answer`]) and is
//! total: it returns either the typed value it was looking for or the cleaned
//! input unchanged. Rejecting an unusable answer is the validator's job.
//!
//! ## Static Regex Patterns
//!
//! Number and date patterns are compiled once using `once_cell::sync::Lazy`.
//! Only ASCII digits are recognized.

use once_cell::sync::Lazy;
use regex::Regex;

use patient_intake_core::{AnswerValue, ExpectedType};

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

// D/M/YYYY or DD-MM-YYYY, separators may be mixed
static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2})[/-]([0-9]{1,2})[/-]([0-9]{4})").unwrap());

/// Trim and lowercase a raw answer before extraction
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Keyword lists for yes/no answers, matched as substrings
///
/// Affirmative keywords are checked first.
#[derive(Debug, Clone, PartialEq)]
pub struct YesNoKeywords {
    pub affirmative: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for YesNoKeywords {
    fn default() -> Self {
        Self {
            affirmative: vec!["sí".to_string(), "si".to_string(), "yes".to_string()],
            negative: vec!["no".to_string(), "none".to_string()],
        }
    }
}

impl YesNoKeywords {
    pub fn new(affirmative: Vec<String>, negative: Vec<String>) -> Self {
        Self {
            affirmative: lowercase_all(affirmative),
            negative: lowercase_all(negative),
        }
    }
}

fn lowercase_all(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|w| w.to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Dispatches a cleaned answer to the extractor for its expected type
#[derive(Debug, Clone, Default)]
pub struct AnswerExtractor {
    keywords: YesNoKeywords,
}

impl AnswerExtractor {
    /// Extractor with the default Spanish/English yes/no keywords
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords(keywords: YesNoKeywords) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &YesNoKeywords {
        &self.keywords
    }

    /// Extract a candidate value; `options` is only consulted for `Select`
    pub fn extract(&self, expected: ExpectedType, cleaned: &str, options: &[String]) -> AnswerValue {
        let value = match expected {
            ExpectedType::Text => extract_text(cleaned),
            ExpectedType::YesNo => self.extract_yes_no(cleaned),
            ExpectedType::Select => extract_select(cleaned, options),
            ExpectedType::Number => extract_number(cleaned),
            ExpectedType::Date => extract_date(cleaned),
        };

        tracing::trace!(expected_type = %expected, value = %value, "Extracted candidate");
        value
    }

    /// `"yes"` / `"no"` when a keyword is found, otherwise the input
    pub fn extract_yes_no(&self, cleaned: &str) -> AnswerValue {
        if self.keywords.affirmative.iter().any(|k| cleaned.contains(k.as_str())) {
            return AnswerValue::from("yes");
        }
        if self.keywords.negative.iter().any(|k| cleaned.contains(k.as_str())) {
            return AnswerValue::from("no");
        }
        AnswerValue::from(cleaned)
    }
}

/// Identity
pub fn extract_text(cleaned: &str) -> AnswerValue {
    AnswerValue::from(cleaned)
}

/// First option, in catalog order, whose lowercase form occurs in the answer
///
/// The matched option is returned with its original casing. Blank options
/// never match.
pub fn extract_select(cleaned: &str, options: &[String]) -> AnswerValue {
    options
        .iter()
        .filter(|option| !option.trim().is_empty())
        .find(|option| cleaned.contains(option.to_lowercase().as_str()))
        .map(|option| AnswerValue::Text(option.clone()))
        .unwrap_or_else(|| AnswerValue::from(cleaned))
}

/// First run of digits as an integer
///
/// Falls back to the input when there is no digit run or it does not fit
/// in an `i64`.
pub fn extract_number(cleaned: &str) -> AnswerValue {
    match DIGIT_RUN.find(cleaned) {
        Some(m) => match m.as_str().parse::<i64>() {
            Ok(n) => AnswerValue::Integer(n),
            Err(e) => {
                tracing::debug!(digits = m.as_str(), error = %e, "Digit run out of range");
                AnswerValue::from(cleaned)
            }
        },
        None => AnswerValue::from(cleaned),
    }
}

/// Day-month-year date as `YYYY-MM-DD`, without calendar checks
pub fn extract_date(cleaned: &str) -> AnswerValue {
    match DAY_MONTH_YEAR.captures(cleaned) {
        Some(caps) => AnswerValue::Text(format!(
            "{}-{:0>2}-{:0>2}",
            &caps[3], &caps[2], &caps[1]
        )),
        None => AnswerValue::from(cleaned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn extract_raw(expected: ExpectedType, raw: &str, opts: &[String]) -> AnswerValue {
        AnswerExtractor::new().extract(expected, &normalize_answer(raw), opts)
    }

    #[test]
    fn test_normalize_answer() {
        assert_eq!(normalize_answer("  Sí, Claro \n"), "sí, claro");
        assert_eq!(normalize_answer(""), "");
    }

    #[test]
    fn test_yes_no_extraction() {
        assert_eq!(extract_raw(ExpectedType::YesNo, "Sí, claro", &[]), AnswerValue::from("yes"));
        assert_eq!(extract_raw(ExpectedType::YesNo, "no, gracias", &[]), AnswerValue::from("no"));
        assert_eq!(extract_raw(ExpectedType::YesNo, "YES", &[]), AnswerValue::from("yes"));
        assert_eq!(extract_raw(ExpectedType::YesNo, "none", &[]), AnswerValue::from("no"));
    }

    #[test]
    fn test_yes_no_fallback_is_raw() {
        assert_eq!(
            extract_raw(ExpectedType::YesNo, "Tal vez", &[]),
            AnswerValue::from("tal vez")
        );
    }

    #[test]
    fn test_yes_no_affirmative_checked_first() {
        // contains both "si" and "no"
        assert_eq!(
            extract_raw(ExpectedType::YesNo, "si, no hay problema", &[]),
            AnswerValue::from("yes")
        );
    }

    #[test]
    fn test_custom_keywords() {
        let extractor = AnswerExtractor::with_keywords(YesNoKeywords::new(
            vec!["Claro".to_string()],
            vec!["Nunca".to_string()],
        ));
        assert_eq!(extractor.extract_yes_no("claro que sí"), AnswerValue::from("yes"));
        assert_eq!(extractor.extract_yes_no("nunca"), AnswerValue::from("no"));
        // defaults are replaced, not extended
        assert_eq!(extractor.extract_yes_no("sí"), AnswerValue::from("sí"));
    }

    #[test]
    fn test_select_extraction() {
        let opts = options(&["Masculino", "Femenino", "Otro"]);
        assert_eq!(
            extract_raw(ExpectedType::Select, "soy Femenino y tengo 30 años", &opts),
            AnswerValue::from("Femenino")
        );
    }

    #[test]
    fn test_select_first_registered_option_wins() {
        // "diabetes tipo 2" contains both option texts
        let opts = options(&["Diabetes", "Diabetes tipo 2"]);
        assert_eq!(
            extract_raw(ExpectedType::Select, "tengo diabetes tipo 2", &opts),
            AnswerValue::from("Diabetes")
        );

        let reversed = options(&["Diabetes tipo 2", "Diabetes"]);
        assert_eq!(
            extract_raw(ExpectedType::Select, "tengo diabetes tipo 2", &reversed),
            AnswerValue::from("Diabetes tipo 2")
        );
    }

    #[test]
    fn test_select_no_match_returns_cleaned() {
        let opts = options(&["Masculino", "Femenino"]);
        assert_eq!(
            extract_raw(ExpectedType::Select, "Prefiero no decir", &opts),
            AnswerValue::from("prefiero no decir")
        );
        assert_eq!(extract_select("algo", &options(&["", "  "])), AnswerValue::from("algo"));
    }

    #[test]
    fn test_number_extraction() {
        assert_eq!(
            extract_raw(ExpectedType::Number, "tengo 30 años y 2 hijos", &[]),
            AnswerValue::Integer(30)
        );
        assert_eq!(extract_number("007"), AnswerValue::Integer(7));
        assert_eq!(extract_number("1.75"), AnswerValue::Integer(1));
    }

    #[test]
    fn test_number_fallbacks() {
        assert_eq!(extract_number("treinta"), AnswerValue::from("treinta"));
        assert_eq!(
            extract_number("99999999999999999999999"),
            AnswerValue::from("99999999999999999999999")
        );
        // non-ASCII digits are not decimal digits here
        assert_eq!(extract_number("٣٠"), AnswerValue::from("٣٠"));
    }

    #[test]
    fn test_date_extraction() {
        assert_eq!(
            extract_raw(ExpectedType::Date, "10/01/1979", &[]),
            AnswerValue::from("1979-01-10")
        );
        assert_eq!(extract_date("nací el 5-3-1980"), AnswerValue::from("1980-03-05"));
        assert_eq!(extract_date("5/03-1980"), AnswerValue::from("1980-03-05"));
    }

    #[test]
    fn test_date_no_calendar_validation() {
        assert_eq!(extract_date("32/13/2001"), AnswerValue::from("2001-13-32"));
    }

    #[test]
    fn test_date_fallback() {
        assert_eq!(extract_date("ayer"), AnswerValue::from("ayer"));
        assert_eq!(extract_date("10/01/79"), AnswerValue::from("10/01/79"));
    }

    #[test]
    fn test_text_is_identity() {
        assert_eq!(extract_raw(ExpectedType::Text, "  Alex ", &[]), AnswerValue::from("alex"));
    }

    #[test]
    fn test_extractors_are_total() {
        let extractor = AnswerExtractor::new();
        let opts = options(&["Masculino", "Femenino"]);
        let inputs = ["", " ", "???", "🙂", "0", "-5", "12/12", "ñandú"];
        let types = [
            ExpectedType::Text,
            ExpectedType::YesNo,
            ExpectedType::Select,
            ExpectedType::Number,
            ExpectedType::Date,
        ];

        for expected in types {
            for input in inputs {
                let cleaned = normalize_answer(input);
                let value = extractor.extract(expected, &cleaned, &opts);
                match value {
                    AnswerValue::Integer(_) => assert_eq!(expected, ExpectedType::Number),
                    AnswerValue::Text(_) => {}
                }
            }
        }

        assert_eq!(extractor.extract(ExpectedType::Number, "", &[]), AnswerValue::from(""));
        assert_eq!(extractor.extract(ExpectedType::Select, "", &opts), AnswerValue::from(""));
    }
}
