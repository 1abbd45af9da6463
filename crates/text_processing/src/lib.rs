//! Answer processing for the patient intake engine
//!
//! This crate turns a raw chat answer into a checked value in two phases:
//! - **Extraction**: permissive, type-directed conversion of the answer into a
//!   candidate value. Extractors never fail; when nothing useful is found they
//!   return the cleaned input unchanged.
//! - **Validation**: strict, rule-directed acceptance or rejection of the
//!   candidate, reporting the first rule that failed.
//!
//! # Example
//!
//! ```ignore
//! use patient_intake_core::ExpectedType;
//! use patient_intake_text_processing::{normalize_answer, AnswerExtractor};
//!
//! let extractor = AnswerExtractor::new();
//! let cleaned = normalize_answer("  10/01/1979 ");
//! let value = extractor.extract(ExpectedType::Date, &cleaned, &[]);
//! assert_eq!(value.to_string(), "1979-01-10");
//! ```

pub mod extraction;
pub mod validation;

mod error;

pub use error::{Result, TextProcessingError};
pub use extraction::{normalize_answer, AnswerExtractor, YesNoKeywords};
pub use validation::{ValidationOutcome, Validator};
