//! Core types for the patient intake engine
//!
//! This crate provides the foundational types shared by the other crates:
//! - Question definitions and validation rules
//! - The question catalog (shared, read-mostly registry)
//! - Answer values and per-turn extraction results
//! - The intake record and completeness statistics
//! - Error types

pub mod answer;
pub mod catalog;
pub mod error;
pub mod question;
pub mod record;

pub use answer::{AnswerValue, ExtractionResult, RejectionKind, ValidationFailure};
pub use catalog::Catalog;
pub use error::{Error, Result};
pub use question::{CatalogEntry, ExpectedType, QuestionDefinition, ValidationRules};
pub use record::{completion_percentage, CompletenessStats, ExtractedAnswers, IntakeRecord};
