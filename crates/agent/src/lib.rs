//! Conversational intake engine
//!
//! Takes a patient's free-form answer to one catalog question and turns it
//! into a typed, validated value or a follow-up prompt:
//!
//! ```text
//! raw answer ─► lookup ─► normalize ─► extract ─► validate ─┬─► Accepted
//!                  │                                        └─► Rejected + follow-up
//!                  └─► Rejected (unknown question)
//! ```
//!
//! Collected answers are projected onto an [`IntakeRecord`] and summarized as
//! completeness statistics. [`InterviewSession`] walks a question sequence
//! for one conversation on top of a shared [`IntakeEngine`].
//!
//! ## Usage
//!
//! ```ignore
//! use patient_intake_agent::IntakeEngine;
//! use patient_intake_config::load_settings;
//!
//! let settings = load_settings(Some("production"))?;
//! let engine = IntakeEngine::from_settings(settings)?;
//!
//! let result = engine.process("firstName", "  Alex ", None);
//! assert!(result.is_success());
//! ```

pub mod engine;
pub mod follow_up;
pub mod processor;
pub mod progress;
pub mod session;
pub mod telemetry;

pub use engine::IntakeEngine;
pub use follow_up::FollowUpComposer;
pub use processor::ResponseProcessor;
pub use progress::{CompletenessTracker, RecordMapper};
pub use session::{AnswerChange, ChangeSource, InterviewSession, PendingQuestion, TurnOutcome};
pub use telemetry::init_tracing;

pub use patient_intake_core::{
    AnswerValue, CompletenessStats, ExtractedAnswers, ExtractionResult, IntakeRecord,
};

use thiserror::Error;

/// Errors from engine construction
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] patient_intake_config::ConfigError),

    #[error("Telemetry error: {0}")]
    Telemetry(String),
}
