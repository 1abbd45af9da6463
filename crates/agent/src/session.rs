//! Interview session
//!
//! Drives one patient conversation through an ordered list of question ids.
//! The session owns the answers collected so far, the record built from them
//! and a timestamped history of every change. It is not shared between
//! threads; the engine it points to is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use patient_intake_core::{
    AnswerValue, CompletenessStats, ExtractedAnswers, ExtractionResult, IntakeRecord,
    RejectionKind,
};

use crate::engine::IntakeEngine;

/// Question waiting for an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingQuestion {
    pub question_id: String,
    pub question_text: String,
}

/// Result of submitting one answer
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Answer stored; `next` is `None` once the sequence is exhausted
    Advanced {
        field_name: String,
        value: AnswerValue,
        next: Option<PendingQuestion>,
    },
    /// Answer rejected; send `follow_up_question` back to the patient
    Retry {
        error: String,
        follow_up_question: String,
        attempts: u32,
    },
    /// Question abandoned without an answer
    Skipped {
        question_id: String,
        reason: String,
        next: Option<PendingQuestion>,
    },
    /// Nothing left to ask
    Completed,
}

/// Source of an answer change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeSource {
    /// Answer to the question being asked
    UserAnswer,
    /// User revisited an earlier question
    Correction,
}

/// Record of an answer change
#[derive(Debug, Clone, Serialize)]
pub struct AnswerChange {
    pub timestamp: DateTime<Utc>,
    pub question_id: String,
    pub field_name: String,
    pub old_value: Option<AnswerValue>,
    pub new_value: AnswerValue,
    pub source: ChangeSource,
    pub turn_index: usize,
}

/// One patient's walk through the questionnaire
pub struct InterviewSession {
    engine: Arc<IntakeEngine>,
    sequence: Vec<String>,
    cursor: usize,
    turn_index: usize,
    answers: ExtractedAnswers,
    record: IntakeRecord,
    attempts: HashMap<String, u32>,
    skipped: Vec<String>,
    history: Vec<AnswerChange>,
}

impl InterviewSession {
    /// Ask the given question ids in order
    pub fn new(engine: Arc<IntakeEngine>, sequence: Vec<String>) -> Self {
        Self {
            engine,
            sequence,
            cursor: 0,
            turn_index: 0,
            answers: ExtractedAnswers::new(),
            record: IntakeRecord::new(),
            attempts: HashMap::new(),
            skipped: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Ask every catalog question in registration order
    pub fn for_catalog(engine: Arc<IntakeEngine>) -> Self {
        let sequence = engine.catalog().ids();
        Self::new(engine, sequence)
    }

    /// Ask the questions of each category in turn
    pub fn for_categories(engine: Arc<IntakeEngine>, categories: &[&str]) -> Self {
        let sequence = categories
            .iter()
            .flat_map(|category| engine.by_category(category))
            .map(|(id, _)| id)
            .collect();
        Self::new(engine, sequence)
    }

    /// Question to ask next, skipping ids that have no mapping
    pub fn current_question(&mut self) -> Option<PendingQuestion> {
        self.skip_unknown();
        self.pending_at(self.cursor)
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.sequence.len()
    }

    /// Submit an answer to the current question
    pub fn submit(&mut self, raw_response: &str) -> TurnOutcome {
        self.skip_unknown();
        let Some(question_id) = self.sequence.get(self.cursor).cloned() else {
            return TurnOutcome::Completed;
        };

        self.turn_index += 1;
        let result = self
            .engine
            .process(&question_id, raw_response, Some(&self.record));

        match result {
            ExtractionResult::Accepted { field_name, value } => {
                self.apply(&question_id, value.clone(), ChangeSource::UserAnswer);
                self.advance();
                TurnOutcome::Advanced {
                    field_name,
                    value,
                    next: self.current_question(),
                }
            }
            ExtractionResult::Rejected {
                kind: RejectionKind::UnknownQuestion,
                error,
                ..
            } => {
                // catalog changed between lookup and processing
                self.skip(&question_id, &error);
                TurnOutcome::Skipped {
                    question_id,
                    reason: error,
                    next: self.current_question(),
                }
            }
            ExtractionResult::Rejected {
                error,
                follow_up_question,
                ..
            } => {
                let attempts = self.attempts.entry(question_id.clone()).or_insert(0);
                *attempts += 1;
                let attempts = *attempts;

                let max_attempts = self.engine.settings().session.max_attempts;
                if max_attempts > 0 && attempts >= max_attempts {
                    self.skip(&question_id, &error);
                    return TurnOutcome::Skipped {
                        question_id,
                        reason: error,
                        next: self.current_question(),
                    };
                }

                TurnOutcome::Retry {
                    follow_up_question: follow_up_question.unwrap_or_else(|| error.clone()),
                    error,
                    attempts,
                }
            }
        }
    }

    /// Re-answer an earlier question without moving the cursor
    pub fn correct(&mut self, question_id: &str, raw_response: &str) -> ExtractionResult {
        self.turn_index += 1;
        let result = self
            .engine
            .process(question_id, raw_response, Some(&self.record));

        if let Some(value) = result.extracted_value() {
            self.apply(question_id, value.clone(), ChangeSource::Correction);
            self.skipped.retain(|id| id != question_id);
        }

        result
    }

    pub fn answers(&self) -> &ExtractedAnswers {
        &self.answers
    }

    pub fn record(&self) -> &IntakeRecord {
        &self.record
    }

    pub fn history(&self) -> &[AnswerChange] {
        &self.history
    }

    /// Ids abandoned after unknown mapping or too many failed attempts
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn completeness(&self, category: Option<&str>) -> CompletenessStats {
        self.engine.completeness(&self.answers, category)
    }

    fn apply(&mut self, question_id: &str, value: AnswerValue, source: ChangeSource) {
        let Some(definition) = self.engine.get(question_id) else {
            return;
        };

        let old_value = self.answers.insert(question_id.to_string(), value.clone());
        self.record.set_answer(&definition, value.clone());

        tracing::debug!(
            question_id,
            field = %definition.field_name,
            ?source,
            "Answer recorded"
        );

        self.history.push(AnswerChange {
            timestamp: Utc::now(),
            question_id: question_id.to_string(),
            field_name: definition.field_name.clone(),
            old_value,
            new_value: value,
            source,
            turn_index: self.turn_index,
        });
    }

    fn skip(&mut self, question_id: &str, reason: &str) {
        tracing::warn!(question_id, reason, "Skipping question");
        self.skipped.push(question_id.to_string());
        self.advance();
    }

    fn skip_unknown(&mut self) {
        while let Some(id) = self.sequence.get(self.cursor).cloned() {
            if self.engine.get(&id).is_some() {
                break;
            }
            let reason = self.engine.settings().messages.unknown_question.clone();
            self.skip(&id, &reason);
        }
    }

    fn advance(&mut self) {
        self.cursor += 1;
    }

    fn pending_at(&self, index: usize) -> Option<PendingQuestion> {
        let question_id = self.sequence.get(index)?;
        let definition = self.engine.get(question_id)?;
        Some(PendingQuestion {
            question_id: question_id.clone(),
            question_text: definition.question_text.clone(),
        })
    }
}
