//! Record mapping and completeness tracking
//!
//! Both components read the shared catalog and the answers collected so far
//! (keyed by question id). Neither mutates the catalog.

use std::sync::Arc;

use patient_intake_core::{
    completion_percentage, AnswerValue, Catalog, CompletenessStats, ExtractedAnswers,
    IntakeRecord, QuestionDefinition,
};

/// Projects collected answers onto the intake record
pub struct RecordMapper {
    catalog: Arc<Catalog>,
}

impl RecordMapper {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Write each answer under its question's field name
    ///
    /// Questions are visited in catalog order, so when two questions share a
    /// field the later-registered one wins. Answers for unregistered ids are
    /// dropped.
    pub fn map_to_record(&self, extracted: &ExtractedAnswers) -> IntakeRecord {
        let mut record = IntakeRecord::new();
        let mut mapped = 0usize;

        for (id, definition) in self.catalog.entries() {
            if let Some(value) = extracted.get(&id) {
                record.set_answer(&definition, value.clone());
                mapped += 1;
            }
        }

        if mapped < extracted.len() {
            let dropped: Vec<&str> = extracted
                .keys()
                .filter(|id| !self.catalog.contains(id))
                .map(String::as_str)
                .collect();
            tracing::debug!(?dropped, "Dropped answers without a question mapping");
        }

        record
    }
}

/// Reports answered versus pending questions
pub struct CompletenessTracker {
    catalog: Arc<Catalog>,
}

impl CompletenessTracker {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Completion of the whole catalog, or of one category when given
    pub fn completeness(
        &self,
        extracted: &ExtractedAnswers,
        category: Option<&str>,
    ) -> CompletenessStats {
        let questions = match category {
            Some(category) => self.catalog.by_category(category),
            None => self.catalog.entries(),
        };
        stats_for(&questions, extracted)
    }

    /// One entry per category, in the order categories were first registered
    pub fn completeness_by_category(
        &self,
        extracted: &ExtractedAnswers,
    ) -> Vec<(String, CompletenessStats)> {
        let entries = self.catalog.entries();

        self.catalog
            .categories()
            .into_iter()
            .map(|category| {
                let questions: Vec<_> = entries
                    .iter()
                    .filter(|(_, def)| def.category == category)
                    .cloned()
                    .collect();
                let stats = stats_for(&questions, extracted);
                (category, stats)
            })
            .collect()
    }
}

fn stats_for(
    questions: &[(String, Arc<QuestionDefinition>)],
    extracted: &ExtractedAnswers,
) -> CompletenessStats {
    let mut answered = 0;
    let mut missing = Vec::new();

    for (id, definition) in questions {
        if extracted.get(id).is_some_and(is_answered) {
            answered += 1;
        } else {
            missing.push(definition.question_text.clone());
        }
    }

    CompletenessStats {
        total_questions: questions.len(),
        answered_questions: answered,
        completeness_percentage: completion_percentage(answered, questions.len()),
        missing_questions: missing,
    }
}

fn is_answered(value: &AnswerValue) -> bool {
    !value.is_blank()
}

#[cfg(test)]
mod tests {
    use super::*;
    use patient_intake_core::ExpectedType;

    fn catalog() -> Arc<Catalog> {
        let catalog = Catalog::new();
        catalog.register(
            "firstName",
            QuestionDefinition::new("firstName", "personal", "¿Nombre?", ExpectedType::Text),
        );
        catalog.register(
            "age",
            QuestionDefinition::new("age", "personal", "¿Edad?", ExpectedType::Number),
        );
        catalog.register(
            "fatherDiabetes",
            QuestionDefinition::new(
                "fatherDiabetes",
                "familyHistory",
                "¿Su padre padece diabetes?",
                ExpectedType::YesNo,
            ),
        );
        Arc::new(catalog)
    }

    fn answers(pairs: &[(&str, AnswerValue)]) -> ExtractedAnswers {
        pairs
            .iter()
            .map(|(id, v)| (id.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_map_to_record_drops_unknown_ids() {
        let mapper = RecordMapper::new(catalog());
        let record = mapper.map_to_record(&answers(&[
            ("firstName", AnswerValue::from("alex")),
            ("age", AnswerValue::Integer(30)),
            ("ghost", AnswerValue::from("boo")),
        ]));

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("firstName"), Some(&AnswerValue::from("alex")));
        assert_eq!(record.get("age"), Some(&AnswerValue::Integer(30)));
        assert!(!record.contains("ghost"));
    }

    #[test]
    fn test_shared_field_later_question_wins() {
        let catalog = Catalog::new();
        catalog.register(
            "phoneHome",
            QuestionDefinition::new("phone", "contact", "¿Casa?", ExpectedType::Text),
        );
        catalog.register(
            "phoneMobile",
            QuestionDefinition::new("phone", "contact", "¿Móvil?", ExpectedType::Text),
        );
        let mapper = RecordMapper::new(Arc::new(catalog));

        let record = mapper.map_to_record(&answers(&[
            ("phoneMobile", AnswerValue::from("555")),
            ("phoneHome", AnswerValue::from("111")),
        ]));
        assert_eq!(record.get("phone"), Some(&AnswerValue::from("555")));
    }

    #[test]
    fn test_completeness_whole_catalog() {
        let tracker = CompletenessTracker::new(catalog());
        let stats = tracker.completeness(
            &answers(&[
                ("firstName", AnswerValue::from("alex")),
                ("age", AnswerValue::Integer(0)),
            ]),
            None,
        );

        assert_eq!(stats.total_questions, 3);
        assert_eq!(stats.answered_questions, 2);
        assert_eq!(stats.completeness_percentage, 67);
        assert_eq!(stats.missing_questions, vec!["¿Su padre padece diabetes?"]);
    }

    #[test]
    fn test_blank_text_is_unanswered() {
        let tracker = CompletenessTracker::new(catalog());
        let stats = tracker.completeness(
            &answers(&[("firstName", AnswerValue::from("  "))]),
            Some("personal"),
        );
        assert_eq!(stats.answered_questions, 0);
        assert_eq!(stats.missing_questions, vec!["¿Nombre?", "¿Edad?"]);
    }

    #[test]
    fn test_unknown_category_is_zero() {
        let tracker = CompletenessTracker::new(catalog());
        let stats = tracker.completeness(&ExtractedAnswers::new(), Some("nonexistent"));
        assert_eq!(stats, CompletenessStats::default());
        assert_eq!(stats.completeness_percentage, 0);
    }

    #[test]
    fn test_completeness_by_category() {
        let tracker = CompletenessTracker::new(catalog());
        let report = tracker.completeness_by_category(&answers(&[(
            "fatherDiabetes",
            AnswerValue::from("no"),
        )]));

        let categories: Vec<&str> = report.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(categories, vec!["personal", "familyHistory"]);
        assert_eq!(report[0].1.completeness_percentage, 0);
        assert!(report[1].1.is_complete());
        assert_eq!(report[1].1.completeness_percentage, 100);
    }
}
