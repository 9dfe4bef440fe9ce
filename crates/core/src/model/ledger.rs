use std::collections::HashMap;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

/// Per-session record of submitted answers keyed by question identifier.
///
/// Entries are inserted or overwritten, never removed; the ledger only
/// grows during a session. `entries` provides the deterministic dump
/// used when formatting a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerLedger {
    answers: HashMap<QuestionId, String>,
}

impl AnswerLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the submitted answer for a question, overwriting any
    /// previous entry.
    pub fn record(&mut self, id: QuestionId, answer: impl Into<String>) {
        self.answers.insert(id, answer.into());
    }

    #[must_use]
    pub fn answer_for(&self, id: QuestionId) -> Option<&str> {
        self.answers.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.answers.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Full dump ordered by question identifier.
    #[must_use]
    pub fn entries(&self) -> Vec<(QuestionId, &str)> {
        let mut entries: Vec<_> = self
            .answers
            .iter()
            .map(|(id, answer)| (*id, answer.as_str()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }

    /// Whether every question has a ledger entry matching its correct
    /// answer. Matching is keyed by question identifier, so the result
    /// does not depend on the order questions were visited in.
    #[must_use]
    pub fn all_correct(&self, questions: &[Question]) -> bool {
        questions.iter().all(|question| {
            self.answer_for(question.id())
                .is_some_and(|answer| question.is_correct(answer))
        })
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u64, correct: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec!["yes".to_owned(), "no".to_owned()],
            correct,
        )
        .unwrap()
    }

    #[test]
    fn record_overwrites_previous_answer() {
        let mut ledger = AnswerLedger::new();
        ledger.record(QuestionId::new(1), "no");
        ledger.record(QuestionId::new(1), "yes");
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.answer_for(QuestionId::new(1)), Some("yes"));
    }

    #[test]
    fn entries_are_ordered_by_identifier() {
        let mut ledger = AnswerLedger::new();
        ledger.record(QuestionId::new(3), "no");
        ledger.record(QuestionId::new(1), "yes");
        ledger.record(QuestionId::new(2), "no");

        let ids: Vec<u64> = ledger.entries().iter().map(|(id, _)| id.value()).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn all_correct_is_keyed_by_identifier() {
        let questions = vec![question(1, "yes"), question(2, "no")];
        let mut ledger = AnswerLedger::new();

        // Answered in reverse visiting order; identity keying must not care.
        ledger.record(QuestionId::new(2), "no");
        ledger.record(QuestionId::new(1), "yes");
        assert!(ledger.all_correct(&questions));

        ledger.record(QuestionId::new(2), "yes");
        assert!(!ledger.all_correct(&questions));
    }

    #[test]
    fn omitted_question_is_not_all_correct() {
        let questions = vec![question(1, "yes"), question(2, "no")];
        let mut ledger = AnswerLedger::new();
        ledger.record(QuestionId::new(1), "yes");
        assert!(!ledger.all_correct(&questions));
    }
}
