use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashMap;

use lingo_core::model::{AnswerLedger, Feedback, MistakeQueue, Question, QuestionId};

use crate::error::QuizError;
use crate::quiz::feedback::FeedbackPool;

//
// ─── PROGRESSION TYPES ────────────────────────────────────────────────────────
//

/// Which traversal the quiz is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// First linear pass over the whole bank.
    Primary,
    /// Bounded second pass over the questions missed in the primary pass.
    Remediation,
    /// Both passes are done; the run is ready to be reported.
    Completed,
}

/// Handle for the scheduled advance that follows a submission.
///
/// Only the most recently issued token advances the quiz; cancelling
/// invalidates it, so a timer firing after navigation-away is inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceToken(u64);

/// What a scheduled advance did to the progression state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advanced {
    /// Moved to the next question of the current phase.
    NextQuestion,
    /// Left the primary pass for the first remediation question.
    RemediationStarted,
    /// The run is complete.
    Completed,
    /// The token was cancelled or already spent; nothing changed.
    Stale,
}

/// Result of a submission: the feedback to display and the token that
/// will advance the quiz once the display delay elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub feedback: Feedback,
    pub advance: AdvanceToken,
}

//
// ─── ENGINE ───────────────────────────────────────────────────────────────────
//

/// The quiz progression state machine.
///
/// Owns the current position, pending selections, the answer ledger,
/// feedback display, and the transition into and out of the remediation
/// pass. There is exactly one active question at any instant, determined
/// by the phase and its index. All mutations run to completion before
/// the next action is accepted; while feedback is pending, every action
/// is rejected with `QuizError::AlreadyAnswered`.
#[derive(Debug)]
pub struct QuizEngine {
    questions: Vec<Question>,
    pool: FeedbackPool,
    ledger: AnswerLedger,
    selections: HashMap<QuestionId, String>,
    missed: Vec<usize>,
    mistakes: Option<MistakeQueue>,
    phase: QuizPhase,
    primary_index: usize,
    remediation_index: usize,
    max_visited: usize,
    feedback: Option<Feedback>,
    pending: Option<AdvanceToken>,
    next_token: u64,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizEngine {
    /// Start a new run over the given bank.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if the bank has no questions.
    pub fn new(questions: Vec<Question>, started_at: DateTime<Utc>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }

        Ok(Self {
            questions,
            pool: FeedbackPool::default(),
            ledger: AnswerLedger::new(),
            selections: HashMap::new(),
            missed: Vec::new(),
            mistakes: None,
            phase: QuizPhase::Primary,
            primary_index: 0,
            remediation_index: 0,
            max_visited: 0,
            feedback: None,
            pending: None,
            next_token: 0,
            started_at,
            completed_at: None,
        })
    }

    /// Replace the default feedback phrase pool.
    #[must_use]
    pub fn with_pool(mut self, pool: FeedbackPool) -> Self {
        self.pool = pool;
        self
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, QuizPhase::Completed)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    /// The mistake queue, once the primary pass has ended with at least
    /// one miss. `None` during the primary pass and after an all-correct
    /// run.
    #[must_use]
    pub fn mistakes(&self) -> Option<&MistakeQueue> {
        self.mistakes.as_ref()
    }

    /// Zero-based position within the current phase.
    #[must_use]
    pub fn position(&self) -> usize {
        match self.phase {
            QuizPhase::Primary => self.primary_index,
            QuizPhase::Remediation => self.remediation_index,
            QuizPhase::Completed => 0,
        }
    }

    /// Number of questions the current phase will visit.
    #[must_use]
    pub fn phase_len(&self) -> usize {
        match self.phase {
            QuizPhase::Primary => self.questions.len(),
            QuizPhase::Remediation => self.mistakes.as_ref().map_or(0, MistakeQueue::len),
            QuizPhase::Completed => 0,
        }
    }

    /// Whether feedback is on display and the machine rejects input.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.feedback.is_some()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        let index = self.active_index()?;
        self.questions.get(index)
    }

    /// The selection the active question would be submitted with.
    ///
    /// In the primary phase a pending selection wins over a previously
    /// submitted ledger entry, so re-entering a question restores its
    /// last selection. Remediation always starts blank: the old wrong
    /// answer is not offered back.
    #[must_use]
    pub fn current_selection(&self) -> Option<&str> {
        let index = self.active_index()?;
        let id = self.questions.get(index)?.id();
        let pending = self.selections.get(&id).map(String::as_str);
        match self.phase {
            QuizPhase::Remediation => pending,
            _ => pending.or_else(|| self.ledger.answer_for(id)),
        }
    }

    /// Store the pending selection for the active question.
    ///
    /// Does not write the ledger; that happens on `submit`. Selecting
    /// again before submission overwrites the previous choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Completed` after the run is complete and
    /// `QuizError::AlreadyAnswered` while feedback is pending.
    pub fn select_answer(&mut self, option: impl Into<String>) -> Result<(), QuizError> {
        self.ensure_actionable()?;
        let index = self.active_index().ok_or(QuizError::Completed)?;
        let id = self.questions[index].id();
        self.selections.insert(id, option.into());
        Ok(())
    }

    /// Submit the pending selection for the active question.
    ///
    /// Writes the ledger, evaluates exact string equality against the
    /// canonical answer, records a primary-pass miss, and schedules the
    /// advance that the returned token applies.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSelection` without a pending selection,
    /// `QuizError::AlreadyAnswered` while feedback is pending or when a
    /// primary question was already submitted, and `QuizError::Completed`
    /// after the run is complete. A rejected submit leaves all state
    /// unchanged.
    pub fn submit<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SubmitOutcome, QuizError> {
        self.ensure_actionable()?;
        let index = self.active_index().ok_or(QuizError::Completed)?;
        let question_id = self.questions[index].id();

        if matches!(self.phase, QuizPhase::Primary) && self.ledger.contains(question_id) {
            return Err(QuizError::AlreadyAnswered);
        }
        if !self.selections.contains_key(&question_id) {
            return Err(QuizError::NoSelection);
        }

        let selection = self
            .selections
            .remove(&question_id)
            .ok_or(QuizError::NoSelection)?;
        let is_correct = self.questions[index].is_correct(&selection);
        self.ledger.record(question_id, selection);
        if matches!(self.phase, QuizPhase::Primary) && !is_correct {
            self.missed.push(index);
        }

        let feedback = self.pool.pick(is_correct, rng);
        self.feedback = Some(feedback.clone());
        let token = AdvanceToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(token);

        Ok(SubmitOutcome {
            feedback,
            advance: token,
        })
    }

    /// Apply the scheduled advance once the display delay has elapsed.
    ///
    /// A token that was cancelled or superseded returns `Advanced::Stale`
    /// and changes nothing, so a late timer cannot race a navigation.
    pub fn advance_due(&mut self, token: AdvanceToken, now: DateTime<Utc>) -> Advanced {
        if self.pending != Some(token) {
            return Advanced::Stale;
        }
        self.pending = None;
        self.feedback = None;

        match self.phase {
            QuizPhase::Primary => {
                if self.primary_index + 1 < self.questions.len() {
                    self.primary_index += 1;
                    if self.primary_index > self.max_visited {
                        self.max_visited = self.primary_index;
                    }
                    Advanced::NextQuestion
                } else if self.missed.is_empty() {
                    self.complete(now);
                    Advanced::Completed
                } else {
                    self.mistakes = Some(MistakeQueue::new(std::mem::take(&mut self.missed)));
                    self.phase = QuizPhase::Remediation;
                    self.remediation_index = 0;
                    Advanced::RemediationStarted
                }
            }
            QuizPhase::Remediation => {
                let remaining = self.phase_len();
                if self.remediation_index + 1 < remaining {
                    self.remediation_index += 1;
                    Advanced::NextQuestion
                } else {
                    self.complete(now);
                    Advanced::Completed
                }
            }
            QuizPhase::Completed => Advanced::Stale,
        }
    }

    /// Invalidate the scheduled advance.
    ///
    /// The feedback stays as-is; the run is expected to be dropped when
    /// the user navigates away mid-delay.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Move back one primary question.
    ///
    /// A no-op at the first question or outside the primary phase.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyAnswered` while feedback is pending and
    /// `QuizError::Completed` after the run is complete.
    pub fn previous(&mut self) -> Result<(), QuizError> {
        self.ensure_actionable()?;
        if matches!(self.phase, QuizPhase::Primary) && self.primary_index > 0 {
            self.primary_index -= 1;
        }
        Ok(())
    }

    /// Move forward one primary question, up to the furthest visited.
    ///
    /// A no-op at the frontier or outside the primary phase.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadyAnswered` while feedback is pending and
    /// `QuizError::Completed` after the run is complete.
    pub fn next(&mut self) -> Result<(), QuizError> {
        self.ensure_actionable()?;
        if matches!(self.phase, QuizPhase::Primary) && self.primary_index < self.max_visited {
            self.primary_index += 1;
        }
        Ok(())
    }

    fn ensure_actionable(&self) -> Result<(), QuizError> {
        if self.is_complete() {
            return Err(QuizError::Completed);
        }
        if self.feedback.is_some() {
            return Err(QuizError::AlreadyAnswered);
        }
        Ok(())
    }

    fn active_index(&self) -> Option<usize> {
        match self.phase {
            QuizPhase::Primary => Some(self.primary_index),
            QuizPhase::Remediation => self
                .mistakes
                .as_ref()
                .and_then(|queue| queue.position_at(self.remediation_index)),
            QuizPhase::Completed => None,
        }
    }

    fn complete(&mut self, now: DateTime<Utc>) {
        self.phase = QuizPhase::Completed;
        self.completed_at = Some(now);
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const OPTIONS: [&str; 3] = ["alpha", "beta", "gamma"];

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            OPTIONS.iter().map(|o| (*o).to_owned()).collect(),
            "alpha",
        )
        .unwrap()
    }

    fn bank(len: u64) -> Vec<Question> {
        (1..=len).map(question).collect()
    }

    fn engine(len: u64) -> QuizEngine {
        QuizEngine::new(bank(len), fixed_now()).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn submit_answer(engine: &mut QuizEngine, rng: &mut StdRng, option: &str) -> SubmitOutcome {
        engine.select_answer(option).unwrap();
        engine.submit(rng).unwrap()
    }

    fn submit_and_advance(engine: &mut QuizEngine, rng: &mut StdRng, option: &str) -> Advanced {
        let outcome = submit_answer(engine, rng, option);
        engine.advance_due(outcome.advance, fixed_now())
    }

    #[test]
    fn empty_bank_is_rejected() {
        let err = QuizEngine::new(Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, QuizError::Empty);
    }

    #[test]
    fn submit_without_selection_fails_and_changes_nothing() {
        let mut engine = engine(3);
        let err = engine.submit(&mut rng()).unwrap_err();
        assert_eq!(err, QuizError::NoSelection);
        assert_eq!(engine.phase(), QuizPhase::Primary);
        assert_eq!(engine.position(), 0);
        assert!(engine.ledger().is_empty());
        assert!(!engine.is_locked());
    }

    #[test]
    fn all_correct_run_completes_without_remediation() {
        let mut engine = engine(3);
        let mut rng = rng();

        assert_eq!(submit_and_advance(&mut engine, &mut rng, "alpha"), Advanced::NextQuestion);
        assert_eq!(submit_and_advance(&mut engine, &mut rng, "alpha"), Advanced::NextQuestion);
        assert_eq!(submit_and_advance(&mut engine, &mut rng, "alpha"), Advanced::Completed);

        assert!(engine.is_complete());
        assert_eq!(engine.completed_at(), Some(fixed_now()));
        assert!(engine.mistakes().is_none());
        assert_eq!(engine.ledger().len(), 3);
    }

    #[test]
    fn missed_question_enters_remediation_for_exactly_one_pass() {
        let mut engine = engine(3);
        let mut rng = rng();

        assert_eq!(submit_and_advance(&mut engine, &mut rng, "alpha"), Advanced::NextQuestion);
        assert_eq!(submit_and_advance(&mut engine, &mut rng, "beta"), Advanced::NextQuestion);
        assert_eq!(
            submit_and_advance(&mut engine, &mut rng, "alpha"),
            Advanced::RemediationStarted
        );

        assert_eq!(engine.phase(), QuizPhase::Remediation);
        assert_eq!(engine.phase_len(), 1);
        assert_eq!(engine.mistakes().unwrap().positions(), [1]);
        assert_eq!(engine.current_question().unwrap().id(), QuestionId::new(2));

        // Missing again during remediation does not re-enqueue.
        assert_eq!(submit_and_advance(&mut engine, &mut rng, "gamma"), Advanced::Completed);
        assert!(engine.is_complete());
        assert_eq!(engine.mistakes().unwrap().len(), 1);
    }

    #[test]
    fn remediation_visits_mistakes_in_original_order() {
        let mut engine = engine(3);
        let mut rng = rng();

        submit_and_advance(&mut engine, &mut rng, "beta");
        submit_and_advance(&mut engine, &mut rng, "alpha");
        assert_eq!(
            submit_and_advance(&mut engine, &mut rng, "gamma"),
            Advanced::RemediationStarted
        );

        assert_eq!(engine.mistakes().unwrap().positions(), [0, 2]);
        assert_eq!(engine.current_question().unwrap().id(), QuestionId::new(1));
        assert_eq!(
            submit_and_advance(&mut engine, &mut rng, "alpha"),
            Advanced::NextQuestion
        );
        assert_eq!(engine.current_question().unwrap().id(), QuestionId::new(3));
        assert_eq!(submit_and_advance(&mut engine, &mut rng, "alpha"), Advanced::Completed);
    }

    #[test]
    fn pending_feedback_locks_every_action() {
        let mut engine = engine(3);
        let mut rng = rng();

        let outcome = submit_answer(&mut engine, &mut rng, "alpha");
        assert!(engine.is_locked());
        assert_eq!(engine.select_answer("beta").unwrap_err(), QuizError::AlreadyAnswered);
        assert_eq!(engine.submit(&mut rng).unwrap_err(), QuizError::AlreadyAnswered);
        assert_eq!(engine.next().unwrap_err(), QuizError::AlreadyAnswered);
        assert_eq!(engine.previous().unwrap_err(), QuizError::AlreadyAnswered);

        engine.advance_due(outcome.advance, fixed_now());
        assert!(!engine.is_locked());
    }

    #[test]
    fn answered_primary_question_cannot_be_resubmitted() {
        let mut engine = engine(3);
        let mut rng = rng();

        submit_and_advance(&mut engine, &mut rng, "alpha");
        engine.previous().unwrap();
        engine.select_answer("beta").unwrap();
        assert_eq!(engine.submit(&mut rng).unwrap_err(), QuizError::AlreadyAnswered);
        // The original answer is untouched.
        assert_eq!(engine.ledger().answer_for(QuestionId::new(1)), Some("alpha"));
    }

    #[test]
    fn navigation_restores_selections() {
        let mut engine = engine(3);
        let mut rng = rng();

        submit_and_advance(&mut engine, &mut rng, "beta");
        engine.select_answer("gamma").unwrap();

        engine.previous().unwrap();
        // Submitted answer comes back from the ledger.
        assert_eq!(engine.current_selection(), Some("beta"));

        engine.next().unwrap();
        // Unsubmitted pending selection survives the round trip.
        assert_eq!(engine.current_selection(), Some("gamma"));
    }

    #[test]
    fn navigation_is_bounded_and_phase_scoped() {
        let mut engine = engine(3);
        let mut rng = rng();

        engine.previous().unwrap();
        assert_eq!(engine.position(), 0);
        engine.next().unwrap();
        assert_eq!(engine.position(), 0);

        submit_and_advance(&mut engine, &mut rng, "alpha");
        assert_eq!(engine.position(), 1);
        engine.next().unwrap();
        assert_eq!(engine.position(), 1);
        engine.previous().unwrap();
        assert_eq!(engine.position(), 0);
        engine.next().unwrap();
        assert_eq!(engine.position(), 1);

        // Enter remediation; navigation becomes a no-op.
        submit_and_advance(&mut engine, &mut rng, "beta");
        submit_and_advance(&mut engine, &mut rng, "alpha");
        assert_eq!(engine.phase(), QuizPhase::Remediation);
        engine.previous().unwrap();
        engine.next().unwrap();
        assert_eq!(engine.position(), 0);
    }

    #[test]
    fn cancelled_advance_token_goes_stale() {
        let mut engine = engine(2);
        let mut rng = rng();

        let outcome = submit_answer(&mut engine, &mut rng, "alpha");
        engine.cancel_pending();
        assert_eq!(engine.advance_due(outcome.advance, fixed_now()), Advanced::Stale);
        assert_eq!(engine.phase(), QuizPhase::Primary);
        assert_eq!(engine.position(), 0);
        assert!(engine.is_locked());
    }

    #[test]
    fn spent_advance_token_goes_stale() {
        let mut engine = engine(2);
        let mut rng = rng();

        let outcome = submit_answer(&mut engine, &mut rng, "alpha");
        assert_eq!(engine.advance_due(outcome.advance, fixed_now()), Advanced::NextQuestion);
        assert_eq!(engine.advance_due(outcome.advance, fixed_now()), Advanced::Stale);
        assert_eq!(engine.position(), 1);
    }

    #[test]
    fn remediation_starts_blank_and_overwrites_the_ledger() {
        let mut engine = engine(2);
        let mut rng = rng();

        submit_and_advance(&mut engine, &mut rng, "alpha");
        submit_and_advance(&mut engine, &mut rng, "beta");
        assert_eq!(engine.phase(), QuizPhase::Remediation);

        // The wrong answer is not offered back for re-submission.
        assert_eq!(engine.current_selection(), None);
        assert_eq!(engine.submit(&mut rng).unwrap_err(), QuizError::NoSelection);

        submit_and_advance(&mut engine, &mut rng, "alpha");
        assert!(engine.is_complete());
        assert_eq!(engine.ledger().answer_for(QuestionId::new(2)), Some("alpha"));
        assert!(engine.ledger().all_correct(engine.questions()));
    }

    #[test]
    fn feedback_messages_come_from_the_phrase_pool() {
        let pool = FeedbackPool::default();
        let mut engine = engine(2);
        let mut rng = rng();

        let outcome = submit_answer(&mut engine, &mut rng, "alpha");
        assert!(outcome.feedback.is_correct);
        assert!(pool.contains(true, &outcome.feedback.message));
        engine.advance_due(outcome.advance, fixed_now());

        let outcome = submit_answer(&mut engine, &mut rng, "beta");
        assert!(!outcome.feedback.is_correct);
        assert!(pool.contains(false, &outcome.feedback.message));
    }

    #[test]
    fn completed_run_rejects_further_input() {
        let mut engine = engine(1);
        let mut rng = rng();

        assert_eq!(submit_and_advance(&mut engine, &mut rng, "alpha"), Advanced::Completed);
        assert!(engine.current_question().is_none());
        assert_eq!(engine.select_answer("alpha").unwrap_err(), QuizError::Completed);
        assert_eq!(engine.submit(&mut rng).unwrap_err(), QuizError::Completed);
        assert_eq!(engine.next().unwrap_err(), QuizError::Completed);
    }
}
