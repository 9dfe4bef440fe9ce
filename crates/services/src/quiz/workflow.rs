use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lingo_core::Clock;
use lingo_core::model::{Feedback, Level, QuizContext};

use crate::completion::{CompletionApi, SectionReport};
use crate::error::{QuizError, QuizLoopError};
use crate::question_bank::{QuestionSource, SectionMeta};
use crate::quiz::engine::{Advanced, QuizEngine};
use crate::quiz::handoff::{Arrival, Handoff};
use crate::scoring::{LevelTransition, PlacementSubmission, ScoreResult, raw_score};
use crate::session_context::SessionContext;

/// Result of answering the active question through the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub feedback: Feedback,
    pub advanced: Advanced,
    pub is_complete: bool,
}

/// Final backend-acknowledged result of one quiz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCompletion {
    Placement(ScoreResult),
    Section(LevelTransition),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RunTarget {
    Placement,
    Section { meta: SectionMeta, level: Level },
}

/// One live quiz: the engine plus the context it will be reported under.
#[derive(Debug)]
pub struct QuizRun {
    target: RunTarget,
    engine: QuizEngine,
    completion: Option<QuizCompletion>,
}

impl QuizRun {
    #[must_use]
    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut QuizEngine {
        &mut self.engine
    }

    #[must_use]
    pub fn context(&self) -> QuizContext {
        match &self.target {
            RunTarget::Placement => QuizContext::Placement,
            RunTarget::Section { meta, level } => QuizContext::Section {
                section_id: meta.id,
                level: *level,
            },
        }
    }

    /// The cached backend result, once `finalize` has succeeded.
    #[must_use]
    pub fn completion(&self) -> Option<&QuizCompletion> {
        self.completion.as_ref()
    }

    #[must_use]
    pub fn is_reported(&self) -> bool {
        self.completion.is_some()
    }
}

/// Orchestrates one quiz end to end: bank load, the answer/advance
/// cycle with the feedback display delay, completion reporting, and the
/// navigation handoff.
pub struct QuizLoopService {
    bank: Arc<dyn QuestionSource>,
    completion: Arc<dyn CompletionApi>,
    clock: Clock,
    feedback_delay: Duration,
    handoff: Mutex<Handoff>,
}

impl QuizLoopService {
    /// How long feedback stays on screen before the scheduled advance.
    pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_secs(2);

    #[must_use]
    pub fn new(bank: Arc<dyn QuestionSource>, completion: Arc<dyn CompletionApi>) -> Self {
        Self {
            bank,
            completion,
            clock: Clock::default(),
            feedback_delay: Self::DEFAULT_FEEDBACK_DELAY,
            handoff: Mutex::new(Handoff::default()),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_feedback_delay(mut self, delay: Duration) -> Self {
        self.feedback_delay = delay;
        self
    }

    /// Load the bank for the given context and start a run.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Bank` when the bank cannot be loaded and
    /// `QuizLoopError::Quiz` when it contains no questions.
    pub async fn start(
        &self,
        session: &SessionContext,
        context: QuizContext,
    ) -> Result<QuizRun, QuizLoopError> {
        let (target, questions) = match context {
            QuizContext::Placement => (
                RunTarget::Placement,
                self.bank.placement_bank(session).await?,
            ),
            QuizContext::Section { section_id, level } => {
                let bank = self.bank.section_bank(session, level, section_id).await?;
                (
                    RunTarget::Section {
                        meta: bank.meta,
                        level,
                    },
                    bank.questions,
                )
            }
        };

        let engine = QuizEngine::new(questions, self.clock.now())?;
        Ok(QuizRun {
            target,
            engine,
            completion: None,
        })
    }

    /// Submit the current selection, hold the feedback for the display
    /// delay, then apply the scheduled advance.
    ///
    /// # Errors
    ///
    /// Propagates state-machine guards via `QuizLoopError::Quiz`; a
    /// rejected submit leaves the run exactly where it was.
    pub async fn answer_current(&self, run: &mut QuizRun) -> Result<AnswerOutcome, QuizLoopError> {
        let submitted = run.engine.submit(&mut rand::rng())?;
        if !self.feedback_delay.is_zero() {
            tokio::time::sleep(self.feedback_delay).await;
        }
        let advanced = run.engine.advance_due(submitted.advance, self.clock.now());

        Ok(AnswerOutcome {
            feedback: submitted.feedback,
            advanced,
            is_complete: run.engine.is_complete(),
        })
    }

    /// Report a completed run to the backend.
    ///
    /// Idempotent: a successful report is cached on the run and returned
    /// as-is on later calls. A failed report changes nothing (ledger,
    /// progression state, and the completion slot stay untouched), so
    /// the caller can retry.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Quiz` when the run is not complete yet and
    /// `QuizLoopError::Report` when the backend rejects the submission.
    pub async fn finalize(
        &self,
        session: &SessionContext,
        run: &mut QuizRun,
    ) -> Result<QuizCompletion, QuizLoopError> {
        if let Some(done) = run.completion {
            return Ok(done);
        }
        if !run.engine.is_complete() {
            return Err(QuizError::Completed.into());
        }

        let (completed, arrival) = match &run.target {
            RunTarget::Placement => {
                let submission = PlacementSubmission::from_ledger(run.engine.ledger());
                let local = raw_score(run.engine.questions(), run.engine.ledger());
                log::debug!(
                    "submitting placement answers, local score {}/{}",
                    local.score,
                    local.max_score
                );
                let result = self.completion.submit_placement(session, &submission).await?;
                (QuizCompletion::Placement(result), Arrival::PlacementCompleted)
            }
            RunTarget::Section { meta, level } => {
                let report = SectionReport::new(meta, *level);
                let transition = self.completion.complete_section(session, &report).await?;
                (QuizCompletion::Section(transition), Arrival::SectionCompleted)
            }
        };

        run.completion = Some(completed);
        self.lock_handoff().record(arrival);
        Ok(completed)
    }

    /// Consume the one-shot arrival notice, if set.
    pub fn take_arrival(&self) -> Option<Arrival> {
        self.lock_handoff().take()
    }

    fn lock_handoff(&self) -> MutexGuard<'_, Handoff> {
        self.handoff.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
