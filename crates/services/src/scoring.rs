//! Local scoring and backend result resolution.
//!
//! Raw scores are computed client-side for display only; the backend
//! stays authoritative for level derivation and section completion.

use serde::Serialize;

use lingo_core::model::{AnswerLedger, Level, Question};

use crate::error::ReportError;

/// Max score assumed when the backend omits one from a placement result.
const DEFAULT_MAX_SCORE: u32 = 20;

//
// ─── RAW SCORE ────────────────────────────────────────────────────────────────
//

/// Locally computed placement score: the sum of point weights of the
/// correctly answered questions against the attainable total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawScore {
    pub score: u32,
    pub max_score: u32,
}

/// Score a ledger against the original question set.
///
/// A question with no ledger entry counts as incorrect and contributes
/// nothing. Matching is keyed by question identifier.
#[must_use]
pub fn raw_score(questions: &[Question], ledger: &AnswerLedger) -> RawScore {
    let mut score = 0_u32;
    let mut max_score = 0_u32;

    for question in questions {
        max_score = max_score.saturating_add(question.points());
        let correct = ledger
            .answer_for(question.id())
            .is_some_and(|answer| question.is_correct(answer));
        if correct {
            score = score.saturating_add(question.points());
        }
    }

    RawScore { score, max_score }
}

//
// ─── PLACEMENT SUBMISSION ─────────────────────────────────────────────────────
//

/// One submitted answer in the placement payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementAnswer {
    pub question_id: u64,
    pub answer: String,
}

/// The placement submission body: `{"answers": [{question_id, answer}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementSubmission {
    pub answers: Vec<PlacementAnswer>,
}

impl PlacementSubmission {
    /// Format the ledger for submission, ordered by question identifier.
    #[must_use]
    pub fn from_ledger(ledger: &AnswerLedger) -> Self {
        let answers = ledger
            .entries()
            .into_iter()
            .map(|(id, answer)| PlacementAnswer {
                question_id: id.value(),
                answer: answer.to_owned(),
            })
            .collect();
        Self { answers }
    }
}

//
// ─── BACKEND RESULTS ──────────────────────────────────────────────────────────
//

/// Backend-acknowledged placement result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: u32,
    pub level: Level,
    pub max_score: u32,
}

/// Backend-acknowledged section completion outcome, consumed opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTransition {
    /// Whether every section of the current level is now complete.
    pub completed: bool,
    pub old_level: Option<Level>,
    pub new_level: Option<Level>,
}

/// Resolve a placement response payload into a `ScoreResult`.
///
/// The payload must carry at least a level or a score; the rest falls
/// back to the conventional defaults (score 0, level A1, max score 20).
///
/// # Errors
///
/// Returns `ReportError::Incomplete` when both `level` and `score` are
/// absent.
pub fn resolve_placement(
    score: Option<u32>,
    level: Option<Level>,
    max_score: Option<u32>,
) -> Result<ScoreResult, ReportError> {
    if score.is_none() && level.is_none() {
        return Err(ReportError::Incomplete);
    }

    Ok(ScoreResult {
        score: score.unwrap_or(0),
        level: level.unwrap_or(Level::A1),
        max_score: max_score.unwrap_or(DEFAULT_MAX_SCORE),
    })
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
