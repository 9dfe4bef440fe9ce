//! Shared error types for the services crate.

use thiserror::Error;

use lingo_core::model::SectionId;

/// Errors emitted while fetching a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("not authorized to fetch questions")]
    Unauthorized,

    #[error("question bank returned no questions")]
    Empty,

    #[error("section {0} not found in the level content")]
    SectionNotFound(SectionId),

    #[error("question bank response did not match any known shape: {0}")]
    Malformed(String),

    #[error("question bank request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error(transparent)]
    Unavailable(#[from] reqwest::Error),
}

/// Errors emitted while reporting quiz completion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("not authorized to submit results")]
    Unauthorized,

    #[error("submission rejected with status {0}")]
    Rejected(reqwest::StatusCode),

    #[error("result payload carries neither a level nor a score")]
    Incomplete,

    #[error(transparent)]
    Unavailable(#[from] reqwest::Error),
}

/// Guard errors from the quiz progression state machine.
///
/// These reject the offending action without altering state; they are
/// caller-contract violations rather than user-facing failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available for quiz")]
    Empty,

    #[error("no answer selected for the active question")]
    NoSelection,

    #[error("the active question already has a submitted answer")]
    AlreadyAnswered,

    #[error("quiz session is not in a state that allows this action")]
    Completed,
}

/// Errors emitted by the quiz loop orchestrator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoopError {
    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
