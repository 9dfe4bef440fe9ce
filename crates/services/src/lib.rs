#![forbid(unsafe_code)]

pub mod completion;
pub mod error;
pub mod question_bank;
pub mod quiz;
pub mod scoring;
pub mod session_context;

pub use lingo_core::Clock;

pub use completion::{CompletionApi, CompletionService, SectionReport};
pub use error::{BankError, QuizError, QuizLoopError, ReportError};
pub use question_bank::{QuestionBankService, QuestionSource, SectionBank, SectionMeta};
pub use quiz::{
    AdvanceToken, Advanced, AnswerOutcome, Arrival, FeedbackPool, Handoff, QuizCompletion,
    QuizEngine, QuizLoopService, QuizPhase, QuizRun, SubmitOutcome,
};
pub use scoring::{
    LevelTransition, PlacementAnswer, PlacementSubmission, RawScore, ScoreResult, raw_score,
};
pub use session_context::SessionContext;
