mod engine;
mod feedback;
mod handoff;
mod workflow;

pub use engine::{AdvanceToken, Advanced, QuizEngine, QuizPhase, SubmitOutcome};
pub use feedback::FeedbackPool;
pub use handoff::{Arrival, Handoff};
pub use workflow::{AnswerOutcome, QuizCompletion, QuizLoopService, QuizRun};
