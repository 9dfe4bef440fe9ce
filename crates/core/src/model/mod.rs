mod context;
mod feedback;
mod ids;
mod ledger;
mod level;
mod mistakes;
mod question;

pub use context::QuizContext;
pub use feedback::Feedback;
pub use ids::{QuestionId, SectionId};
pub use ledger::AnswerLedger;
pub use level::{Level, LevelError};
pub use mistakes::MistakeQueue;
pub use question::{Question, QuestionError};
