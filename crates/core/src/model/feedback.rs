/// Feedback displayed after submitting an answer.
///
/// The message is drawn from a phrase pool; only `is_correct` carries
/// meaning for the progression logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub is_correct: bool,
    pub message: String,
}

impl Feedback {
    #[must_use]
    pub fn new(is_correct: bool, message: impl Into<String>) -> Self {
        Self {
            is_correct,
            message: message.into(),
        }
    }
}
