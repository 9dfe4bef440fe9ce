use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::level::Level;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {0} has no answer options")]
    NoOptions(QuestionId),

    #[error("question {id}: correct answer {answer:?} is not among the options")]
    CorrectAnswerNotAnOption { id: QuestionId, answer: String },
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question, immutable once built.
///
/// Option order is significant and preserved as delivered by the bank;
/// duplicate option strings are kept. The canonical correct answer is
/// guaranteed to be a member of the option set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: Option<String>,
    level: Option<Level>,
    points: u32,
}

impl Question {
    /// Default point weight when the bank does not assign one.
    pub const DEFAULT_POINTS: u32 = 1;

    /// Build a question, validating the option set.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NoOptions` when the option list is empty.
    /// Returns `QuestionError::CorrectAnswerNotAnOption` when the correct
    /// answer is missing from the options.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let correct_answer = correct_answer.into();
        if options.is_empty() {
            return Err(QuestionError::NoOptions(id));
        }
        if !options.iter().any(|option| *option == correct_answer) {
            return Err(QuestionError::CorrectAnswerNotAnOption {
                id,
                answer: correct_answer,
            });
        }

        Ok(Self {
            id,
            prompt: prompt.into(),
            options,
            correct_answer,
            explanation: None,
            level: None,
            points: Self::DEFAULT_POINTS,
        })
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn level(&self) -> Option<Level> {
        self.level
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Whether the submitted answer matches the canonical one exactly.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
