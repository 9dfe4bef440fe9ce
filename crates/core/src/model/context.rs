use crate::model::ids::SectionId;
use crate::model::level::Level;

/// Selects the question bank and the completion side effect for one
/// quiz session. Created when a quiz screen is entered and discarded on
/// navigation away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizContext {
    /// The placement assessment that assigns an initial level.
    Placement,
    /// One content section of the given level.
    Section { section_id: SectionId, level: Level },
}

impl QuizContext {
    #[must_use]
    pub fn is_placement(&self) -> bool {
        matches!(self, QuizContext::Placement)
    }

    #[must_use]
    pub fn section_id(&self) -> Option<SectionId> {
        match self {
            QuizContext::Placement => None,
            QuizContext::Section { section_id, .. } => Some(*section_id),
        }
    }

    #[must_use]
    pub fn level(&self) -> Option<Level> {
        match self {
            QuizContext::Placement => None,
            QuizContext::Section { level, .. } => Some(*level),
        }
    }
}
