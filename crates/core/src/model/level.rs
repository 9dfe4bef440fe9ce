use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("unknown proficiency level: {0}")]
    Unknown(String),
}

//
// ─── LEVEL ────────────────────────────────────────────────────────────────────
//

/// Proficiency tier gating which content bank is active.
///
/// The six CEFR codes, from beginner (`A1`) to proficient (`C2`). Each
/// level maps to one content folder on the backend and to a display
/// name for the listing screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl Level {
    /// All levels in ascending order.
    pub const ALL: [Level; 6] = [
        Level::A1,
        Level::A2,
        Level::B1,
        Level::B2,
        Level::C1,
        Level::C2,
    ];

    /// The bare level code, e.g. `"B1"`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2 => "B2",
            Level::C1 => "C1",
            Level::C2 => "C2",
        }
    }

    /// The content folder holding this level's study material.
    #[must_use]
    pub fn content_folder(&self) -> &'static str {
        match self {
            Level::A1 => "beginner",
            Level::A2 => "pre-intermediate",
            Level::B1 => "intermediate",
            Level::B2 => "upper-intermediate",
            Level::C1 => "advanced",
            Level::C2 => "proficient",
        }
    }

    /// Human-readable level name for listing screens.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Level::A1 => "Beginner",
            Level::A2 => "Pre-Intermediate",
            Level::B1 => "Intermediate",
            Level::B2 => "Upper-Intermediate",
            Level::C1 => "Advanced",
            Level::C2 => "Proficient",
        }
    }
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A1" => Ok(Level::A1),
            "A2" => Ok(Level::A2),
            "B1" => Ok(Level::B1),
            "B2" => Ok(Level::B2),
            "C1" => Ok(Level::C1),
            "C2" => Ok(Level::C2),
            other => Err(LevelError::Unknown(other.to_owned())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
