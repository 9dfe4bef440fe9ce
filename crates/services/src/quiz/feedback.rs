use rand::Rng;
use rand::seq::IndexedRandom;

use lingo_core::model::Feedback;

const POSITIVE: [&str; 8] = [
    "Correct!",
    "Excellent!",
    "Keep it up!",
    "Well done!",
    "That's right!",
    "Wonderful!",
    "Yes!",
    "You got it!",
];

const NEGATIVE: [&str; 5] = [
    "Unfortunately, no",
    "Not quite",
    "Incorrect",
    "That was a miss",
    "Better luck next time",
];

/// Phrase pools for answer feedback.
///
/// Each submission draws uniformly at random from the matching pool.
/// The wording is cosmetic and replaceable; the randomness source is
/// supplied by the caller so tests can seed it and assert membership
/// instead of exact text.
#[derive(Debug, Clone)]
pub struct FeedbackPool {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl FeedbackPool {
    /// Build a pool from custom phrase lists.
    ///
    /// An empty list falls back to the built-in phrases for that side,
    /// so a pool can never run dry.
    #[must_use]
    pub fn new(positive: Vec<String>, negative: Vec<String>) -> Self {
        let positive = if positive.is_empty() {
            default_phrases(&POSITIVE)
        } else {
            positive
        };
        let negative = if negative.is_empty() {
            default_phrases(&NEGATIVE)
        } else {
            negative
        };
        Self { positive, negative }
    }

    /// Draw a feedback message for the given correctness.
    pub fn pick<R: Rng + ?Sized>(&self, is_correct: bool, rng: &mut R) -> Feedback {
        let pool = if is_correct {
            &self.positive
        } else {
            &self.negative
        };
        let message = pool.choose(rng).cloned().unwrap_or_default();
        Feedback::new(is_correct, message)
    }

    /// Whether the message belongs to the pool for the given side.
    #[must_use]
    pub fn contains(&self, is_correct: bool, message: &str) -> bool {
        let pool = if is_correct {
            &self.positive
        } else {
            &self.negative
        };
        pool.iter().any(|phrase| phrase == message)
    }
}

impl Default for FeedbackPool {
    fn default() -> Self {
        Self {
            positive: default_phrases(&POSITIVE),
            negative: default_phrases(&NEGATIVE),
        }
    }
}

fn default_phrases(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|phrase| (*phrase).to_owned()).collect()
}
