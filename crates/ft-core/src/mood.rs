//! Mood classification from an external model score.
//!
//! The upstream expression model is a black box that yields a single score in
//! \[0.0, 1.0\]. Classification is a walk over an ordered threshold table so
//! the mapping stays exhaustive and testable independently of any rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discrete mood derived from the expression score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Energized,
    Content,
    Neutral,
    Tired,
    Stressed,
}

/// Ordered descending: the first threshold the score reaches wins.
const MOOD_THRESHOLDS: [(f32, Mood); 4] = [
    (0.8, Mood::Energized),
    (0.6, Mood::Content),
    (0.4, Mood::Neutral),
    (0.2, Mood::Tired),
];

impl Mood {
    /// Classifies a raw model score.
    ///
    /// Scores are clamped to \[0.0, 1.0\] first; NaN clamps to 0.0, matching
    /// how other lenient score inputs are handled.
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        for (threshold, mood) in MOOD_THRESHOLDS {
            if score >= threshold {
                return mood;
            }
        }
        Self::Stressed
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Energized => "energized",
            Self::Content => "content",
            Self::Neutral => "neutral",
            Self::Tired => "tired",
            Self::Stressed => "stressed",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
