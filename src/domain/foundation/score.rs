//! Mood score value object (0-10 scale) and the shared rounding rule.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Daily mood score between 0 and 10 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MoodScore(u8);

impl MoodScore {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(10);

    /// Creates a MoodScore, clamping to the valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX.0))
    }

    /// Creates a MoodScore, returning error if out of range.
    pub fn try_new(value: i64) -> Result<Self, ValidationError> {
        if !(0..=i64::from(Self::MAX.0)).contains(&value) {
            return Err(ValidationError::out_of_range(
                "mood_score",
                0,
                i32::from(Self::MAX.0),
                value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
            ));
        }
        Ok(Self(value as u8))
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for MoodScore {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<MoodScore> for u8 {
    fn from(score: MoodScore) -> Self {
        score.0
    }
}

impl fmt::Display for MoodScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

/// Rounds half-way values toward positive infinity.
///
/// Matches the web client's `Math.round`, so `-2.5` becomes `-2` rather than
/// `-3` as `f64::round` would give. Scores computed here and in the browser
/// must agree.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
