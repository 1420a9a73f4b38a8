//! Background questionnaire answers attached to a user.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{round_half_up, MoodScore, ValidationError};

/// Upper bound of each self-reported feeling level.
pub const MAX_FEELING_LEVEL: u8 = 5;

/// Self-reported state for today, each level on a 0-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayFeeling {
    pub focus_level: u8,
    pub energy_level: u8,
    pub mood_level: u8,
    pub calm_level: u8,
}

impl TodayFeeling {
    /// Creates a feeling record, rejecting levels above 5.
    pub fn new(
        focus_level: u8,
        energy_level: u8,
        mood_level: u8,
        calm_level: u8,
    ) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("focus_level", focus_level),
            ("energy_level", energy_level),
            ("mood_level", mood_level),
            ("calm_level", calm_level),
        ] {
            if value > MAX_FEELING_LEVEL {
                return Err(ValidationError::out_of_range(
                    field,
                    0,
                    i32::from(MAX_FEELING_LEVEL),
                    i32::from(value),
                ));
            }
        }

        Ok(Self {
            focus_level,
            energy_level,
            mood_level,
            calm_level,
        })
    }

    /// Daily mood score: the average of the four levels, doubled onto 0-10.
    pub fn mood_score(&self) -> MoodScore {
        let sum = u32::from(self.focus_level)
            + u32::from(self.energy_level)
            + u32::from(self.mood_level)
            + u32::from(self.calm_level);
        let avg = f64::from(sum) / 4.0;
        let score = round_half_up(avg * 2.0).clamp(0, i64::from(MoodScore::MAX.value()));
        MoodScore::new(score as u8)
    }
}

/// Demographic answers. Everything in the background except today's feeling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_status: Option<String>,

    #[serde(default)]
    pub primary_challenges: Vec<String>,
}

/// The user's background profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBackground {
    #[serde(flatten)]
    pub demographics: Demographics,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_feeling: Option<TodayFeeling>,
}

impl UserBackground {
    pub fn new(demographics: Demographics, today_feeling: Option<TodayFeeling>) -> Self {
        Self {
            demographics,
            today_feeling,
        }
    }
}
