use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::activity::PriceLevel;

/// Ordinal tiers of remaining free time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeBucket {
    #[serde(rename = "≤30")]
    Under30,
    #[serde(rename = "30-60")]
    Between30And60,
    #[serde(rename = "60-120")]
    Between60And120,
    #[serde(rename = ">120")]
    Over120,
}

impl TimeBucket {
    /// Upper bound on the whole trip in minutes; `None` for the open bucket
    pub fn total_ceiling_minutes(&self) -> Option<u32> {
        match self {
            TimeBucket::Under30 => Some(30),
            TimeBucket::Between30And60 => Some(60),
            TimeBucket::Between60And120 => Some(120),
            TimeBucket::Over120 => None,
        }
    }

    /// (min, max) one-way travel minutes considered a good fit, roughly
    /// 25–35% of the bucket's budget. The open bucket gets a fixed ceiling.
    pub fn travel_window_minutes(&self) -> (u32, u32) {
        match self {
            TimeBucket::Under30 => (8, 10),
            TimeBucket::Between30And60 => (15, 21),
            TimeBucket::Between60And120 => (30, 42),
            TimeBucket::Over120 => (45, 63),
        }
    }

    /// Search radius handed to the search providers
    pub fn search_radius_meters(&self) -> u32 {
        match self {
            TimeBucket::Under30 => 800,
            TimeBucket::Between30And60 => 1500,
            TimeBucket::Between60And120 => 3000,
            TimeBucket::Over120 => 5000,
        }
    }
}

/// User interest themes, matched against item theme tags during scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Relax,
    Shopping,
    Food,
    Activity,
}

/// What the traveler asked for, fixed for the duration of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub time_bucket: TimeBucket,
    pub budget_level: PriceLevel,
    pub themes: Vec<Theme>,
    /// Free-text hint from the user, consumed by out-of-scope collaborators
    #[serde(default)]
    pub natural_hint: Option<String>,
}

impl Preferences {
    /// Rejects malformed preferences at the boundary so no stage has to
    /// branch on shape. Theme sets must be non-empty.
    pub fn validate(&self) -> AppResult<()> {
        if self.themes.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one theme is required".to_string(),
            ));
        }
        Ok(())
    }
}
