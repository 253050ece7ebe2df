//! Forgettable Topic Index output types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Forgetting-risk bucket derived from an FTI score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FtiCategory {
    High,
    Moderate,
    Safe,
}

impl FtiCategory {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// The six FTI signals, each on a 0-10 scale, before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FtiSignals {
    pub complexity: f64,
    pub length: f64,
    pub time_decay: f64,
    pub failure_load: f64,
    pub stress_drop: f64,
    pub exam_frequency: f64,
}

/// Result of scoring one topic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FtiAssessment {
    /// Weighted score clamped to [0, 10].
    pub score: f64,
    pub category: FtiCategory,
    pub signals: FtiSignals,
}
