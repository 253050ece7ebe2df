//! Adaptive strength updates from recall outcomes.
//!
//! Each recorded attempt multiplies the topic's strength by a fixed factor and
//! clamps the result to the configured bounds. Which outcome shrinks and which
//! grows strength is decided by the [`StrengthPolicy`].

use crate::cognitive::retention::check_strength;
use crate::config::{StrengthConfig, StrengthPolicy};
use crate::error::RecallResult;

/// Multiplicative strength updater.
#[derive(Debug, Clone, Copy)]
pub struct StrengthUpdater {
    policy: StrengthPolicy,
    shrink_factor: f64,
    grow_factor: f64,
    min: f64,
    max: f64,
}

impl StrengthUpdater {
    /// Create an updater with the default inverse policy, ±5% steps and
    /// bounds [0.5, 5.0].
    pub fn new() -> Self {
        Self::from_config(&StrengthConfig::default())
    }

    /// Create an updater from configuration.
    pub fn from_config(config: &StrengthConfig) -> Self {
        Self {
            policy: config.policy,
            shrink_factor: config.shrink_factor,
            grow_factor: config.grow_factor,
            min: config.min,
            max: config.max,
        }
    }

    /// The active policy.
    pub fn policy(&self) -> StrengthPolicy {
        self.policy
    }

    /// Clamp bounds as `(min, max)`.
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Factor applied for a given outcome.
    pub fn factor(&self, is_correct: bool) -> f64 {
        match (self.policy, is_correct) {
            (StrengthPolicy::Inverse, true) | (StrengthPolicy::Reinforcing, false) => {
                self.shrink_factor
            }
            (StrengthPolicy::Inverse, false) | (StrengthPolicy::Reinforcing, true) => {
                self.grow_factor
            }
        }
    }

    /// New strength after one attempt, always within the bounds.
    pub fn update(&self, old_strength: f64, is_correct: bool) -> RecallResult<f64> {
        check_strength(old_strength)?;
        let updated = old_strength * self.factor(is_correct);
        Ok(updated.clamp(self.min, self.max))
    }

    /// Fold a sequence of outcomes, in order, starting from `initial`.
    pub fn replay<I>(&self, initial: f64, outcomes: I) -> RecallResult<f64>
    where
        I: IntoIterator<Item = bool>,
    {
        outcomes
            .into_iter()
            .try_fold(initial, |strength, is_correct| self.update(strength, is_correct))
    }
}

impl Default for StrengthUpdater {
    fn default() -> Self {
        Self::new()
    }
}
