//! Ebbinghaus forgetting curve.
//!
//! Retention after `t` days for a topic of strength `S` is
//! `R(t) = 100 * e^(-t / (S * decay_scale))`. Strength scales the decay time
//! linearly, so doubling it doubles the time to reach any retention level.

use chrono::{DateTime, Utc};

use crate::config::RetentionConfig;
use crate::error::{RecallError, RecallResult};

/// Forgetting-curve retention estimator.
#[derive(Debug, Clone, Copy)]
pub struct RetentionModel {
    /// Decay time in days for unit strength.
    decay_scale: f64,
}

impl RetentionModel {
    /// Create a model with the default decay scale of 2.5 days.
    pub fn new() -> Self {
        Self::from_config(&RetentionConfig::default())
    }

    /// Create a model from configuration.
    pub fn from_config(config: &RetentionConfig) -> Self {
        Self {
            decay_scale: config.decay_scale,
        }
    }

    /// Get the decay scale.
    pub fn decay_scale(&self) -> f64 {
        self.decay_scale
    }

    /// Retention percentage in [0, 100] after `days_elapsed` days.
    ///
    /// Negative elapsed time means the topic has not started decaying and
    /// yields 100. Non-positive strength is rejected.
    pub fn retention(&self, days_elapsed: f64, strength: f64) -> RecallResult<f64> {
        check_strength(strength)?;
        if days_elapsed.is_nan() {
            return Err(RecallError::invalid_argument("days_elapsed must be a number"));
        }
        if days_elapsed < 0.0 {
            return Ok(100.0);
        }

        let retention = (-days_elapsed / (strength * self.decay_scale)).exp();
        Ok((retention * 100.0).clamp(0.0, 100.0))
    }

    /// Probability (as a percentage) that the topic has been forgotten.
    pub fn forget_probability(&self, days_elapsed: f64, strength: f64) -> RecallResult<f64> {
        Ok(100.0 - self.retention(days_elapsed, strength)?)
    }

    /// Retention at `as_of` for a topic last revised at `last_revised`.
    ///
    /// Elapsed time is counted in whole days.
    pub fn retention_as_of(
        &self,
        strength: f64,
        last_revised: DateTime<Utc>,
        as_of: DateTime<Utc>,
    ) -> RecallResult<f64> {
        let days = as_of.signed_duration_since(last_revised).num_days();
        self.retention(days as f64, strength)
    }
}

impl Default for RetentionModel {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_strength(strength: f64) -> RecallResult<()> {
    if !strength.is_finite() || strength <= 0.0 {
        return Err(RecallError::out_of_range("strength", strength, "(0, inf)"));
    }
    Ok(())
}
