//! Forgettable Topic Index (FTI).
//!
//! Combines six 0-10 signals into a weighted 0-10 forgetting-risk score:
//! complexity, length, time since last revision, past failures, the accuracy
//! drop under stress, and exam frequency. The score is a pure function of the
//! topic, its attempts and the as-of time, so it is recomputed on every read.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::{FtiConfig, FtiWeights};
use crate::error::RecallResult;
use crate::types::{FtiAssessment, FtiCategory, FtiSignals, RecallAttempt, Topic};

/// Upper bound of every signal and of the score.
pub const MAX_SIGNAL: f64 = 10.0;

/// Accuracy of recall attempts split by stress level.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StressSplit {
    pub high_stress_total: usize,
    pub high_stress_correct: usize,
    pub low_stress_total: usize,
    pub low_stress_correct: usize,
}

impl StressSplit {
    /// Partition attempts around `threshold` (high-stress is strictly above).
    pub fn from_attempts(attempts: &[RecallAttempt], threshold: u8) -> Self {
        attempts.iter().fold(Self::default(), |mut split, attempt| {
            if attempt.stress_level > threshold {
                split.high_stress_total += 1;
                split.high_stress_correct += usize::from(attempt.is_correct);
            } else {
                split.low_stress_total += 1;
                split.low_stress_correct += usize::from(attempt.is_correct);
            }
            split
        })
    }

    /// `(low_accuracy - high_accuracy) * 10`, or 0 unless both groups have attempts.
    ///
    /// Not clamped; negative when the learner does better under stress.
    pub fn raw_drop(&self) -> f64 {
        if self.high_stress_total == 0 || self.low_stress_total == 0 {
            return 0.0;
        }
        let low = self.low_stress_correct as f64 / self.low_stress_total as f64;
        let high = self.high_stress_correct as f64 / self.high_stress_total as f64;
        (low - high) * 10.0
    }
}

/// Multi-signal forgettability scorer.
#[derive(Debug, Clone)]
pub struct ForgettabilityScorer {
    config: FtiConfig,
}

impl ForgettabilityScorer {
    /// Create a scorer with the default weights and thresholds.
    pub fn new() -> Self {
        Self {
            config: FtiConfig::default(),
        }
    }

    /// Create a scorer from configuration, rejecting invalid weights.
    pub fn from_config(config: FtiConfig) -> RecallResult<Self> {
        config.weights.validate()?;
        Ok(Self { config })
    }

    /// The weights in use.
    pub fn weights(&self) -> &FtiWeights {
        &self.config.weights
    }

    /// The high-stress threshold in use.
    pub fn stress_threshold(&self) -> u8 {
        self.config.stress_threshold
    }

    /// Compute the six unweighted signals.
    pub fn signals(
        &self,
        topic: &Topic,
        attempts: &[RecallAttempt],
        as_of: DateTime<Utc>,
    ) -> FtiSignals {
        let days_since_revised = topic.days_since_revised(as_of);
        if days_since_revised < 0 {
            warn!(
                topic_id = %topic.id,
                days = days_since_revised,
                "Topic revised after the scoring time; treating as just revised"
            );
        }

        let time_decay =
            (days_since_revised.max(0) as f64 / self.config.days_per_decay_point).min(MAX_SIGNAL);
        let failure_load =
            (topic.past_failures as f64 * self.config.points_per_failure).min(MAX_SIGNAL);
        let stress_drop = StressSplit::from_attempts(attempts, self.config.stress_threshold)
            .raw_drop()
            .clamp(0.0, MAX_SIGNAL);

        FtiSignals {
            complexity: topic.topic_complexity,
            length: topic.topic_length,
            time_decay,
            failure_load,
            stress_drop,
            exam_frequency: topic.exam_frequency,
        }
    }

    /// Weighted sum of the signals, clamped to [0, 10].
    pub fn weighted_score(&self, signals: &FtiSignals) -> f64 {
        let w = &self.config.weights;
        let score = signals.complexity * w.complexity
            + signals.length * w.length
            + signals.time_decay * w.time_decay
            + signals.failure_load * w.failure_load
            + signals.stress_drop * w.stress_drop
            + signals.exam_frequency * w.exam_frequency;
        score.clamp(0.0, MAX_SIGNAL)
    }

    /// Category for a score; both thresholds are inclusive lower bounds.
    pub fn categorize(&self, score: f64) -> FtiCategory {
        if score >= self.config.high_threshold {
            FtiCategory::High
        } else if score >= self.config.moderate_threshold {
            FtiCategory::Moderate
        } else {
            FtiCategory::Safe
        }
    }

    /// Score a topic against its recall attempts as of `as_of`.
    ///
    /// `attempts` should be the topic's own attempts; attempts for other
    /// topics are ignored.
    pub fn score(
        &self,
        topic: &Topic,
        attempts: &[RecallAttempt],
        as_of: DateTime<Utc>,
    ) -> RecallResult<FtiAssessment> {
        topic.validate()?;

        let own: Vec<RecallAttempt>;
        let attempts: &[RecallAttempt] = if attempts.iter().all(|a| a.topic_id == topic.id) {
            attempts
        } else {
            own = attempts
                .iter()
                .filter(|a| a.topic_id == topic.id)
                .cloned()
                .collect();
            &own[..]
        };

        let signals = self.signals(topic, attempts, as_of);
        let score = self.weighted_score(&signals);
        let category = self.categorize(score);

        debug!(
            topic_id = %topic.id,
            score,
            category = %category,
            attempts = attempts.len(),
            "Computed forgettability index"
        );

        Ok(FtiAssessment {
            score,
            category,
            signals,
        })
    }
}

impl Default for ForgettabilityScorer {
    fn default() -> Self {
        Self::new()
    }
}
