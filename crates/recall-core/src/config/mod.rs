//! Configuration system for recall.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumString};

use crate::error::{RecallError, RecallResult};

/// Longest forward horizon, in days, a schedule may cover.
pub const MAX_HORIZON_DAYS: u32 = 3650;

/// Retention curve configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Decay time in days for a topic of unit strength.
    pub decay_scale: f64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self { decay_scale: 2.5 }
    }
}

/// Direction in which a recall outcome moves a topic's strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StrengthPolicy {
    /// Correct answers shrink strength, incorrect answers grow it.
    #[default]
    Inverse,
    /// Correct answers grow strength, incorrect answers shrink it.
    Reinforcing,
}

/// Strength update configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthConfig {
    pub policy: StrengthPolicy,
    /// Multiplier applied when strength goes down.
    pub shrink_factor: f64,
    /// Multiplier applied when strength goes up.
    pub grow_factor: f64,
    /// Lower clamp bound.
    pub min: f64,
    /// Upper clamp bound.
    pub max: f64,
}

impl Default for StrengthConfig {
    fn default() -> Self {
        Self {
            policy: StrengthPolicy::Inverse,
            shrink_factor: 0.95,
            grow_factor: 1.05,
            min: 0.5,
            max: 5.0,
        }
    }
}

/// Weights of the six FTI signals. Must be non-negative and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FtiWeights {
    pub complexity: f64,
    pub length: f64,
    pub time_decay: f64,
    pub failure_load: f64,
    pub stress_drop: f64,
    pub exam_frequency: f64,
}

impl FtiWeights {
    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }

    fn as_array(&self) -> [f64; 6] {
        [
            self.complexity,
            self.length,
            self.time_decay,
            self.failure_load,
            self.stress_drop,
            self.exam_frequency,
        ]
    }

    /// Check that every weight is non-negative and that they sum to 1.0.
    pub fn validate(&self) -> RecallResult<()> {
        if self.as_array().iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RecallError::Configuration(
                "FTI weights must be finite and non-negative".to_string(),
            ));
        }
        let total = self.total();
        if (total - 1.0).abs() > 1e-9 {
            return Err(RecallError::Configuration(format!(
                "FTI weights must sum to 1.0, got {}",
                total
            )));
        }
        Ok(())
    }
}

impl Default for FtiWeights {
    fn default() -> Self {
        Self {
            complexity: 0.15,
            length: 0.15,
            time_decay: 0.20,
            failure_load: 0.20,
            stress_drop: 0.15,
            exam_frequency: 0.15,
        }
    }
}

/// Forgettable Topic Index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FtiConfig {
    pub weights: FtiWeights,
    /// Attempts with a stress level strictly above this count as high-stress.
    pub stress_threshold: u8,
    /// Days since revision that add one point of time decay.
    pub days_per_decay_point: f64,
    /// Points added per past failure.
    pub points_per_failure: f64,
    /// Scores at or above this are `high`.
    pub high_threshold: f64,
    /// Scores at or above this (and below `high_threshold`) are `moderate`.
    pub moderate_threshold: f64,
}

impl Default for FtiConfig {
    fn default() -> Self {
        Self {
            weights: FtiWeights::default(),
            stress_threshold: 70,
            days_per_decay_point: 3.0,
            points_per_failure: 1.5,
            high_threshold: 7.0,
            moderate_threshold: 4.0,
        }
    }
}

/// Revision schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Last day (inclusive) of the retention curve.
    pub horizon_days: u32,
    /// Days after "now" at which point estimates are produced.
    pub checkpoints: Vec<u32>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            checkpoints: vec![1, 3, 7, 14, 30],
        }
    }
}

/// Performance report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Topics whose retention falls below this percentage raise an alert.
    pub weak_retention_threshold: f64,
    /// Readiness at or above this is "ready".
    pub ready_threshold: f64,
    /// Readiness at or above this (and below `ready_threshold`) is "needs practice".
    pub practice_threshold: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            weak_retention_threshold: 50.0,
            ready_threshold: 75.0,
            practice_threshold: 50.0,
        }
    }
}

/// Main recall configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    pub retention: RetentionConfig,
    pub strength: StrengthConfig,
    pub fti: FtiConfig,
    pub schedule: ScheduleConfig,
    pub report: ReportConfig,
    /// Path to the SQLite database holding topics and attempts.
    pub db_path: PathBuf,
}

impl Default for RecallConfig {
    fn default() -> Self {
        let recall_dir = dirs::home_dir()
            .map(|h| h.join(".recall"))
            .unwrap_or_else(|| PathBuf::from(".recall"));

        Self {
            retention: RetentionConfig::default(),
            strength: StrengthConfig::default(),
            fti: FtiConfig::default(),
            schedule: ScheduleConfig::default(),
            report: ReportConfig::default(),
            db_path: recall_dir.join("recall.db"),
        }
    }
}

impl RecallConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> RecallResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| RecallError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| RecallError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| RecallError::Configuration(e.to_string()))?,
            _ => {
                return Err(RecallError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `RECALL_DB_PATH`
    /// - `RECALL_STRESS_THRESHOLD` (0-100)
    /// - `RECALL_STRENGTH_POLICY` (`inverse` or `reinforcing`)
    /// - `RECALL_HORIZON_DAYS`
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables on top of this configuration.
    pub fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("RECALL_DB_PATH") {
            self.db_path = PathBuf::from(path);
        }

        if let Ok(threshold) = std::env::var("RECALL_STRESS_THRESHOLD") {
            match threshold.parse::<u8>() {
                Ok(value) if value <= 100 => self.fti.stress_threshold = value,
                _ => tracing::warn!(value = %threshold, "Ignoring invalid RECALL_STRESS_THRESHOLD"),
            }
        }

        if let Ok(policy) = std::env::var("RECALL_STRENGTH_POLICY") {
            match policy.to_lowercase().parse::<StrengthPolicy>() {
                Ok(value) => self.strength.policy = value,
                Err(_) => tracing::warn!(value = %policy, "Ignoring invalid RECALL_STRENGTH_POLICY"),
            }
        }

        if let Ok(days) = std::env::var("RECALL_HORIZON_DAYS") {
            match days.parse::<u32>() {
                Ok(value) => self.schedule.horizon_days = value,
                Err(_) => tracing::warn!(value = %days, "Ignoring invalid RECALL_HORIZON_DAYS"),
            }
        }
    }

    /// Check internal consistency of every section.
    pub fn validate(&self) -> RecallResult<()> {
        let r = &self.retention;
        if !r.decay_scale.is_finite() || r.decay_scale <= 0.0 {
            return Err(RecallError::Configuration(
                "retention.decay_scale must be positive".to_string(),
            ));
        }

        let s = &self.strength;
        if !(s.min > 0.0 && s.min <= s.max && s.max.is_finite()) {
            return Err(RecallError::Configuration(format!(
                "strength bounds must satisfy 0 < min <= max, got [{}, {}]",
                s.min, s.max
            )));
        }
        if !(s.shrink_factor > 0.0 && s.shrink_factor < 1.0) {
            return Err(RecallError::Configuration(
                "strength.shrink_factor must be within (0, 1)".to_string(),
            ));
        }
        if !(s.grow_factor > 1.0 && s.grow_factor.is_finite()) {
            return Err(RecallError::Configuration(
                "strength.grow_factor must be greater than 1".to_string(),
            ));
        }

        let f = &self.fti;
        f.weights.validate()?;
        if f.stress_threshold > 100 {
            return Err(RecallError::Configuration(
                "fti.stress_threshold must be within [0, 100]".to_string(),
            ));
        }
        if !(f.days_per_decay_point > 0.0) || !(f.points_per_failure >= 0.0) {
            return Err(RecallError::Configuration(
                "fti.days_per_decay_point must be positive and fti.points_per_failure non-negative"
                    .to_string(),
            ));
        }
        if !(0.0 <= f.moderate_threshold
            && f.moderate_threshold <= f.high_threshold
            && f.high_threshold <= 10.0)
        {
            return Err(RecallError::Configuration(
                "fti thresholds must satisfy 0 <= moderate <= high <= 10".to_string(),
            ));
        }

        let sc = &self.schedule;
        if sc.horizon_days > MAX_HORIZON_DAYS
            || sc.checkpoints.iter().any(|d| *d > MAX_HORIZON_DAYS)
        {
            return Err(RecallError::Configuration(format!(
                "schedule days must not exceed {}",
                MAX_HORIZON_DAYS
            )));
        }

        let rp = &self.report;
        if !(rp.practice_threshold <= rp.ready_threshold) {
            return Err(RecallError::Configuration(
                "report.practice_threshold must not exceed report.ready_threshold".to_string(),
            ));
        }

        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> RecallConfigBuilder {
        RecallConfigBuilder::default()
    }
}

/// Builder for RecallConfig.
#[derive(Default)]
pub struct RecallConfigBuilder {
    config: RecallConfig,
}

impl RecallConfigBuilder {
    /// Set the retention decay scale.
    pub fn decay_scale(mut self, decay_scale: f64) -> Self {
        self.config.retention.decay_scale = decay_scale;
        self
    }

    /// Set the strength update policy.
    pub fn strength_policy(mut self, policy: StrengthPolicy) -> Self {
        self.config.strength.policy = policy;
        self
    }

    /// Set the strength clamp bounds.
    pub fn strength_bounds(mut self, min: f64, max: f64) -> Self {
        self.config.strength.min = min;
        self.config.strength.max = max;
        self
    }

    /// Set the FTI weights.
    pub fn fti_weights(mut self, weights: FtiWeights) -> Self {
        self.config.fti.weights = weights;
        self
    }

    /// Set the high-stress threshold.
    pub fn stress_threshold(mut self, threshold: u8) -> Self {
        self.config.fti.stress_threshold = threshold;
        self
    }

    /// Set the schedule horizon.
    pub fn horizon_days(mut self, days: u32) -> Self {
        self.config.schedule.horizon_days = days;
        self
    }

    /// Set the schedule checkpoints.
    pub fn checkpoints(mut self, days: Vec<u32>) -> Self {
        self.config.schedule.checkpoints = days;
        self
    }

    /// Set the database path.
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> RecallResult<RecallConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
