//! Revision scheduling from the retention curve.
//!
//! Produces the day-by-day retention curve over a forward horizon and point
//! estimates at fixed checkpoints paired with calendar dates.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cognitive::retention::RetentionModel;
use crate::config::{ScheduleConfig, MAX_HORIZON_DAYS};
use crate::error::{RecallError, RecallResult};

/// One day on the forgetting curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub day: u32,
    pub retention: f64,
    pub forget_probability: f64,
}

/// A suggested revision checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevisionCheckpoint {
    pub day: u32,
    pub date: NaiveDate,
    pub retention: f64,
}

/// Curve and checkpoints for one strength value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionSchedule {
    pub strength: f64,
    pub curve: Vec<CurvePoint>,
    pub checkpoints: Vec<RevisionCheckpoint>,
}

/// Stateless revision scheduler.
#[derive(Debug, Clone)]
pub struct RevisionScheduler {
    model: RetentionModel,
    horizon_days: u32,
    checkpoints: Vec<u32>,
}

impl RevisionScheduler {
    /// Create a scheduler with a 30-day horizon and checkpoints {1, 3, 7, 14, 30}.
    pub fn new(model: RetentionModel) -> Self {
        Self::from_config(model, &ScheduleConfig::default())
    }

    /// Create a scheduler from configuration.
    pub fn from_config(model: RetentionModel, config: &ScheduleConfig) -> Self {
        Self {
            model,
            horizon_days: config.horizon_days,
            checkpoints: config.checkpoints.clone(),
        }
    }

    /// The retention model the scheduler evaluates.
    pub fn model(&self) -> &RetentionModel {
        &self.model
    }

    /// Schedule with the configured horizon and checkpoints.
    pub fn schedule(&self, strength: f64, as_of: DateTime<Utc>) -> RecallResult<RevisionSchedule> {
        self.schedule_with(strength, self.horizon_days, &self.checkpoints, as_of)
    }

    /// Schedule with an explicit horizon and checkpoint set.
    pub fn schedule_with(
        &self,
        strength: f64,
        horizon_days: u32,
        checkpoints: &[u32],
        as_of: DateTime<Utc>,
    ) -> RecallResult<RevisionSchedule> {
        if horizon_days > MAX_HORIZON_DAYS {
            return Err(RecallError::out_of_range(
                "horizon_days",
                horizon_days,
                &format!("[0, {}]", MAX_HORIZON_DAYS),
            ));
        }
        if let Some(day) = checkpoints.iter().find(|d| **d > MAX_HORIZON_DAYS) {
            return Err(RecallError::out_of_range(
                "checkpoint",
                day,
                &format!("[0, {}]", MAX_HORIZON_DAYS),
            ));
        }

        let curve = (0..=horizon_days)
            .map(|day| {
                let retention = self.model.retention(day as f64, strength)?;
                Ok(CurvePoint {
                    day,
                    retention,
                    forget_probability: 100.0 - retention,
                })
            })
            .collect::<RecallResult<Vec<_>>>()?;

        let checkpoints = checkpoints
            .iter()
            .map(|&day| {
                let date = as_of
                    .checked_add_signed(Duration::days(i64::from(day)))
                    .ok_or_else(|| {
                        RecallError::invalid_argument(format!(
                            "as_of {} plus {} days is not a representable date",
                            as_of, day
                        ))
                    })?
                    .date_naive();
                Ok(RevisionCheckpoint {
                    day,
                    date,
                    retention: self.model.retention(day as f64, strength)?,
                })
            })
            .collect::<RecallResult<Vec<_>>>()?;

        debug!(
            strength,
            horizon_days,
            checkpoints = checkpoints.len(),
            "Built revision schedule"
        );

        Ok(RevisionSchedule {
            strength,
            curve,
            checkpoints,
        })
    }
}

impl Default for RevisionScheduler {
    fn default() -> Self {
        Self::new(RetentionModel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 30, 23, 30, 0).unwrap()
    }

    #[test]
    fn test_default_curve_covers_zero_to_thirty() {
        let scheduler = RevisionScheduler::default();
        let schedule = scheduler.schedule(1.0, as_of()).unwrap();

        assert_eq!(schedule.curve.len(), 31);
        assert_eq!(schedule.curve[0].day, 0);
        assert_eq!(schedule.curve[0].retention, 100.0);
        assert_eq!(schedule.curve[30].day, 30);
    }

    #[test]
    fn test_checkpoints_match_direct_retention() {
        let scheduler = RevisionScheduler::default();
        let model = RetentionModel::new();
        let schedule = scheduler.schedule(1.0, as_of()).unwrap();

        let days: Vec<u32> = schedule.checkpoints.iter().map(|c| c.day).collect();
        assert_eq!(days, vec![1, 3, 7, 14, 30]);

        for checkpoint in &schedule.checkpoints {
            let direct = model.retention(checkpoint.day as f64, 1.0).unwrap();
            assert_eq!(checkpoint.retention, direct);
            assert_eq!(schedule.curve[checkpoint.day as usize].retention, direct);
        }
    }

    #[test]
    fn test_checkpoint_dates_cross_month_boundary() {
        let scheduler = RevisionScheduler::default();
        let schedule = scheduler.schedule(2.0, as_of()).unwrap();

        assert_eq!(
            schedule.checkpoints[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert_eq!(
            schedule.checkpoints[4].date,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_curve_points_sum_to_hundred() {
        let scheduler = RevisionScheduler::default();
        let schedule = scheduler.schedule(0.8, as_of()).unwrap();
        for point in &schedule.curve {
            assert!((point.retention + point.forget_probability - 100.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_custom_horizon_and_checkpoints() {
        let scheduler = RevisionScheduler::default();
        let schedule = scheduler.schedule_with(1.5, 5, &[2], as_of()).unwrap();
        assert_eq!(schedule.curve.len(), 6);
        assert_eq!(schedule.checkpoints.len(), 1);

        let empty = scheduler.schedule_with(1.5, 0, &[], as_of()).unwrap();
        assert_eq!(empty.curve.len(), 1);
        assert!(empty.checkpoints.is_empty());
    }

    #[test]
    fn test_rejects_excessive_horizon() {
        let scheduler = RevisionScheduler::default();
        assert!(scheduler
            .schedule_with(1.0, MAX_HORIZON_DAYS + 1, &[], as_of())
            .is_err());
        assert!(scheduler
            .schedule_with(1.0, 10, &[MAX_HORIZON_DAYS + 5], as_of())
            .is_err());
    }

    #[test]
    fn test_rejects_invalid_strength() {
        let scheduler = RevisionScheduler::default();
        assert!(scheduler.schedule(-1.0, as_of()).is_err());
    }

    #[test]
    fn test_checkpoint_past_last_date_is_rejected() {
        let scheduler = RevisionScheduler::default();
        let near_end = DateTime::<Utc>::MAX_UTC - Duration::days(2);

        let err = scheduler.schedule(1.0, near_end).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ValInvalidInput);
        assert!(scheduler.schedule_with(1.0, 30, &[1], near_end).is_ok());
    }
}
