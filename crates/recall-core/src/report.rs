//! Performance report: per-topic retention and accuracy plus exam readiness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::cognitive::RetentionModel;
use crate::config::ReportConfig;
use crate::error::RecallResult;
use crate::types::{ExamType, RecallAttempt, Topic};

/// Action attached to weak-retention alerts.
pub const REVISE_NOW: &str = "schedule revision immediately";

/// Overall exam readiness bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    NeedsPractice,
    NotReady,
}

/// Per-topic line of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicPerformance {
    pub topic_id: String,
    pub topic_name: String,
    pub subject: String,
    pub exam_type: ExamType,
    pub strength: f64,
    /// Retention percentage as of the report time.
    pub retention: f64,
    /// Correct answers as a percentage of attempts; 0 without attempts.
    pub accuracy: f64,
    pub attempts: usize,
    pub last_revised: DateTime<Utc>,
}

/// A topic whose retention has fallen below the weak-retention threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAlert {
    pub topic_id: String,
    pub topic_name: String,
    pub retention: f64,
    pub message: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_topics: usize,
    pub average_strength: f64,
    pub average_accuracy: f64,
    pub readiness_score: f64,
    pub readiness_status: ReadinessStatus,
    pub topics: Vec<TopicPerformance>,
    pub alerts: Vec<ReportAlert>,
    pub generated_at: DateTime<Utc>,
}

impl PerformanceReport {
    /// Build a report from topics paired with their attempts.
    pub fn build(
        entries: &[(Topic, Vec<RecallAttempt>)],
        model: &RetentionModel,
        config: &ReportConfig,
        as_of: DateTime<Utc>,
    ) -> RecallResult<Self> {
        let mut topics = Vec::with_capacity(entries.len());
        let mut alerts = Vec::new();
        let mut total_correct = 0usize;
        let mut total_attempts = 0usize;

        for (topic, attempts) in entries {
            let retention = model.retention_as_of(topic.strength, topic.last_revised, as_of)?;
            let correct = attempts.iter().filter(|a| a.is_correct).count();
            total_correct += correct;
            total_attempts += attempts.len();

            if retention < config.weak_retention_threshold {
                alerts.push(ReportAlert {
                    topic_id: topic.id.clone(),
                    topic_name: topic.name.clone(),
                    retention,
                    message: format!("Weak recall strength: {:.0}% retention", retention),
                    action: REVISE_NOW.to_string(),
                });
            }

            topics.push(TopicPerformance {
                topic_id: topic.id.clone(),
                topic_name: topic.name.clone(),
                subject: topic.subject.clone(),
                exam_type: topic.exam_type,
                strength: topic.strength,
                retention,
                accuracy: percentage(correct, attempts.len()),
                attempts: attempts.len(),
                last_revised: topic.last_revised,
            });
        }

        let average_strength = if topics.is_empty() {
            0.0
        } else {
            topics.iter().map(|t| t.strength).sum::<f64>() / topics.len() as f64
        };
        let average_accuracy = percentage(total_correct, total_attempts);
        let readiness_score = (average_accuracy * average_strength).min(100.0);

        Ok(Self {
            total_topics: topics.len(),
            average_strength,
            average_accuracy,
            readiness_score,
            readiness_status: readiness_status(readiness_score, config),
            topics,
            alerts,
            generated_at: as_of,
        })
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn readiness_status(score: f64, config: &ReportConfig) -> ReadinessStatus {
    if score >= config.ready_threshold {
        ReadinessStatus::Ready
    } else if score >= config.practice_threshold {
        ReadinessStatus::NeedsPractice
    } else {
        ReadinessStatus::NotReady
    }
}
