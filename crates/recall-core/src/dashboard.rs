//! FTI ranking, dashboard alerts and category statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::{FtiCategory, Topic};

/// Dashboard alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    High,
    Medium,
}

/// An alert about a topic at risk of being forgotten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardAlert {
    pub topic_id: String,
    pub topic_name: String,
    pub severity: AlertSeverity,
    pub fti_score: f64,
    pub message: String,
}

/// Counts of topics per FTI category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStatistics {
    pub high: usize,
    pub moderate: usize,
    pub safe: usize,
    pub total: usize,
}

impl CategoryStatistics {
    /// Count categories over a set of topics.
    pub fn from_topics(topics: &[Topic]) -> Self {
        topics.iter().fold(Self::default(), |mut stats, topic| {
            match topic.fti_category {
                FtiCategory::High => stats.high += 1,
                FtiCategory::Moderate => stats.moderate += 1,
                FtiCategory::Safe => stats.safe += 1,
            }
            stats.total += 1;
            stats
        })
    }
}

/// Topics ranked by FTI together with their category counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgettableTopics {
    pub topics: Vec<Topic>,
    pub statistics: CategoryStatistics,
    pub generated_at: DateTime<Utc>,
}

/// Ranked topics and the alerts raised for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub topics: Vec<Topic>,
    pub alerts: Vec<DashboardAlert>,
    pub generated_at: DateTime<Utc>,
}

/// Sort topics by cached FTI score, most forgettable first.
///
/// The sort is stable, so ties keep their input order.
pub fn rank_topics(mut topics: Vec<Topic>) -> Vec<Topic> {
    topics.sort_by(|a, b| b.fti_score.total_cmp(&a.fti_score));
    topics
}

/// Build alerts for topics already in ranked order.
///
/// Every high topic alerts. Only the first moderate topic encountered alerts.
/// Safe topics never alert.
pub fn build_alerts(ranked: &[Topic]) -> Vec<DashboardAlert> {
    let mut alerts = Vec::new();
    let mut moderate_alerted = false;

    for topic in ranked {
        match topic.fti_category {
            FtiCategory::High => alerts.push(DashboardAlert {
                topic_id: topic.id.clone(),
                topic_name: topic.name.clone(),
                severity: AlertSeverity::High,
                fti_score: topic.fti_score,
                message: format!(
                    "{} has HIGH forgettability. Focus on stress training.",
                    topic.name
                ),
            }),
            FtiCategory::Moderate if !moderate_alerted => {
                moderate_alerted = true;
                alerts.push(DashboardAlert {
                    topic_id: topic.id.clone(),
                    topic_name: topic.name.clone(),
                    severity: AlertSeverity::Medium,
                    fti_score: topic.fti_score,
                    message: format!(
                        "{} has MODERATE forgettability. Regular practice needed.",
                        topic.name
                    ),
                });
            }
            _ => {}
        }
    }

    alerts
}

impl Dashboard {
    /// Rank topics and raise alerts.
    pub fn build(topics: Vec<Topic>, generated_at: DateTime<Utc>) -> Self {
        let topics = rank_topics(topics);
        let alerts = build_alerts(&topics);
        Self {
            topics,
            alerts,
            generated_at,
        }
    }
}

impl ForgettableTopics {
    /// Rank topics and count categories.
    pub fn build(topics: Vec<Topic>, generated_at: DateTime<Utc>) -> Self {
        let topics = rank_topics(topics);
        let statistics = CategoryStatistics::from_topics(&topics);
        Self {
            topics,
            statistics,
            generated_at,
        }
    }
}
