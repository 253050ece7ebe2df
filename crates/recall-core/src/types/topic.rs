//! Study topic types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use super::fti::FtiCategory;
use super::time::check_timestamp;
use crate::error::{RecallError, RecallResult};

/// Strength assigned to every newly created topic.
pub const INITIAL_STRENGTH: f64 = 1.0;

/// Default value for the externally supplied 0-10 profile scores.
pub const DEFAULT_PROFILE_SCORE: f64 = 5.0;

/// Kind of exam a topic is studied for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExamType {
    #[default]
    Semester,
    Competitive,
    Interview,
}

/// A study topic together with its memory-model state.
///
/// `fti_score` and `fti_category` are caches of the forgettability scorer's
/// last output and are recomputed before they are shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Unique identifier.
    pub id: String,
    /// Subject the topic belongs to (e.g. "Data Structures").
    pub subject: String,
    /// Topic name (e.g. "Binary Trees").
    pub name: String,
    /// Exam the topic is studied for.
    pub exam_type: ExamType,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Memory strength; scales the retention decay time.
    pub strength: f64,
    /// Last time the topic was revised (a recall attempt was recorded).
    pub last_revised: DateTime<Utc>,
    /// How abstract the topic is, 0-10.
    pub topic_complexity: f64,
    /// How long the material is, 0-10.
    pub topic_length: f64,
    /// How often the topic appears in exams, 0-10.
    pub exam_frequency: f64,
    /// Number of failed recall attempts.
    pub past_failures: u32,
    /// Cached forgettability index, 0-10.
    pub fti_score: f64,
    /// Cached forgettability category.
    pub fti_category: FtiCategory,
}

impl Topic {
    /// Create a topic with default profile scores, revised at `created_at`.
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            name: name.into(),
            exam_type: ExamType::default(),
            description: String::new(),
            created_at,
            strength: INITIAL_STRENGTH,
            last_revised: created_at,
            topic_complexity: DEFAULT_PROFILE_SCORE,
            topic_length: DEFAULT_PROFILE_SCORE,
            exam_frequency: DEFAULT_PROFILE_SCORE,
            past_failures: 0,
            fti_score: DEFAULT_PROFILE_SCORE,
            fti_category: FtiCategory::Moderate,
        }
    }

    /// Set the exam type.
    pub fn with_exam_type(mut self, exam_type: ExamType) -> Self {
        self.exam_type = exam_type;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the complexity, length and exam-frequency scores.
    pub fn with_profile(mut self, complexity: f64, length: f64, exam_frequency: f64) -> Self {
        self.topic_complexity = complexity;
        self.topic_length = length;
        self.exam_frequency = exam_frequency;
        self
    }

    /// Set the failure counter.
    pub fn with_past_failures(mut self, past_failures: u32) -> Self {
        self.past_failures = past_failures;
        self
    }

    /// Set the memory strength.
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    /// Set the last revision timestamp.
    pub fn with_last_revised(mut self, last_revised: DateTime<Utc>) -> Self {
        self.last_revised = last_revised;
        self
    }

    /// Whole days elapsed between the last revision and `as_of`.
    ///
    /// Negative when `last_revised` lies after `as_of`.
    pub fn days_since_revised(&self, as_of: DateTime<Utc>) -> i64 {
        as_of.signed_duration_since(self.last_revised).num_days()
    }

    /// Check identity, strength and the 0-10 profile scores.
    pub fn validate(&self) -> RecallResult<()> {
        if self.id.trim().is_empty() {
            return Err(RecallError::missing_field("topic id"));
        }
        if !self.strength.is_finite() || self.strength <= 0.0 {
            return Err(RecallError::out_of_range("strength", self.strength, "(0, inf)"));
        }
        check_profile_score("topic_complexity", self.topic_complexity)?;
        check_profile_score("topic_length", self.topic_length)?;
        check_profile_score("exam_frequency", self.exam_frequency)?;
        check_timestamp("created_at", self.created_at)?;
        check_timestamp("last_revised", self.last_revised)?;
        Ok(())
    }
}

/// Input for creating a topic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTopic {
    pub subject: String,
    pub name: String,
    #[serde(default)]
    pub exam_type: ExamType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub topic_complexity: Option<f64>,
    #[serde(default)]
    pub topic_length: Option<f64>,
    #[serde(default)]
    pub exam_frequency: Option<f64>,
    #[serde(default)]
    pub past_failures: Option<u32>,
}

impl NewTopic {
    /// Create an input with the required fields.
    pub fn new(subject: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the exam type.
    pub fn with_exam_type(mut self, exam_type: ExamType) -> Self {
        self.exam_type = exam_type;
        self
    }

    /// Set the complexity, length and exam-frequency scores.
    pub fn with_profile(mut self, complexity: f64, length: f64, exam_frequency: f64) -> Self {
        self.topic_complexity = Some(complexity);
        self.topic_length = Some(length);
        self.exam_frequency = Some(exam_frequency);
        self
    }

    /// Set the initial failure counter.
    pub fn with_past_failures(mut self, past_failures: u32) -> Self {
        self.past_failures = Some(past_failures);
        self
    }

    /// Validate and turn the input into a fresh topic created at `as_of`.
    pub fn into_topic(self, id: impl Into<String>, as_of: DateTime<Utc>) -> RecallResult<Topic> {
        if self.subject.trim().is_empty() {
            return Err(RecallError::missing_field("subject"));
        }
        if self.name.trim().is_empty() {
            return Err(RecallError::missing_field("topic name"));
        }

        let topic = Topic::new(id, self.subject, self.name, as_of)
            .with_exam_type(self.exam_type)
            .with_description(self.description)
            .with_profile(
                self.topic_complexity.unwrap_or(DEFAULT_PROFILE_SCORE),
                self.topic_length.unwrap_or(DEFAULT_PROFILE_SCORE),
                self.exam_frequency.unwrap_or(DEFAULT_PROFILE_SCORE),
            )
            .with_past_failures(self.past_failures.unwrap_or(0));

        topic.validate()?;
        Ok(topic)
    }
}

fn check_profile_score(field: &str, value: f64) -> RecallResult<()> {
    if !value.is_finite() || !(0.0..=10.0).contains(&value) {
        return Err(RecallError::out_of_range(field, value, "[0, 10]"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_topic_defaults() {
        let topic = NewTopic::new("Web Development", "REST APIs")
            .into_topic("t1", at())
            .unwrap();

        assert_eq!(topic.strength, INITIAL_STRENGTH);
        assert_eq!(topic.last_revised, at());
        assert_eq!(topic.topic_complexity, 5.0);
        assert_eq!(topic.past_failures, 0);
        assert_eq!(topic.fti_category, FtiCategory::Moderate);
        assert_eq!(topic.exam_type, ExamType::Semester);
    }

    #[test]
    fn test_new_topic_requires_name() {
        let err = NewTopic::new("Maths", "  ").into_topic("t1", at()).unwrap_err();
        assert!(err.to_string().contains("topic name"));
    }

    #[test]
    fn test_profile_scores_are_range_checked() {
        let err = NewTopic::new("ML", "Neural Networks")
            .with_profile(11.0, 5.0, 5.0)
            .into_topic("t1", at())
            .unwrap_err();
        assert!(err.to_string().contains("topic_complexity"));
    }

    #[test]
    fn test_empty_id_rejected() {
        let topic = Topic::new("", "s", "n", at());
        assert!(topic.validate().is_err());
    }

    #[test]
    fn test_days_since_revised_floors() {
        let topic = Topic::new("t1", "s", "n", at());
        assert_eq!(topic.days_since_revised(at() + Duration::hours(47)), 1);
        assert_eq!(topic.days_since_revised(at() + Duration::days(30)), 30);
        assert_eq!(topic.days_since_revised(at() - Duration::days(2)), -2);
    }

    #[test]
    fn test_exam_type_parses_snake_case() {
        assert_eq!("competitive".parse::<ExamType>().unwrap(), ExamType::Competitive);
        assert_eq!(ExamType::Interview.to_string(), "interview");
    }

    #[test]
    fn test_five_digit_year_rejected() {
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        let err = NewTopic::new("Maths", "Limits")
            .into_topic("t1", far)
            .unwrap_err();
        assert!(err.to_string().contains("created_at"));
    }
}
