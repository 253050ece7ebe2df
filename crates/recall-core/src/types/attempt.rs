//! Recall attempt types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time::check_timestamp;
use crate::error::{RecallError, RecallResult};

/// One recorded recall attempt for a topic. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallAttempt {
    /// Unique identifier.
    pub id: String,
    /// Topic the attempt belongs to.
    pub topic_id: String,
    /// Question the attempt answered, if the content provider supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    /// The answer the learner gave.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<String>,
    /// Whether the answer was judged correct.
    pub is_correct: bool,
    /// Self-reported stress, 0-100.
    pub stress_level: u8,
    /// Self-reported confidence, 0-100.
    pub confidence: u8,
    /// Response time in seconds.
    pub response_time: f64,
    /// When the attempt was made.
    pub attempted_at: DateTime<Utc>,
}

impl RecallAttempt {
    /// Create an attempt with zero confidence and response time.
    pub fn new(
        id: impl Into<String>,
        topic_id: impl Into<String>,
        is_correct: bool,
        stress_level: u8,
        attempted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            topic_id: topic_id.into(),
            question_id: None,
            user_answer: None,
            is_correct,
            stress_level,
            confidence: 0,
            response_time: 0.0,
            attempted_at,
        }
    }

    /// Set the confidence level.
    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the response time.
    pub fn with_response_time(mut self, seconds: f64) -> Self {
        self.response_time = seconds;
        self
    }

    /// Set the question reference.
    pub fn with_question_id(mut self, question_id: impl Into<String>) -> Self {
        self.question_id = Some(question_id.into());
        self
    }

    /// Set the learner's answer.
    pub fn with_user_answer(mut self, answer: impl Into<String>) -> Self {
        self.user_answer = Some(answer.into());
        self
    }

    /// Check references and ranges of a constructed attempt.
    pub fn validate(&self) -> RecallResult<()> {
        if self.topic_id.trim().is_empty() {
            return Err(RecallError::missing_field("topic reference"));
        }
        if self.stress_level > 100 {
            return Err(RecallError::out_of_range("stress_level", self.stress_level, "[0, 100]"));
        }
        if self.confidence > 100 {
            return Err(RecallError::out_of_range("confidence", self.confidence, "[0, 100]"));
        }
        if !self.response_time.is_finite() || self.response_time < 0.0 {
            return Err(RecallError::out_of_range(
                "response_time",
                self.response_time,
                "[0, inf)",
            ));
        }
        check_timestamp("attempted_at", self.attempted_at)?;
        Ok(())
    }
}

/// Input for recording an attempt whose correctness is already known.
///
/// Levels are signed so that malformed input is reported instead of wrapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRecallAttempt {
    pub is_correct: bool,
    #[serde(default)]
    pub stress_level: i64,
    #[serde(default)]
    pub confidence: i64,
    #[serde(default)]
    pub response_time: f64,
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub user_answer: Option<String>,
    /// Defaults to the caller's as-of time.
    #[serde(default)]
    pub attempted_at: Option<DateTime<Utc>>,
}

impl NewRecallAttempt {
    /// Create an input with the given outcome and stress level.
    pub fn new(is_correct: bool, stress_level: i64) -> Self {
        Self {
            is_correct,
            stress_level,
            ..Default::default()
        }
    }

    /// Set the confidence level.
    pub fn with_confidence(mut self, confidence: i64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the response time.
    pub fn with_response_time(mut self, seconds: f64) -> Self {
        self.response_time = seconds;
        self
    }

    /// Set the attempt timestamp.
    pub fn at(mut self, attempted_at: DateTime<Utc>) -> Self {
        self.attempted_at = Some(attempted_at);
        self
    }

    /// Validate and build the stored attempt.
    pub fn into_attempt(
        self,
        id: impl Into<String>,
        topic_id: impl Into<String>,
        as_of: DateTime<Utc>,
    ) -> RecallResult<RecallAttempt> {
        let stress_level = percent_level("stress_level", self.stress_level)?;
        let confidence = percent_level("confidence", self.confidence)?;
        let attempted_at = self.attempted_at.unwrap_or(as_of);
        if attempted_at > as_of {
            return Err(RecallError::out_of_range(
                "attempted_at",
                attempted_at,
                &format!("(-inf, {}]", as_of),
            ));
        }

        let attempt = RecallAttempt {
            id: id.into(),
            topic_id: topic_id.into(),
            question_id: self.question_id,
            user_answer: self.user_answer,
            is_correct: self.is_correct,
            stress_level,
            confidence,
            response_time: self.response_time,
            attempted_at,
        };

        attempt.validate()?;
        Ok(attempt)
    }
}

/// A free-text answer to be graded against a reference answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub user_answer: String,
    pub correct_answer: String,
    #[serde(default)]
    pub stress_level: i64,
    #[serde(default)]
    pub confidence: i64,
    #[serde(default)]
    pub response_time: f64,
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub attempted_at: Option<DateTime<Utc>>,
}

impl SubmittedAnswer {
    /// Turn the submission into an attempt input with the graded outcome.
    pub fn graded(self, is_correct: bool) -> NewRecallAttempt {
        NewRecallAttempt {
            is_correct,
            stress_level: self.stress_level,
            confidence: self.confidence,
            response_time: self.response_time,
            question_id: self.question_id,
            user_answer: Some(self.user_answer),
            attempted_at: self.attempted_at,
        }
    }
}

fn percent_level(field: &str, value: i64) -> RecallResult<u8> {
    if !(0..=100).contains(&value) {
        return Err(RecallError::out_of_range(field, value, "[0, 100]"));
    }
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_into_attempt_defaults_timestamp() {
        let attempt = NewRecallAttempt::new(true, 80)
            .with_confidence(40)
            .with_response_time(12.5)
            .into_attempt("a1", "t1", at())
            .unwrap();

        assert_eq!(attempt.attempted_at, at());
        assert_eq!(attempt.stress_level, 80);
        assert_eq!(attempt.confidence, 40);
    }

    #[test]
    fn test_stress_out_of_range_rejected() {
        let err = NewRecallAttempt::new(true, 101)
            .into_attempt("a1", "t1", at())
            .unwrap_err();
        assert!(err.to_string().contains("stress_level"));

        let err = NewRecallAttempt::new(true, -1)
            .into_attempt("a1", "t1", at())
            .unwrap_err();
        assert!(err.to_string().contains("stress_level"));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let err = NewRecallAttempt::new(false, 10)
            .with_confidence(250)
            .into_attempt("a1", "t1", at())
            .unwrap_err();
        assert!(err.to_string().contains("confidence"));
    }

    #[test]
    fn test_empty_topic_reference_rejected() {
        let err = NewRecallAttempt::new(true, 10)
            .into_attempt("a1", "", at())
            .unwrap_err();
        assert!(err.to_string().contains("topic reference"));
    }

    #[test]
    fn test_negative_response_time_rejected() {
        let err = NewRecallAttempt::new(true, 10)
            .with_response_time(-3.0)
            .into_attempt("a1", "t1", at())
            .unwrap_err();
        assert!(err.to_string().contains("response_time"));
    }

    #[test]
    fn test_submitted_answer_keeps_answer_text() {
        let submitted = SubmittedAnswer {
            user_answer: "inorder traversal".to_string(),
            correct_answer: "traversal".to_string(),
            stress_level: 75,
            ..Default::default()
        };
        let input = submitted.graded(true);
        assert!(input.is_correct);
        assert_eq!(input.stress_level, 75);
        assert_eq!(input.user_answer.as_deref(), Some("inorder traversal"));
    }

    #[test]
    fn test_attempt_after_as_of_rejected() {
        let err = NewRecallAttempt::new(true, 10)
            .at(at() + chrono::Duration::seconds(1))
            .into_attempt("a1", "t1", at())
            .unwrap_err();
        assert!(err.to_string().contains("attempted_at"));
    }

    #[test]
    fn test_five_digit_year_rejected() {
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        let err = NewRecallAttempt::new(true, 10)
            .into_attempt("a1", "t1", far)
            .unwrap_err();
        assert!(err.to_string().contains("attempted_at"));
    }
}
