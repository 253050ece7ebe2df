//! The recall engine: topic lifecycle, attempt recording and FTI views over
//! an injected repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cognitive::{
    ForgettabilityScorer, RetentionModel, RevisionSchedule, RevisionScheduler, StrengthUpdater,
};
use crate::config::RecallConfig;
use crate::dashboard::{Dashboard, ForgettableTopics};
use crate::error::{RecallError, RecallResult};
use crate::grading::AnswerGrader;
use crate::report::PerformanceReport;
use crate::store::{SqliteTopicStore, TopicRepository};
use crate::types::{
    FtiAssessment, NewRecallAttempt, NewTopic, RecallAttempt, SubmittedAnswer, Topic,
};

/// Result of recording an attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedAttempt {
    pub attempt: RecallAttempt,
    /// The topic after the strength update and FTI refresh.
    pub topic: Topic,
    pub fti: FtiAssessment,
}

/// Retention and forgetting probability for one (days, strength) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetentionEstimate {
    pub days_elapsed: f64,
    pub strength: f64,
    pub retention: f64,
    pub forget_probability: f64,
}

/// A topic's forgetting curve starting from `as_of`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicCurve {
    pub topic_id: String,
    pub topic_name: String,
    /// Retention right now, from whole days since the last revision.
    pub current_retention: f64,
    pub schedule: RevisionSchedule,
}

/// Facade over the memory model and a topic repository.
pub struct RecallEngine {
    config: RecallConfig,
    repo: Arc<dyn TopicRepository>,
    retention: RetentionModel,
    strength: StrengthUpdater,
    scorer: ForgettabilityScorer,
    scheduler: RevisionScheduler,
    grader: AnswerGrader,
}

impl RecallEngine {
    /// Create an engine over the given repository.
    pub fn new(config: RecallConfig, repo: Arc<dyn TopicRepository>) -> RecallResult<Self> {
        config.validate()?;

        let retention = RetentionModel::from_config(&config.retention);
        let strength = StrengthUpdater::from_config(&config.strength);
        let scorer = ForgettabilityScorer::from_config(config.fti.clone())?;
        let scheduler = RevisionScheduler::from_config(retention, &config.schedule);

        Ok(Self {
            config,
            repo,
            retention,
            strength,
            scorer,
            scheduler,
            grader: AnswerGrader::new(),
        })
    }

    /// Create an engine backed by the SQLite database at `config.db_path`.
    pub fn with_sqlite(config: RecallConfig) -> RecallResult<Self> {
        let store = SqliteTopicStore::new(&config.db_path)?;
        info!(db_path = %config.db_path.display(), "Opened topic store");
        Self::new(config, Arc::new(store))
    }

    /// Create an engine backed by an in-memory SQLite database.
    pub fn in_memory(config: RecallConfig) -> RecallResult<Self> {
        Self::new(config, Arc::new(SqliteTopicStore::in_memory()?))
    }

    pub fn config(&self) -> &RecallConfig {
        &self.config
    }

    pub fn retention_model(&self) -> &RetentionModel {
        &self.retention
    }

    pub fn strength_updater(&self) -> &StrengthUpdater {
        &self.strength
    }

    pub fn scorer(&self) -> &ForgettabilityScorer {
        &self.scorer
    }

    pub fn scheduler(&self) -> &RevisionScheduler {
        &self.scheduler
    }

    /// Create a topic at `as_of` with its initial FTI cached.
    pub fn add_topic(&self, input: NewTopic, as_of: DateTime<Utc>) -> RecallResult<Topic> {
        let mut topic = input.into_topic(Uuid::new_v4().to_string(), as_of)?;

        let assessment = self.scorer.score(&topic, &[], as_of)?;
        topic.fti_score = assessment.score;
        topic.fti_category = assessment.category;

        self.repo.insert_topic(&topic)?;
        info!(
            topic_id = %topic.id,
            subject = %topic.subject,
            name = %topic.name,
            "Added topic"
        );

        Ok(topic)
    }

    /// Fetch a topic with its FTI recomputed at `as_of`.
    ///
    /// Fails with `NotFound` when the topic does not exist.
    pub fn get_topic(&self, topic_id: &str, as_of: DateTime<Utc>) -> RecallResult<Topic> {
        let topic = self.load_topic(topic_id)?;
        let (topic, _) = self.refresh_topic(topic, as_of)?;
        Ok(topic)
    }

    /// All topics in creation order, each with its FTI recomputed at `as_of`.
    pub fn list_topics(&self, as_of: DateTime<Utc>) -> RecallResult<Vec<Topic>> {
        self.refresh_all(as_of)
    }

    pub fn topic_count(&self) -> RecallResult<usize> {
        Ok(self.repo.list_topics()?.len())
    }

    /// Delete a topic and its attempt history.
    pub fn delete_topic(&self, topic_id: &str) -> RecallResult<()> {
        if !self.repo.delete_topic(topic_id)? {
            return Err(RecallError::not_found(topic_id));
        }
        info!(topic_id, "Deleted topic");
        Ok(())
    }

    /// Attempts recorded for a topic, oldest first.
    pub fn attempts(&self, topic_id: &str) -> RecallResult<Vec<RecallAttempt>> {
        self.load_topic(topic_id)?;
        self.repo.attempts_for_topic(topic_id)
    }

    /// Record an attempt whose outcome is already known.
    ///
    /// The attempt is stamped at `as_of` unless it carries its own timestamp.
    /// Strength, `last_revised` and the failure counter are updated in the
    /// same repository step, then the FTI cache is refreshed.
    pub fn record_attempt(
        &self,
        topic_id: &str,
        input: NewRecallAttempt,
        as_of: DateTime<Utc>,
    ) -> RecallResult<RecordedAttempt> {
        if topic_id.trim().is_empty() {
            return Err(RecallError::missing_field("topic_id"));
        }

        let attempt = input.into_attempt(Uuid::new_v4().to_string(), topic_id, as_of)?;
        let topic = self.repo.record_attempt(&attempt, &self.strength)?;

        info!(
            topic_id,
            attempt_id = %attempt.id,
            is_correct = attempt.is_correct,
            stress_level = attempt.stress_level,
            strength = topic.strength,
            "Recorded recall attempt"
        );

        let (topic, fti) = self.refresh_topic(topic, as_of)?;
        Ok(RecordedAttempt {
            attempt,
            topic,
            fti,
        })
    }

    /// Grade a free-text answer and record the resulting attempt.
    pub fn submit_answer(
        &self,
        topic_id: &str,
        answer: SubmittedAnswer,
        as_of: DateTime<Utc>,
    ) -> RecallResult<RecordedAttempt> {
        if answer.correct_answer.trim().is_empty() {
            return Err(RecallError::missing_field("correct_answer"));
        }

        let is_correct = self.grader.grade(&answer.user_answer, &answer.correct_answer);
        debug!(topic_id, is_correct, "Graded submitted answer");

        self.record_attempt(topic_id, answer.graded(is_correct), as_of)
    }

    /// Recompute a topic's FTI from its attempts and store the result.
    pub fn refresh_fti(&self, topic_id: &str, as_of: DateTime<Utc>) -> RecallResult<FtiAssessment> {
        let topic = self.load_topic(topic_id)?;
        let (_, assessment) = self.refresh_topic(topic, as_of)?;
        Ok(assessment)
    }

    /// All topics ranked by freshly computed FTI, with category counts.
    pub fn forgettable_topics(&self, as_of: DateTime<Utc>) -> RecallResult<ForgettableTopics> {
        let topics = self.refresh_all(as_of)?;
        Ok(ForgettableTopics::build(topics, as_of))
    }

    /// All topics ranked by freshly computed FTI, with alerts.
    pub fn dashboard(&self, as_of: DateTime<Utc>) -> RecallResult<Dashboard> {
        let topics = self.refresh_all(as_of)?;
        let dashboard = Dashboard::build(topics, as_of);
        debug!(
            topics = dashboard.topics.len(),
            alerts = dashboard.alerts.len(),
            "Built dashboard"
        );
        Ok(dashboard)
    }

    /// Forgetting curve and revision checkpoints for a topic.
    pub fn forgetting_curve(&self, topic_id: &str, as_of: DateTime<Utc>) -> RecallResult<TopicCurve> {
        let topic = self.load_topic(topic_id)?;
        let current_retention =
            self.retention
                .retention_as_of(topic.strength, topic.last_revised, as_of)?;
        let schedule = self.scheduler.schedule(topic.strength, as_of)?;

        Ok(TopicCurve {
            topic_id: topic.id,
            topic_name: topic.name,
            current_retention,
            schedule,
        })
    }

    /// Performance report over every topic.
    pub fn report(&self, as_of: DateTime<Utc>) -> RecallResult<PerformanceReport> {
        let entries = self
            .repo
            .list_topics()?
            .into_iter()
            .map(|topic| {
                let attempts = self.repo.attempts_for_topic(&topic.id)?;
                Ok((topic, attempts))
            })
            .collect::<RecallResult<Vec<_>>>()?;

        let report =
            PerformanceReport::build(&entries, &self.retention, &self.config.report, as_of)?;
        debug!(
            topics = report.total_topics,
            readiness = report.readiness_score,
            status = %report.readiness_status,
            "Built performance report"
        );
        Ok(report)
    }

    /// Retention estimate for arbitrary inputs.
    pub fn retention(&self, days_elapsed: f64, strength: f64) -> RecallResult<RetentionEstimate> {
        let retention = self.retention.retention(days_elapsed, strength)?;
        Ok(RetentionEstimate {
            days_elapsed,
            strength,
            retention,
            forget_probability: 100.0 - retention,
        })
    }

    fn load_topic(&self, topic_id: &str) -> RecallResult<Topic> {
        self.repo
            .get_topic(topic_id)?
            .ok_or_else(|| RecallError::not_found(topic_id))
    }

    fn refresh_all(&self, as_of: DateTime<Utc>) -> RecallResult<Vec<Topic>> {
        self.repo
            .list_topics()?
            .into_iter()
            .map(|topic| self.refresh_topic(topic, as_of).map(|(topic, _)| topic))
            .collect()
    }

    fn refresh_topic(
        &self,
        mut topic: Topic,
        as_of: DateTime<Utc>,
    ) -> RecallResult<(Topic, FtiAssessment)> {
        let attempts = self.repo.attempts_for_topic(&topic.id)?;
        let assessment = self.scorer.score(&topic, &attempts, as_of)?;

        self.repo
            .save_fti(&topic.id, assessment.score, assessment.category)?;
        topic.fti_score = assessment.score;
        topic.fti_category = assessment.category;

        Ok((topic, assessment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::types::FtiCategory;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap()
    }

    fn engine() -> RecallEngine {
        RecallEngine::in_memory(RecallConfig::default()).unwrap()
    }

    #[test]
    fn test_add_topic_caches_initial_fti() {
        let engine = engine();
        let topic = engine
            .add_topic(
                NewTopic::new("Algorithms", "Dynamic Programming").with_profile(10.0, 10.0, 0.0),
                now(),
            )
            .unwrap();

        assert_eq!(topic.strength, 1.0);
        assert_eq!(topic.last_revised, now());
        assert_eq!(topic.fti_score, 3.0);
        assert_eq!(topic.fti_category, FtiCategory::Safe);
        assert_eq!(engine.get_topic(&topic.id, now()).unwrap(), topic);
    }

    #[test]
    fn test_record_attempt_updates_strength_and_failures() {
        let engine = engine();
        let topic = engine
            .add_topic(NewTopic::new("Chemistry", "Redox"), now())
            .unwrap();

        let later = now() + Duration::days(2);
        let recorded = engine
            .record_attempt(&topic.id, NewRecallAttempt::new(false, 85), later)
            .unwrap();

        assert!((recorded.topic.strength - 1.05).abs() < 1e-12);
        assert_eq!(recorded.topic.past_failures, 1);
        assert_eq!(recorded.topic.last_revised, later);
        assert_eq!(recorded.attempt.attempted_at, later);
        assert_eq!(recorded.topic.fti_score, recorded.fti.score);
    }

    #[test]
    fn test_record_attempt_rejects_bad_stress() {
        let engine = engine();
        let topic = engine
            .add_topic(NewTopic::new("Chemistry", "Redox"), now())
            .unwrap();

        let err = engine
            .record_attempt(&topic.id, NewRecallAttempt::new(true, 101), now())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValOutOfRange);
        assert!(engine.attempts(&topic.id).unwrap().is_empty());
    }

    #[test]
    fn test_backdated_attempt_keeps_last_revised() {
        let engine = engine();
        let topic = engine
            .add_topic(NewTopic::new("Chemistry", "Redox"), now())
            .unwrap();

        let revised = now() + Duration::days(20);
        engine
            .record_attempt(&topic.id, NewRecallAttempt::new(true, 30), revised)
            .unwrap();

        let err = engine
            .record_attempt(
                &topic.id,
                NewRecallAttempt::new(false, 30).at(now()),
                now() + Duration::days(21),
            )
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValOutOfRange);
        assert!(err.to_string().contains("attempted_at"));

        let stored = engine
            .get_topic(&topic.id, now() + Duration::days(21))
            .unwrap();
        assert_eq!(stored.last_revised, revised);
        assert_eq!(stored.past_failures, 0);
        assert_eq!(engine.attempts(&topic.id).unwrap().len(), 1);
    }

    #[test]
    fn test_far_future_timestamps_rejected_before_storage() {
        let engine = engine();
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();

        let err = engine
            .add_topic(NewTopic::new("Chemistry", "Redox"), far)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValOutOfRange);
        assert!(engine.list_topics(now()).unwrap().is_empty());

        let topic = engine
            .add_topic(NewTopic::new("Chemistry", "Redox"), now())
            .unwrap();
        let err = engine
            .record_attempt(&topic.id, NewRecallAttempt::new(true, 10), far)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValOutOfRange);
        assert_eq!(engine.list_topics(now()).unwrap().len(), 1);
        assert!(engine.attempts(&topic.id).unwrap().is_empty());
    }

    #[test]
    fn test_record_attempt_unknown_topic() {
        let engine = engine();
        let err = engine
            .record_attempt("nope", NewRecallAttempt::new(true, 10), now())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::TopicNotFound);
    }

    #[test]
    fn test_submit_answer_grades_before_recording() {
        let engine = engine();
        let topic = engine
            .add_topic(NewTopic::new("Biology", "Mitosis"), now())
            .unwrap();

        let answer = SubmittedAnswer {
            user_answer: "The cell splits during Anaphase".to_string(),
            correct_answer: "anaphase".to_string(),
            stress_level: 40,
            ..Default::default()
        };
        let recorded = engine.submit_answer(&topic.id, answer, now()).unwrap();

        assert!(recorded.attempt.is_correct);
        assert!((recorded.topic.strength - 0.95).abs() < 1e-12);
        assert_eq!(
            recorded.attempt.user_answer.as_deref(),
            Some("The cell splits during Anaphase")
        );
    }

    #[test]
    fn test_submit_answer_requires_reference() {
        let engine = engine();
        let topic = engine
            .add_topic(NewTopic::new("Biology", "Mitosis"), now())
            .unwrap();

        let answer = SubmittedAnswer {
            user_answer: "anything".to_string(),
            ..Default::default()
        };
        assert!(engine.submit_answer(&topic.id, answer, now()).is_err());
    }

    #[test]
    fn test_delete_missing_topic() {
        let engine = engine();
        let err = engine.delete_topic("ghost").unwrap_err();
        assert_eq!(err.code(), ErrorCode::TopicNotFound);
    }

    #[test]
    fn test_forgetting_curve_for_topic() {
        let engine = engine();
        let topic = engine
            .add_topic(NewTopic::new("Physics", "Optics"), now())
            .unwrap();

        let curve = engine
            .forgetting_curve(&topic.id, now() + Duration::days(3))
            .unwrap();
        assert_eq!(curve.schedule.curve.len(), 31);
        assert_eq!(curve.schedule.checkpoints.len(), 5);
        assert_eq!(
            curve.current_retention,
            engine.retention(3.0, 1.0).unwrap().retention
        );
    }

    #[test]
    fn test_retention_estimate() {
        let estimate = engine().retention(0.0, 2.0).unwrap();
        assert_eq!(estimate.retention, 100.0);
        assert_eq!(estimate.forget_probability, 0.0);
        assert!(engine().retention(1.0, 0.0).is_err());
    }
}
