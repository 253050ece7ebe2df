//! recall-core - Core library for recall.
//!
//! This crate provides the memory-modeling core of recall: Ebbinghaus
//! retention, adaptive memory strength, the Forgettable Topic Index (FTI)
//! and revision scheduling, plus the topic repository and the
//! [`RecallEngine`] that ties them together.
//!
//! # Example
//!
//! ```ignore
//! use chrono::Utc;
//! use recall_core::{NewRecallAttempt, NewTopic, RecallConfig, RecallEngine};
//!
//! let engine = RecallEngine::with_sqlite(RecallConfig::from_env())?;
//!
//! let now = Utc::now();
//! let topic = engine.add_topic(NewTopic::new("Algorithms", "Graphs"), now)?;
//! engine.record_attempt(&topic.id, NewRecallAttempt::new(false, 85), now)?;
//!
//! let dashboard = engine.dashboard(now)?;
//! ```

pub mod cognitive;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod grading;
pub mod report;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use cognitive::{
    CurvePoint, ForgettabilityScorer, RetentionModel, RevisionCheckpoint, RevisionSchedule,
    RevisionScheduler, StrengthUpdater,
};
pub use config::{RecallConfig, StrengthPolicy};
pub use dashboard::{AlertSeverity, CategoryStatistics, Dashboard, DashboardAlert, ForgettableTopics};
pub use engine::{RecallEngine, RecordedAttempt, RetentionEstimate, TopicCurve};
pub use error::{ErrorCode, RecallError, RecallResult};
pub use grading::AnswerGrader;
pub use report::{PerformanceReport, ReadinessStatus, ReportAlert, TopicPerformance};
pub use store::{SqliteTopicStore, TopicRepository};
pub use types::{
    ExamType, FtiAssessment, FtiCategory, FtiSignals, NewRecallAttempt, NewTopic, RecallAttempt,
    SubmittedAnswer, Topic,
};
