//! Core types for recall.

mod attempt;
mod fti;
mod time;
mod topic;

pub use attempt::{NewRecallAttempt, RecallAttempt, SubmittedAnswer};
pub use fti::{FtiAssessment, FtiCategory, FtiSignals};
pub use time::{check_timestamp, MAX_TIMESTAMP_YEAR};
pub use topic::{ExamType, NewTopic, Topic, DEFAULT_PROFILE_SCORE, INITIAL_STRENGTH};
