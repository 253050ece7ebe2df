//! Persistence contract for topics and recall attempts.
//!
//! The memory-modeling core never touches storage directly. The engine talks
//! to an injected [`TopicRepository`]; [`SqliteTopicStore`] is the bundled
//! implementation.

mod sqlite;

pub use sqlite::SqliteTopicStore;

use crate::cognitive::StrengthUpdater;
use crate::error::RecallResult;
use crate::types::{FtiCategory, RecallAttempt, Topic};

/// Storage for topics and their append-only recall history.
pub trait TopicRepository: Send + Sync {
    /// Insert a new topic. Fails if the id already exists.
    fn insert_topic(&self, topic: &Topic) -> RecallResult<()>;

    /// Fetch a topic by id.
    fn get_topic(&self, topic_id: &str) -> RecallResult<Option<Topic>>;

    /// All topics in creation order.
    fn list_topics(&self) -> RecallResult<Vec<Topic>>;

    /// Delete a topic and its attempts. Returns whether the topic existed.
    fn delete_topic(&self, topic_id: &str) -> RecallResult<bool>;

    /// Attempts for a topic ordered by `attempted_at`, then insertion.
    fn attempts_for_topic(&self, topic_id: &str) -> RecallResult<Vec<RecallAttempt>>;

    /// Append an attempt and apply its strength update as one atomic step.
    ///
    /// Implementations must serialize this per topic: the strength read, the
    /// attempt insert, the new strength, `last_revised = attempted_at` and the
    /// failure counter increment (for incorrect attempts) become visible
    /// together. Returns the updated topic.
    fn record_attempt(
        &self,
        attempt: &RecallAttempt,
        updater: &StrengthUpdater,
    ) -> RecallResult<Topic>;

    /// Store the cached FTI score and category.
    fn save_fti(&self, topic_id: &str, score: f64, category: FtiCategory) -> RecallResult<()>;
}
