//! SQLite-backed topic store.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::debug;

use super::TopicRepository;
use crate::cognitive::StrengthUpdater;
use crate::error::{ErrorCode, RecallError, RecallResult};
use crate::types::{FtiCategory, RecallAttempt, Topic};

const TOPIC_COLUMNS: &str = "id, subject, name, exam_type, description, created_at, strength,
     last_revised, topic_complexity, topic_length, exam_frequency, past_failures,
     fti_score, fti_category";

const ATTEMPT_COLUMNS: &str = "id, topic_id, question_id, user_answer, is_correct,
     stress_level, confidence, response_time, attempted_at";

/// SQLite store for topics and recall attempts.
///
/// A single connection behind a mutex; every write runs while the lock is
/// held, which serializes strength updates for all topics.
pub struct SqliteTopicStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTopicStore {
    /// Open (or create) a store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> RecallResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|e| RecallError::Database {
            message: e.to_string(),
            code: ErrorCode::DbConnectionFailed,
            source: Some(Box::new(e)),
        })?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> RecallResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> RecallResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> RecallResult<()> {
        let conn = self.conn.lock().map_err(|e| RecallError::database(e.to_string()))?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS topics (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                subject TEXT NOT NULL,
                name TEXT NOT NULL,
                exam_type TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                strength REAL NOT NULL DEFAULT 1.0,
                last_revised TEXT NOT NULL,
                topic_complexity REAL NOT NULL DEFAULT 5.0,
                topic_length REAL NOT NULL DEFAULT 5.0,
                exam_frequency REAL NOT NULL DEFAULT 5.0,
                past_failures INTEGER NOT NULL DEFAULT 0,
                fti_score REAL NOT NULL DEFAULT 5.0,
                fti_category TEXT NOT NULL DEFAULT 'moderate'
            );

            -- Append-only recall history
            CREATE TABLE IF NOT EXISTS recall_attempts (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                topic_id TEXT NOT NULL,
                question_id TEXT,
                user_answer TEXT,
                is_correct INTEGER NOT NULL,
                stress_level INTEGER NOT NULL,
                confidence INTEGER NOT NULL,
                response_time REAL NOT NULL,
                attempted_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_recall_attempts_topic
                ON recall_attempts(topic_id, attempted_at);
            ",
        )?;

        Ok(())
    }
}

impl TopicRepository for SqliteTopicStore {
    fn insert_topic(&self, topic: &Topic) -> RecallResult<()> {
        topic.validate()?;
        let conn = self.conn.lock().map_err(|e| RecallError::database(e.to_string()))?;

        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM topics WHERE id = ?1",
                params![topic.id],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if exists {
            return Err(RecallError::InvalidArgument {
                message: format!("Topic with id '{}' already exists", topic.id),
                code: ErrorCode::TopicDuplicate,
                suggestion: None,
            });
        }

        conn.execute(
            &format!(
                "INSERT INTO topics ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                TOPIC_COLUMNS
            ),
            params![
                topic.id,
                topic.subject,
                topic.name,
                topic.exam_type.to_string(),
                topic.description,
                timestamp(topic.created_at),
                topic.strength,
                timestamp(topic.last_revised),
                topic.topic_complexity,
                topic.topic_length,
                topic.exam_frequency,
                topic.past_failures,
                topic.fti_score,
                topic.fti_category.as_str(),
            ],
        )?;

        Ok(())
    }

    fn get_topic(&self, topic_id: &str) -> RecallResult<Option<Topic>> {
        let conn = self.conn.lock().map_err(|e| RecallError::database(e.to_string()))?;
        load_topic(&conn, topic_id)
    }

    fn list_topics(&self) -> RecallResult<Vec<Topic>> {
        let conn = self.conn.lock().map_err(|e| RecallError::database(e.to_string()))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM topics ORDER BY seq ASC",
            TOPIC_COLUMNS
        ))?;
        let topics = stmt
            .query_map([], row_to_topic)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(topics)
    }

    fn delete_topic(&self, topic_id: &str) -> RecallResult<bool> {
        let mut conn = self.conn.lock().map_err(|e| RecallError::database(e.to_string()))?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM recall_attempts WHERE topic_id = ?1",
            params![topic_id],
        )?;
        let deleted = tx.execute("DELETE FROM topics WHERE id = ?1", params![topic_id])?;
        tx.commit()?;

        Ok(deleted > 0)
    }

    fn attempts_for_topic(&self, topic_id: &str) -> RecallResult<Vec<RecallAttempt>> {
        let conn = self.conn.lock().map_err(|e| RecallError::database(e.to_string()))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM recall_attempts WHERE topic_id = ?1 ORDER BY attempted_at ASC, seq ASC",
            ATTEMPT_COLUMNS
        ))?;
        let attempts = stmt
            .query_map(params![topic_id], row_to_attempt)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(attempts)
    }

    fn record_attempt(
        &self,
        attempt: &RecallAttempt,
        updater: &StrengthUpdater,
    ) -> RecallResult<Topic> {
        attempt.validate()?;
        let mut conn = self.conn.lock().map_err(|e| RecallError::database(e.to_string()))?;
        let tx = conn.transaction()?;

        let (old_strength, last_revised): (f64, DateTime<Utc>) = tx
            .query_row(
                "SELECT strength, last_revised FROM topics WHERE id = ?1",
                params![attempt.topic_id],
                |row| Ok((row.get(0)?, parse_timestamp(row, 1)?)),
            )
            .optional()?
            .ok_or_else(|| RecallError::not_found(attempt.topic_id.clone()))?;

        // Attempts are applied in time order, so last_revised never moves back
        if attempt.attempted_at < last_revised {
            return Err(RecallError::out_of_range(
                "attempted_at",
                attempt.attempted_at,
                &format!("[{}, now]", last_revised),
            ));
        }

        let new_strength = updater.update(old_strength, attempt.is_correct)?;

        tx.execute(
            &format!(
                "INSERT INTO recall_attempts ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                ATTEMPT_COLUMNS
            ),
            params![
                attempt.id,
                attempt.topic_id,
                attempt.question_id,
                attempt.user_answer,
                attempt.is_correct,
                attempt.stress_level,
                attempt.confidence,
                attempt.response_time,
                timestamp(attempt.attempted_at),
            ],
        )?;

        tx.execute(
            "UPDATE topics
             SET strength = ?2,
                 last_revised = ?3,
                 past_failures = past_failures + ?4
             WHERE id = ?1",
            params![
                attempt.topic_id,
                new_strength,
                timestamp(attempt.attempted_at),
                if attempt.is_correct { 0 } else { 1 },
            ],
        )?;

        let topic = load_topic(&tx, &attempt.topic_id)?
            .ok_or_else(|| RecallError::not_found(attempt.topic_id.clone()))?;
        tx.commit()?;

        debug!(
            topic_id = %attempt.topic_id,
            old_strength,
            new_strength,
            is_correct = attempt.is_correct,
            "Applied strength update"
        );

        Ok(topic)
    }

    fn save_fti(&self, topic_id: &str, score: f64, category: FtiCategory) -> RecallResult<()> {
        let conn = self.conn.lock().map_err(|e| RecallError::database(e.to_string()))?;

        let updated = conn.execute(
            "UPDATE topics SET fti_score = ?2, fti_category = ?3 WHERE id = ?1",
            params![topic_id, score, category.as_str()],
        )?;
        if updated == 0 {
            return Err(RecallError::not_found(topic_id));
        }

        Ok(())
    }
}

fn load_topic(conn: &Connection, topic_id: &str) -> RecallResult<Option<Topic>> {
    let topic = conn
        .query_row(
            &format!("SELECT {} FROM topics WHERE id = ?1", TOPIC_COLUMNS),
            params![topic_id],
            row_to_topic,
        )
        .optional()?;
    Ok(topic)
}

fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_topic(row: &Row<'_>) -> rusqlite::Result<Topic> {
    Ok(Topic {
        id: row.get(0)?,
        subject: row.get(1)?,
        name: row.get(2)?,
        exam_type: parse_column(row, 3)?,
        description: row.get(4)?,
        created_at: parse_timestamp(row, 5)?,
        strength: row.get(6)?,
        last_revised: parse_timestamp(row, 7)?,
        topic_complexity: row.get(8)?,
        topic_length: row.get(9)?,
        exam_frequency: row.get(10)?,
        past_failures: row.get(11)?,
        fti_score: row.get(12)?,
        fti_category: parse_column(row, 13)?,
    })
}

fn row_to_attempt(row: &Row<'_>) -> rusqlite::Result<RecallAttempt> {
    Ok(RecallAttempt {
        id: row.get(0)?,
        topic_id: row.get(1)?,
        question_id: row.get(2)?,
        user_answer: row.get(3)?,
        is_correct: row.get(4)?,
        stress_level: row.get(5)?,
        confidence: row.get(6)?,
        response_time: row.get(7)?,
        attempted_at: parse_timestamp(row, 8)?,
    })
}
