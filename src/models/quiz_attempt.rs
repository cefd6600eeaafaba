use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// A finished attempt as stored in the append-only log.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub user_id: i64,
    pub course_id: i64,
    pub score: i32,
    pub correct_count: i32,
    pub total_questions: i32,
    pub answers: JsonValue,
    pub passed: bool,
    pub attempted_at: DateTime<Utc>,
}

/// Insert payload for a new attempt row. The id is generated by the caller
/// so it can be reported back to the session before the insert commits.
#[derive(Debug, Clone)]
pub struct NewQuizAttempt {
    pub id: Uuid,
    pub user_id: i64,
    pub course_id: i64,
    pub score: i32,
    pub correct_count: i32,
    pub total_questions: i32,
    pub answers: Vec<Option<i32>>,
    pub passed: bool,
    pub attempted_at: DateTime<Utc>,
}
