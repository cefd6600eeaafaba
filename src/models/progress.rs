use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One progress row. `lesson_id` NULL marks course-level completion,
/// otherwise the row tracks a single lesson.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressRecord {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub lesson_id: Option<i64>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-course aggregate for the progress overview endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseProgressOverview {
    pub course_id: i64,
    pub course_title: String,
    pub course_completed: bool,
    pub course_completed_at: Option<DateTime<Utc>>,
    pub total_lessons: i64,
    pub completed_lessons: i64,
}
