use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SurveyResponse {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub rating: i32,
    pub liked: String,
    pub improvement: String,
    pub recommend: bool,
    pub submitted_at: DateTime<Utc>,
}

/// Validated survey content headed for storage. Free-text fields default to
/// empty strings rather than NULLs, matching the stored shape.
#[derive(Debug, Clone)]
pub struct SurveyFeedback {
    pub rating: i32,
    pub liked: String,
    pub improvement: String,
    pub recommend: bool,
}
