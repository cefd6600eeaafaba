use serde::{Deserialize, Serialize};

use crate::models::progress::{CourseProgressOverview, ProgressRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseProgressRequest {
    pub course_id: i64,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdateResponse {
    pub message: String,
    pub progress: ProgressRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressOverviewResponse {
    pub progress: Vec<CourseProgressOverview>,
}
