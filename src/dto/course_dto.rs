use serde::{Deserialize, Serialize};

use crate::models::course::{Course, CourseSummary};
use crate::models::lesson::Lesson;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseListResponse {
    pub courses: Vec<CourseSummary>,
}

/// Per-lesson slice of the caller's progress inside a course detail payload.
/// A NULL lesson_id row is the course-level completion marker.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProgressEntry {
    pub lesson_id: Option<i64>,
    pub completed: bool,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Quiz metadata for the course page. The questions themselves are only
/// served through the session endpoints, without the answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizMeta {
    pub question_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<Lesson>,
    pub user_progress: Option<Vec<ProgressEntry>>,
    pub quiz: QuizMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDetailResponse {
    pub course: CourseDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonResponse {
    pub lesson: Lesson,
}
