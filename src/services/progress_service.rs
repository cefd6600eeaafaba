use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use crate::database::progress_store::ProgressStore;
use crate::error::{Error, Result};
use crate::models::progress::{CourseProgressOverview, ProgressRecord};

/// Lesson and course progress writes plus the per-user overview. Writes go
/// through the same store the completion orchestrator uses, so the upsert
/// key discipline lives in exactly one place.
#[derive(Clone)]
pub struct ProgressService {
    pool: PgPool,
    store: Arc<dyn ProgressStore>,
}

impl ProgressService {
    pub fn new(pool: PgPool, store: Arc<dyn ProgressStore>) -> Self {
        Self { pool, store }
    }

    pub async fn complete_lesson(&self, user_id: i64, lesson_id: i64) -> Result<ProgressRecord> {
        let course_id = sqlx::query_scalar::<_, i64>("SELECT course_id FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Lesson {} not found", lesson_id)))?;

        let record = self
            .store
            .upsert_progress(user_id, course_id, Some(lesson_id), true, Some(Utc::now()))
            .await?;
        info!("User {} completed lesson {} of course {}", user_id, lesson_id, course_id);
        Ok(record)
    }

    pub async fn save_course_progress(
        &self,
        user_id: i64,
        course_id: i64,
        completed: bool,
    ) -> Result<ProgressRecord> {
        let course = sqlx::query_scalar::<_, i64>("SELECT id FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;
        if course.is_none() {
            return Err(Error::NotFound(format!("Course {} not found", course_id)));
        }

        let completed_at = completed.then(Utc::now);
        self.store
            .upsert_progress(user_id, course_id, None, completed, completed_at)
            .await
    }

    pub async fn overview(&self, user_id: i64) -> Result<Vec<CourseProgressOverview>> {
        let rows = sqlx::query_as::<_, CourseProgressOverview>(
            r#"SELECT c.id AS course_id, c.title AS course_title,
                      COALESCE(up.completed, FALSE) AS course_completed,
                      up.completed_at AS course_completed_at,
                      COUNT(DISTINCT l.id) AS total_lessons,
                      COUNT(DISTINCT lp.lesson_id) AS completed_lessons
               FROM courses c
               LEFT JOIN user_progress up
                      ON up.course_id = c.id AND up.user_id = $1 AND up.lesson_id IS NULL
               LEFT JOIN lessons l ON l.course_id = c.id
               LEFT JOIN user_progress lp
                      ON lp.lesson_id = l.id AND lp.user_id = $1 AND lp.completed = TRUE
               GROUP BY c.id, c.title, up.completed, up.completed_at
               ORDER BY c.id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
