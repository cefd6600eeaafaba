use std::sync::Arc;

use sqlx::PgPool;

use crate::database::quiz_store::QuizStore;
use crate::dto::course_dto::{CourseDetail, ProgressEntry, QuizMeta};
use crate::dto::quiz_dto::PublicQuizQuestion;
use crate::error::{Error, Result};
use crate::models::course::{Course, CourseSummary};
use crate::models::lesson::Lesson;

/// Catalog reads. Quiz questions are fetched through the same store the
/// session flow uses, so there is a single question source either way.
#[derive(Clone)]
pub struct CourseService {
    pool: PgPool,
    quiz_store: Arc<dyn QuizStore>,
}

impl CourseService {
    pub fn new(pool: PgPool, quiz_store: Arc<dyn QuizStore>) -> Self {
        Self { pool, quiz_store }
    }

    /// All courses with lesson counts. Completion flags are only meaningful
    /// for an authenticated caller; anonymous listings get `false`.
    pub async fn list_courses(&self, user_id: Option<i64>) -> Result<Vec<CourseSummary>> {
        let courses = sqlx::query_as::<_, CourseSummary>(
            r#"SELECT c.id, c.title, c.description, c.duration, c.level,
                      c.created_at, c.updated_at,
                      COUNT(DISTINCT l.id) AS lesson_count,
                      BOOL_OR(up.id IS NOT NULL) AS completed
               FROM courses c
               LEFT JOIN lessons l ON l.course_id = c.id
               LEFT JOIN user_progress up
                      ON up.course_id = c.id AND up.user_id = $1
                     AND up.lesson_id IS NULL AND up.completed = TRUE
               GROUP BY c.id
               ORDER BY c.id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    pub async fn course_detail(
        &self,
        course_id: i64,
        user_id: Option<i64>,
    ) -> Result<CourseDetail> {
        let course = sqlx::query_as::<_, Course>(
            r#"SELECT id, title, description, duration, level, created_at, updated_at
               FROM courses WHERE id = $1"#,
        )
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Course {} not found", course_id)))?;

        let lessons = sqlx::query_as::<_, Lesson>(
            r#"SELECT id, course_id, title, overview, content, order_index, created_at
               FROM lessons WHERE course_id = $1 ORDER BY order_index"#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        let user_progress = match user_id {
            Some(user_id) => Some(
                sqlx::query_as::<_, ProgressEntry>(
                    r#"SELECT lesson_id, completed, completed_at
                       FROM user_progress
                       WHERE user_id = $1 AND course_id = $2"#,
                )
                .bind(user_id)
                .bind(course_id)
                .fetch_all(&self.pool)
                .await?,
            ),
            None => None,
        };

        let questions = self.quiz_store.fetch_quiz_questions(course_id).await?;

        Ok(CourseDetail {
            course,
            lessons,
            user_progress,
            quiz: QuizMeta {
                question_count: questions.len() as i64,
            },
        })
    }

    pub async fn lesson(&self, course_id: i64, lesson_id: i64) -> Result<Lesson> {
        sqlx::query_as::<_, Lesson>(
            r#"SELECT id, course_id, title, overview, content, order_index, created_at
               FROM lessons WHERE id = $1 AND course_id = $2"#,
        )
        .bind(lesson_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Lesson not found".to_string()))
    }

    /// Questions for the course page preview, stripped of the answer key.
    pub async fn quiz_questions(&self, course_id: i64) -> Result<Vec<PublicQuizQuestion>> {
        let questions = self.quiz_store.fetch_quiz_questions(course_id).await?;
        Ok(questions.iter().map(PublicQuizQuestion::from).collect())
    }
}
