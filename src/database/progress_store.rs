use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::progress::ProgressRecord;
use crate::models::quiz_attempt::NewQuizAttempt;
use crate::models::survey::SurveyFeedback;

/// Write side of the completion flow: the attempt log, progress rows and
/// survey responses. The completion orchestrator only talks to this trait.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Appends one attempt row. The id comes from the caller, so a retried
    /// insert after an ambiguous failure cannot double-log the attempt.
    async fn persist_quiz_result(&self, attempt: &NewQuizAttempt) -> Result<()>;

    async fn read_progress(
        &self,
        user_id: i64,
        course_id: i64,
        lesson_id: Option<i64>,
    ) -> Result<Option<ProgressRecord>>;

    /// Upsert keyed on (user, course) for course-level rows and
    /// (user, lesson) for lesson-level rows.
    async fn upsert_progress(
        &self,
        user_id: i64,
        course_id: i64,
        lesson_id: Option<i64>,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<ProgressRecord>;

    async fn persist_survey(
        &self,
        user_id: i64,
        course_id: i64,
        feedback: &SurveyFeedback,
    ) -> Result<()>;
}

#[derive(Clone)]
pub struct PgProgressStore {
    pool: PgPool,
}

impl PgProgressStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn persist_quiz_result(&self, attempt: &NewQuizAttempt) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO quiz_attempts
                   (id, user_id, course_id, score, correct_count, total_questions,
                    answers, passed, attempted_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               ON CONFLICT (id) DO NOTHING"#,
        )
        .bind(attempt.id)
        .bind(attempt.user_id)
        .bind(attempt.course_id)
        .bind(attempt.score)
        .bind(attempt.correct_count)
        .bind(attempt.total_questions)
        .bind(serde_json::to_value(&attempt.answers)?)
        .bind(attempt.passed)
        .bind(attempt.attempted_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn read_progress(
        &self,
        user_id: i64,
        course_id: i64,
        lesson_id: Option<i64>,
    ) -> Result<Option<ProgressRecord>> {
        let record = match lesson_id {
            Some(lesson_id) => {
                sqlx::query_as::<_, ProgressRecord>(
                    r#"SELECT id, user_id, course_id, lesson_id, completed, completed_at,
                              created_at, updated_at
                       FROM user_progress
                       WHERE user_id = $1 AND course_id = $2 AND lesson_id = $3"#,
                )
                .bind(user_id)
                .bind(course_id)
                .bind(lesson_id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProgressRecord>(
                    r#"SELECT id, user_id, course_id, lesson_id, completed, completed_at,
                              created_at, updated_at
                       FROM user_progress
                       WHERE user_id = $1 AND course_id = $2 AND lesson_id IS NULL"#,
                )
                .bind(user_id)
                .bind(course_id)
                .fetch_optional(&self.pool)
                .await?
            }
        };
        Ok(record)
    }

    async fn upsert_progress(
        &self,
        user_id: i64,
        course_id: i64,
        lesson_id: Option<i64>,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<ProgressRecord> {
        let record = match lesson_id {
            Some(lesson_id) => {
                sqlx::query_as::<_, ProgressRecord>(
                    r#"INSERT INTO user_progress
                           (user_id, course_id, lesson_id, completed, completed_at)
                       VALUES ($1, $2, $3, $4, $5)
                       ON CONFLICT (user_id, lesson_id) WHERE lesson_id IS NOT NULL
                       DO UPDATE SET completed = EXCLUDED.completed,
                                     completed_at = EXCLUDED.completed_at,
                                     updated_at = NOW()
                       RETURNING id, user_id, course_id, lesson_id, completed, completed_at,
                                 created_at, updated_at"#,
                )
                .bind(user_id)
                .bind(course_id)
                .bind(lesson_id)
                .bind(completed)
                .bind(completed_at)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ProgressRecord>(
                    r#"INSERT INTO user_progress
                           (user_id, course_id, lesson_id, completed, completed_at)
                       VALUES ($1, $2, NULL, $3, $4)
                       ON CONFLICT (user_id, course_id) WHERE lesson_id IS NULL
                       DO UPDATE SET completed = EXCLUDED.completed,
                                     completed_at = EXCLUDED.completed_at,
                                     updated_at = NOW()
                       RETURNING id, user_id, course_id, lesson_id, completed, completed_at,
                                 created_at, updated_at"#,
                )
                .bind(user_id)
                .bind(course_id)
                .bind(completed)
                .bind(completed_at)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(record)
    }

    async fn persist_survey(
        &self,
        user_id: i64,
        course_id: i64,
        feedback: &SurveyFeedback,
    ) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO survey_responses
                   (user_id, course_id, rating, liked, improvement, recommend)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(user_id)
        .bind(course_id)
        .bind(feedback.rating)
        .bind(&feedback.liked)
        .bind(&feedback.improvement)
        .bind(feedback.recommend)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
