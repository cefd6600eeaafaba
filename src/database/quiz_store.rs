use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::quiz::QuizQuestion;

/// Question source for quiz sessions. Both the live session flow and the
/// read-only questions endpoint fetch through this boundary, so a session
/// never cares where its snapshot came from.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Returns the course's questions in presentation order. An unknown
    /// course id is an error; a known course with no questions returns an
    /// empty vec and the caller decides whether that means "no quiz".
    async fn fetch_quiz_questions(&self, course_id: i64) -> Result<Vec<QuizQuestion>>;
}

#[derive(Clone)]
pub struct PgQuizStore {
    pool: PgPool,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn fetch_quiz_questions(&self, course_id: i64) -> Result<Vec<QuizQuestion>> {
        let course = sqlx::query_scalar::<_, i64>("SELECT id FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;
        if course.is_none() {
            return Err(Error::NotFound(format!("Course {} not found", course_id)));
        }

        let questions = sqlx::query_as::<_, QuizQuestion>(
            r#"SELECT id, course_id, question, option_a, option_b, option_c, option_d,
                      correct_answer, explanation, order_index
               FROM quiz_questions
               WHERE course_id = $1
               ORDER BY order_index"#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }
}
