use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::database::progress_store::ProgressStore;
use crate::error::Result;
use crate::models::quiz::QuizScore;
use crate::models::quiz_attempt::NewQuizAttempt;
use crate::models::survey::SurveyFeedback;

/// Drives what happens after a quiz is scored: log the attempt, update
/// course progress on a pass, and finalize through the survey step. Holds no
/// state of its own; everything durable goes through the progress store.
#[derive(Clone)]
pub struct CompletionService {
    store: Arc<dyn ProgressStore>,
}

impl CompletionService {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    /// Persists a scored submission. The attempt row is written first,
    /// unconditionally; the course-level completion upsert follows only for
    /// a pass. A failed attempt changes no progress.
    pub async fn record_attempt(
        &self,
        attempt_id: Uuid,
        user_id: i64,
        course_id: i64,
        outcome: &QuizScore,
        answers: &[Option<i32>],
    ) -> Result<()> {
        let attempt = NewQuizAttempt {
            id: attempt_id,
            user_id,
            course_id,
            score: outcome.percentage,
            correct_count: outcome.correct_count,
            total_questions: outcome.total_questions,
            answers: answers.to_vec(),
            passed: outcome.passed,
            attempted_at: Utc::now(),
        };
        self.store.persist_quiz_result(&attempt).await?;

        if outcome.passed {
            self.store
                .upsert_progress(user_id, course_id, None, true, Some(Utc::now()))
                .await?;
            info!(
                "User {} passed the quiz for course {} with {}%",
                user_id, course_id, outcome.percentage
            );
        }
        Ok(())
    }

    /// Stores the survey response, then makes sure the completion row
    /// exists. The quiz pass normally wrote it already; this is the
    /// idempotent backstop.
    pub async fn submit_survey(
        &self,
        user_id: i64,
        course_id: i64,
        feedback: &SurveyFeedback,
    ) -> Result<()> {
        self.store
            .persist_survey(user_id, course_id, feedback)
            .await?;
        self.ensure_completed(user_id, course_id).await
    }

    /// Skipping the survey omits only the survey row. Completion is still
    /// recorded.
    pub async fn skip_survey(&self, user_id: i64, course_id: i64) -> Result<()> {
        self.ensure_completed(user_id, course_id).await
    }

    /// Read-then-upsert keeps the original completion timestamp when the
    /// row is already there.
    async fn ensure_completed(&self, user_id: i64, course_id: i64) -> Result<()> {
        let existing = self.store.read_progress(user_id, course_id, None).await?;
        if existing.map(|p| p.completed).unwrap_or(false) {
            return Ok(());
        }
        self.store
            .upsert_progress(user_id, course_id, None, true, Some(Utc::now()))
            .await?;
        Ok(())
    }
}
