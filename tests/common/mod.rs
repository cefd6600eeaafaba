use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use easylearn_backend::database::progress_store::ProgressStore;
use easylearn_backend::database::quiz_store::QuizStore;
use easylearn_backend::error::{Error, Result};
use easylearn_backend::models::progress::ProgressRecord;
use easylearn_backend::models::quiz::QuizQuestion;
use easylearn_backend::models::quiz_attempt::NewQuizAttempt;
use easylearn_backend::models::survey::SurveyFeedback;

pub fn question(id: i64, course_id: i64, correct_answer: i32) -> QuizQuestion {
    QuizQuestion {
        id,
        course_id,
        question: format!("Question {}?", id),
        option_a: "Option A".to_string(),
        option_b: "Option B".to_string(),
        option_c: "Option C".to_string(),
        option_d: "Option D".to_string(),
        correct_answer,
        explanation: Some(format!("Option {} is the right one", correct_answer)),
        order_index: id as i32,
    }
}

/// Fixed question catalog keyed by course id. A course registered with an
/// empty question list behaves like a course that simply has no quiz.
#[derive(Default)]
pub struct FakeQuizStore {
    courses: HashMap<i64, Vec<QuizQuestion>>,
}

impl FakeQuizStore {
    pub fn with_course(mut self, course_id: i64, questions: Vec<QuizQuestion>) -> Self {
        self.courses.insert(course_id, questions);
        self
    }
}

#[async_trait]
impl QuizStore for FakeQuizStore {
    async fn fetch_quiz_questions(&self, course_id: i64) -> Result<Vec<QuizQuestion>> {
        self.courses
            .get(&course_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Course {} not found", course_id)))
    }
}

/// In-memory progress store that records every write so tests can assert on
/// what actually landed. `fail_attempt_writes` makes attempt inserts fail,
/// which is how the persistence-retry path gets exercised.
#[derive(Default)]
pub struct FakeProgressStore {
    attempts: Mutex<Vec<NewQuizAttempt>>,
    progress: Mutex<Vec<ProgressRecord>>,
    surveys: Mutex<Vec<(i64, i64, SurveyFeedback)>>,
    fail_attempt_writes: AtomicBool,
}

impl FakeProgressStore {
    pub fn set_attempt_writes_failing(&self, failing: bool) {
        self.fail_attempt_writes.store(failing, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> Vec<NewQuizAttempt> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    pub fn progress_row_count(&self) -> usize {
        self.progress.lock().unwrap().len()
    }

    pub fn course_progress(&self, user_id: i64, course_id: i64) -> Option<ProgressRecord> {
        self.progress
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id && p.course_id == course_id && p.lesson_id.is_none())
            .cloned()
    }

    pub fn survey_count(&self) -> usize {
        self.surveys.lock().unwrap().len()
    }
}

#[async_trait]
impl ProgressStore for FakeProgressStore {
    async fn persist_quiz_result(&self, attempt: &NewQuizAttempt) -> Result<()> {
        if self.fail_attempt_writes.load(Ordering::SeqCst) {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }
        let mut attempts = self.attempts.lock().unwrap();
        // Same conflict rule as the real table: a repeated id is a no-op.
        if attempts.iter().any(|a| a.id == attempt.id) {
            return Ok(());
        }
        attempts.push(attempt.clone());
        Ok(())
    }

    async fn read_progress(
        &self,
        user_id: i64,
        course_id: i64,
        lesson_id: Option<i64>,
    ) -> Result<Option<ProgressRecord>> {
        Ok(self
            .progress
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id && p.course_id == course_id && p.lesson_id == lesson_id)
            .cloned())
    }

    async fn upsert_progress(
        &self,
        user_id: i64,
        course_id: i64,
        lesson_id: Option<i64>,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<ProgressRecord> {
        let mut progress = self.progress.lock().unwrap();
        // Mirrors the real conflict targets: (user, lesson) for lesson rows,
        // (user, course) for course-level rows.
        let existing = progress.iter_mut().find(|p| match lesson_id {
            Some(lesson) => p.user_id == user_id && p.lesson_id == Some(lesson),
            None => p.user_id == user_id && p.course_id == course_id && p.lesson_id.is_none(),
        });
        if let Some(row) = existing {
            row.completed = completed;
            row.completed_at = completed_at;
            row.updated_at = Utc::now();
            return Ok(row.clone());
        }

        let now = Utc::now();
        let record = ProgressRecord {
            id: progress.len() as i64 + 1,
            user_id,
            course_id,
            lesson_id,
            completed,
            completed_at,
            created_at: now,
            updated_at: now,
        };
        progress.push(record.clone());
        Ok(record)
    }

    async fn persist_survey(
        &self,
        user_id: i64,
        course_id: i64,
        feedback: &SurveyFeedback,
    ) -> Result<()> {
        self.surveys
            .lock()
            .unwrap()
            .push((user_id, course_id, feedback.clone()));
        Ok(())
    }
}
