use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::quiz_store::QuizStore;
use crate::dto::quiz_dto::{CompletionView, QuizResultView, ReviewStepView, SessionView};
use crate::error::{Error, Result};
use crate::models::quiz_session::{QuizSession, SessionState};
use crate::models::survey::SurveyFeedback;
use crate::services::completion_service::CompletionService;
use crate::services::scoring_service::ScoringService;

/// Coordinates live quiz sessions: one per user, kept in memory, driven
/// through explicit state transitions. The registry lock is never held
/// across a store call; submissions are scored under the lock, persisted
/// after it is released, and confirmed under a fresh lock.
#[derive(Clone)]
pub struct SessionService {
    quiz_store: Arc<dyn QuizStore>,
    completion: CompletionService,
    sessions: Arc<Mutex<HashMap<i64, QuizSession>>>,
}

impl SessionService {
    pub fn new(quiz_store: Arc<dyn QuizStore>, completion: CompletionService) -> Self {
        Self {
            quiz_store,
            completion,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Opens a session over a fresh question snapshot. If the user already
    /// has one, it is replaced; the old run was never submitted, so nothing
    /// durable is lost.
    pub async fn start(&self, user_id: i64, course_id: i64) -> Result<SessionView> {
        let questions = self.quiz_store.fetch_quiz_questions(course_id).await?;
        let session = QuizSession::start(user_id, course_id, questions)?;

        let mut sessions = self.sessions.lock().await;
        if let Some(previous) = sessions.insert(user_id, session) {
            info!(
                "User {} restarted the quiz for course {} (previous session on course {} dropped)",
                user_id, course_id, previous.course_id
            );
        }
        Ok(SessionView::from(&sessions[&user_id]))
    }

    /// Current state of the user's session, or the NotStarted view.
    pub async fn current_view(&self, user_id: i64) -> SessionView {
        let sessions = self.sessions.lock().await;
        sessions
            .get(&user_id)
            .map(SessionView::from)
            .unwrap_or_else(SessionView::not_started)
    }

    pub async fn select_answer(&self, user_id: i64, option_index: i32) -> Result<SessionView> {
        let mut sessions = self.sessions.lock().await;
        let session = Self::active(&mut sessions, user_id)?;
        session.select_answer(option_index)?;
        Ok(SessionView::from(&*session))
    }

    pub async fn navigate(&self, user_id: i64, direction: i32) -> Result<SessionView> {
        let mut sessions = self.sessions.lock().await;
        let session = Self::active(&mut sessions, user_id)?;
        session.navigate(direction)?;
        Ok(SessionView::from(&*session))
    }

    /// Scores and persists the submission. If the attempt row (or the
    /// progress upsert behind it) fails to land, the outcome stays on the
    /// session and a repeat submit retries persistence only; the quiz is
    /// never re-scored.
    pub async fn submit(&self, user_id: i64, force: bool) -> Result<QuizResultView> {
        let (attempt_id, course_id, outcome, answers) = {
            let mut sessions = self.sessions.lock().await;
            let session = Self::active(&mut sessions, user_id)?;
            session.check_submittable(force)?;

            if session.state == SessionState::InProgress {
                let outcome = ScoringService::score(&session.questions, &session.answers);
                info!(
                    "User {} submitted the quiz for course {}: {}% ({} of {})",
                    user_id,
                    session.course_id,
                    outcome.percentage,
                    outcome.correct_count,
                    outcome.total_questions
                );
                session.record_outcome(outcome, Uuid::new_v4());
            } else {
                warn!(
                    "Retrying attempt persistence for user {} on course {}",
                    user_id, session.course_id
                );
            }

            let outcome = session
                .outcome
                .clone()
                .ok_or_else(|| Error::Internal("Submitted session has no outcome".to_string()))?;
            let attempt_id = session
                .attempt_id
                .ok_or_else(|| Error::Internal("Submitted session has no attempt id".to_string()))?;
            (attempt_id, session.course_id, outcome, session.answers.clone())
        };

        self.completion
            .record_attempt(attempt_id, user_id, course_id, &outcome, &answers)
            .await?;

        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&user_id) {
            // Guard against a session replaced while the store call ran.
            if session.attempt_id == Some(attempt_id) {
                session.mark_persisted();
            }
        }

        Ok(QuizResultView::from_outcome(attempt_id, &outcome))
    }

    pub async fn review_step(&self, user_id: i64, index: usize) -> Result<ReviewStepView> {
        let mut sessions = self.sessions.lock().await;
        let session = Self::active(&mut sessions, user_id)?;
        let (question, chosen) = session.review_step(index)?;
        Ok(ReviewStepView::new(index, &question, chosen))
    }

    /// Swaps a failed session for a fresh one over re-fetched questions.
    pub async fn retry(&self, user_id: i64) -> Result<SessionView> {
        let course_id = {
            let sessions = self.sessions.lock().await;
            let session = sessions
                .get(&user_id)
                .ok_or_else(Self::no_session)?;
            session.ensure_retryable()?;
            session.course_id
        };

        let questions = self.quiz_store.fetch_quiz_questions(course_id).await?;
        let session = QuizSession::start(user_id, course_id, questions)?;

        let mut sessions = self.sessions.lock().await;
        sessions.insert(user_id, session);
        info!("User {} is retrying the quiz for course {}", user_id, course_id);
        Ok(SessionView::from(&sessions[&user_id]))
    }

    /// Drops the in-memory session. Submitted attempts stay in the log.
    pub async fn abandon(&self, user_id: i64) -> Result<()> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .remove(&user_id)
            .map(|_| ())
            .ok_or_else(Self::no_session)
    }

    /// Survey step of a passed session: persist the response, confirm the
    /// course completion, then retire the session.
    pub async fn submit_survey(
        &self,
        user_id: i64,
        course_id: i64,
        feedback: SurveyFeedback,
    ) -> Result<CompletionView> {
        self.ensure_survey_stage(user_id, course_id).await?;
        self.completion
            .submit_survey(user_id, course_id, &feedback)
            .await?;
        self.retire(user_id, completable_for(course_id)).await;
        Ok(CompletionView {
            course_id,
            completed: true,
            survey_recorded: true,
            message: "Survey submitted successfully".to_string(),
        })
    }

    /// Skip still finalizes the completion; only the survey row is omitted.
    pub async fn skip_survey(&self, user_id: i64, course_id: i64) -> Result<CompletionView> {
        self.ensure_survey_stage(user_id, course_id).await?;
        self.completion.skip_survey(user_id, course_id).await?;
        self.retire(user_id, completable_for(course_id)).await;
        Ok(CompletionView {
            course_id,
            completed: true,
            survey_recorded: false,
            message: "Course completed".to_string(),
        })
    }

    async fn ensure_survey_stage(&self, user_id: i64, course_id: i64) -> Result<()> {
        let sessions = self.sessions.lock().await;
        let session = sessions.get(&user_id).ok_or_else(Self::no_session)?;
        if session.course_id != course_id {
            return Err(Error::InvalidStateTransition(
                "The active quiz session belongs to a different course".to_string(),
            ));
        }
        session.ensure_completable()
    }

    /// Moves the session through its final transition and drops it from the
    /// registry, unless the user already replaced it while the finalizing
    /// store calls were in flight.
    async fn retire<F>(&self, user_id: i64, still_current: F)
    where
        F: Fn(&QuizSession) -> bool,
    {
        let mut sessions = self.sessions.lock().await;
        let matches = sessions
            .get(&user_id)
            .map(|session| still_current(session))
            .unwrap_or(false);
        if matches {
            if let Some(mut session) = sessions.remove(&user_id) {
                if session.complete().is_ok() {
                    info!(
                        "User {} completed course {}",
                        user_id, session.course_id
                    );
                }
            }
        } else {
            warn!(
                "Session for user {} changed during completion; leaving it in place",
                user_id
            );
        }
    }

    fn active<'a>(
        sessions: &'a mut HashMap<i64, QuizSession>,
        user_id: i64,
    ) -> Result<&'a mut QuizSession> {
        sessions.get_mut(&user_id).ok_or_else(Self::no_session)
    }

    fn no_session() -> Error {
        Error::NotFound("No active quiz session".to_string())
    }
}

fn completable_for(course_id: i64) -> impl Fn(&QuizSession) -> bool {
    move |session: &QuizSession| {
        session.course_id == course_id && session.ensure_completable().is_ok()
    }
}
