use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::quiz::{QuizQuestion, QuizScore, OPTION_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    InProgress,
    Reviewing,
    Submitted,
    Completed,
}

/// A live quiz run for one user. Sessions only exist in memory; the durable
/// record is the attempt row written on submit.
///
/// Invariants: `current_index < questions.len()`, `answers.len() ==
/// questions.len()`, and `outcome`/`attempt_id` are only populated once the
/// session reaches `Submitted`. `outcome_persisted` confirms the attempt row
/// actually landed; until then the submission may be retried without
/// re-scoring.
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub user_id: i64,
    pub course_id: i64,
    pub questions: Vec<QuizQuestion>,
    pub answers: Vec<Option<i32>>,
    pub current_index: usize,
    pub state: SessionState,
    pub outcome: Option<QuizScore>,
    pub attempt_id: Option<Uuid>,
    pub outcome_persisted: bool,
    pub started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Opens a session over a question snapshot. An empty snapshot is not a
    /// session at all, so it is rejected up front.
    pub fn start(user_id: i64, course_id: i64, questions: Vec<QuizQuestion>) -> Result<Self> {
        if questions.is_empty() {
            return Err(Error::NoQuizAvailable(course_id));
        }
        let answers = vec![None; questions.len()];
        Ok(Self {
            user_id,
            course_id,
            questions,
            answers,
            current_index: 0,
            state: SessionState::InProgress,
            outcome: None,
            attempt_id: None,
            outcome_persisted: false,
            started_at: Utc::now(),
        })
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn unanswered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_none()).count()
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current_index]
    }

    /// Records an answer for the current question. Re-answering overwrites.
    pub fn select_answer(&mut self, option_index: i32) -> Result<()> {
        if self.state != SessionState::InProgress {
            return Err(Error::InvalidStateTransition(
                "Answers can only be recorded while the quiz is in progress".to_string(),
            ));
        }
        if !(0..OPTION_COUNT).contains(&option_index) {
            return Err(Error::InvalidAnswerIndex(option_index));
        }
        self.answers[self.current_index] = Some(option_index);
        Ok(())
    }

    /// Moves the cursor one question forward or back. Targets outside the
    /// question range leave the cursor where it is; moving forward past an
    /// unanswered question is refused.
    pub fn navigate(&mut self, direction: i32) -> Result<()> {
        if self.state != SessionState::InProgress {
            return Err(Error::InvalidStateTransition(
                "Navigation is only available while the quiz is in progress".to_string(),
            ));
        }
        if !matches!(direction, 1 | -1) {
            return Err(Error::BadRequest(format!(
                "Navigation direction must be 1 or -1, got {}",
                direction
            )));
        }

        let target = self.current_index as i64 + direction as i64;
        if target < 0 || target >= self.questions.len() as i64 {
            return Ok(());
        }
        if direction == 1 && self.answers[self.current_index].is_none() {
            return Err(Error::InvalidStateTransition(
                "Answer the current question before moving forward".to_string(),
            ));
        }
        self.current_index = target as usize;
        Ok(())
    }

    /// Gate for submit. A `Submitted` session whose outcome never reached
    /// the store may go through again as a persistence retry; anything else
    /// outside `InProgress` is a repeat submission.
    pub fn check_submittable(&self, force: bool) -> Result<()> {
        match self.state {
            SessionState::InProgress => {
                let missing = self.unanswered_count();
                if missing > 0 && !force {
                    return Err(Error::IncompleteAnswers { missing });
                }
                Ok(())
            }
            SessionState::Submitted if !self.outcome_persisted => Ok(()),
            _ => Err(Error::InvalidStateTransition(
                "The quiz has already been submitted".to_string(),
            )),
        }
    }

    /// Freezes the score. The attempt id is minted here, before any store
    /// call, so a persistence retry reuses the same id instead of logging
    /// the attempt twice.
    pub fn record_outcome(&mut self, outcome: QuizScore, attempt_id: Uuid) {
        self.outcome = Some(outcome);
        self.attempt_id = Some(attempt_id);
        self.state = SessionState::Submitted;
    }

    pub fn mark_persisted(&mut self) {
        self.outcome_persisted = true;
    }

    pub fn passed(&self) -> bool {
        self.outcome.as_ref().map(|o| o.passed).unwrap_or(false)
    }

    /// Returns the question and the recorded answer at `index` for review,
    /// moving the session into `Reviewing`. Answers are read-only here.
    pub fn review_step(&mut self, index: usize) -> Result<(QuizQuestion, Option<i32>)> {
        if !matches!(
            self.state,
            SessionState::Submitted | SessionState::Reviewing
        ) {
            return Err(Error::InvalidStateTransition(
                "Review is only available after submitting".to_string(),
            ));
        }
        let question = self
            .questions
            .get(index)
            .ok_or_else(|| Error::NotFound(format!("Question {} is not part of this quiz", index)))?
            .clone();
        self.state = SessionState::Reviewing;
        Ok((question, self.answers[index]))
    }

    /// Completion gate: only a passed, submitted session may finalize.
    pub fn ensure_completable(&self) -> Result<()> {
        let submitted = matches!(
            self.state,
            SessionState::Submitted | SessionState::Reviewing
        );
        if !submitted || !self.passed() {
            return Err(Error::InvalidStateTransition(
                "Completion requires a passed, submitted quiz".to_string(),
            ));
        }
        Ok(())
    }

    /// Finalizes a passed session. Failing sessions never complete; they are
    /// retried or abandoned.
    pub fn complete(&mut self) -> Result<()> {
        self.ensure_completable()?;
        self.state = SessionState::Completed;
        Ok(())
    }

    pub fn ensure_retryable(&self) -> Result<()> {
        let submitted = matches!(
            self.state,
            SessionState::Submitted | SessionState::Reviewing
        );
        let failed = matches!(self.outcome.as_ref(), Some(o) if !o.passed);
        if submitted && failed {
            return Ok(());
        }
        Err(Error::InvalidStateTransition(
            "Retry is only available after a failed attempt".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, correct: i32) -> QuizQuestion {
        QuizQuestion {
            id,
            course_id: 1,
            question: format!("Question {}", id),
            option_a: "A".to_string(),
            option_b: "B".to_string(),
            option_c: "C".to_string(),
            option_d: "D".to_string(),
            correct_answer: correct,
            explanation: Some(format!("Because {}", id)),
            order_index: id as i32,
        }
    }

    fn session(n: usize) -> QuizSession {
        let questions = (0..n).map(|i| question(i as i64 + 1, 0)).collect();
        QuizSession::start(7, 1, questions).unwrap()
    }

    fn score(passed: bool) -> QuizScore {
        QuizScore {
            correct_count: if passed { 3 } else { 1 },
            total_questions: 3,
            percentage: if passed { 100 } else { 33 },
            passed,
            detail: vec![],
        }
    }

    #[test]
    fn start_rejects_empty_question_set() {
        let err = QuizSession::start(7, 42, vec![]).unwrap_err();
        assert!(matches!(err, Error::NoQuizAvailable(42)));
    }

    #[test]
    fn start_positions_cursor_at_first_unanswered_question() {
        let s = session(3);
        assert_eq!(s.state, SessionState::InProgress);
        assert_eq!(s.current_index, 0);
        assert_eq!(s.answers, vec![None, None, None]);
    }

    #[test]
    fn select_answer_overwrites_previous_choice() {
        let mut s = session(3);
        s.select_answer(1).unwrap();
        s.select_answer(3).unwrap();
        assert_eq!(s.answers[0], Some(3));
    }

    #[test]
    fn select_answer_rejects_out_of_range_option() {
        let mut s = session(3);
        assert!(matches!(
            s.select_answer(4).unwrap_err(),
            Error::InvalidAnswerIndex(4)
        ));
        assert!(matches!(
            s.select_answer(-1).unwrap_err(),
            Error::InvalidAnswerIndex(-1)
        ));
        assert_eq!(s.answers[0], None);
    }

    #[test]
    fn forward_navigation_requires_an_answer() {
        let mut s = session(3);
        let err = s.navigate(1).unwrap_err();
        assert!(matches!(err, Error::InvalidStateTransition(_)));
        assert_eq!(s.current_index, 0);

        s.select_answer(2).unwrap();
        s.navigate(1).unwrap();
        assert_eq!(s.current_index, 1);
    }

    #[test]
    fn navigation_outside_bounds_is_a_silent_no_op() {
        let mut s = session(2);
        s.navigate(-1).unwrap();
        assert_eq!(s.current_index, 0);

        s.select_answer(0).unwrap();
        s.navigate(1).unwrap();
        s.select_answer(0).unwrap();
        s.navigate(1).unwrap();
        assert_eq!(s.current_index, 1);
    }

    #[test]
    fn backward_navigation_is_always_allowed() {
        let mut s = session(3);
        s.select_answer(0).unwrap();
        s.navigate(1).unwrap();
        s.navigate(-1).unwrap();
        assert_eq!(s.current_index, 0);
    }

    #[test]
    fn submit_with_unanswered_questions_reports_the_missing_count() {
        let mut s = session(3);
        s.select_answer(0).unwrap();
        let err = s.check_submittable(false).unwrap_err();
        assert!(matches!(err, Error::IncompleteAnswers { missing: 2 }));
    }

    #[test]
    fn forced_submit_is_allowed_with_gaps() {
        let s = session(3);
        s.check_submittable(true).unwrap();
    }

    #[test]
    fn repeat_submit_after_persistence_is_rejected() {
        let mut s = session(1);
        s.select_answer(0).unwrap();
        s.check_submittable(false).unwrap();
        s.record_outcome(score(true), Uuid::new_v4());
        s.mark_persisted();
        assert!(matches!(
            s.check_submittable(false).unwrap_err(),
            Error::InvalidStateTransition(_)
        ));
    }

    #[test]
    fn unpersisted_submission_may_be_retried_with_the_same_attempt_id() {
        let mut s = session(1);
        s.select_answer(0).unwrap();
        let attempt_id = Uuid::new_v4();
        s.record_outcome(score(false), attempt_id);
        assert!(!s.outcome_persisted);
        s.check_submittable(false).unwrap();
        assert_eq!(s.attempt_id, Some(attempt_id));
    }

    #[test]
    fn answers_are_frozen_during_review() {
        let mut s = session(2);
        s.select_answer(0).unwrap();
        s.navigate(1).unwrap();
        s.select_answer(1).unwrap();
        s.record_outcome(score(true), Uuid::new_v4());

        let (question, chosen) = s.review_step(0).unwrap();
        assert_eq!(s.state, SessionState::Reviewing);
        assert_eq!(question.id, 1);
        assert_eq!(chosen, Some(0));

        let err = s.select_answer(2).unwrap_err();
        assert!(matches!(err, Error::InvalidStateTransition(_)));
        assert_eq!(s.answers, vec![Some(0), Some(1)]);
    }

    #[test]
    fn review_rejects_unknown_question_index() {
        let mut s = session(2);
        s.select_answer(0).unwrap();
        s.record_outcome(score(true), Uuid::new_v4());
        assert!(matches!(
            s.review_step(5).unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[test]
    fn review_before_submit_is_rejected() {
        let mut s = session(2);
        assert!(matches!(
            s.review_step(0).unwrap_err(),
            Error::InvalidStateTransition(_)
        ));
    }

    #[test]
    fn completion_requires_a_pass() {
        let mut s = session(1);
        s.select_answer(0).unwrap();
        s.record_outcome(score(false), Uuid::new_v4());
        assert!(s.complete().is_err());

        let mut s = session(1);
        s.select_answer(0).unwrap();
        s.record_outcome(score(true), Uuid::new_v4());
        s.complete().unwrap();
        assert_eq!(s.state, SessionState::Completed);
    }

    #[test]
    fn retry_only_after_a_failed_attempt() {
        let mut s = session(1);
        assert!(s.ensure_retryable().is_err());

        s.select_answer(0).unwrap();
        s.record_outcome(score(false), Uuid::new_v4());
        s.ensure_retryable().unwrap();

        let mut passed = session(1);
        passed.select_answer(0).unwrap();
        passed.record_outcome(score(true), Uuid::new_v4());
        assert!(passed.ensure_retryable().is_err());
    }
}
