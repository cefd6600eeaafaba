use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::quiz::{QuizQuestion, QuizScore};
use crate::models::quiz_session::{QuizSession, SessionState};

/// A question as shown to the quiz taker. Carries no answer key and no
/// explanation; those surface only through review steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuizQuestion {
    pub id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub order_index: i32,
}

impl From<&QuizQuestion> for PublicQuizQuestion {
    fn from(q: &QuizQuestion) -> Self {
        Self {
            id: q.id,
            question: q.question.clone(),
            options: q.options().iter().map(|o| o.to_string()).collect(),
            order_index: q.order_index,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestionsResponse {
    pub course_id: i64,
    pub questions: Vec<PublicQuizQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub option_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigatePayload {
    pub direction: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitPayload {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SurveyPayload {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    pub liked: Option<String>,
    pub improvement: Option<String>,
    pub recommend: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResultView {
    pub attempt_id: Uuid,
    pub score: i32,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub passed: bool,
    pub message: String,
}

impl QuizResultView {
    pub fn from_outcome(attempt_id: Uuid, outcome: &QuizScore) -> Self {
        let message = if outcome.passed {
            "Quiz passed! Course completed.".to_string()
        } else {
            "Quiz failed. Please try again.".to_string()
        };
        Self {
            attempt_id,
            score: outcome.percentage,
            correct_answers: outcome.correct_count,
            total_questions: outcome.total_questions,
            passed: outcome.passed,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub state: SessionState,
    pub course_id: Option<i64>,
    pub current_index: usize,
    pub question_count: usize,
    pub answered_count: usize,
    pub current_answer: Option<i32>,
    pub question: Option<PublicQuizQuestion>,
    pub result: Option<QuizResultView>,
}

impl SessionView {
    /// The view handed out when the registry holds nothing for the user.
    pub fn not_started() -> Self {
        Self {
            state: SessionState::NotStarted,
            course_id: None,
            current_index: 0,
            question_count: 0,
            answered_count: 0,
            current_answer: None,
            question: None,
            result: None,
        }
    }
}

impl From<&QuizSession> for SessionView {
    fn from(session: &QuizSession) -> Self {
        let question = match session.state {
            SessionState::InProgress => Some(PublicQuizQuestion::from(session.current_question())),
            _ => None,
        };
        let result = match (&session.outcome, session.attempt_id) {
            (Some(outcome), Some(attempt_id)) => {
                Some(QuizResultView::from_outcome(attempt_id, outcome))
            }
            _ => None,
        };
        Self {
            state: session.state,
            course_id: Some(session.course_id),
            current_index: session.current_index,
            question_count: session.question_count(),
            answered_count: session.answered_count(),
            current_answer: session.answers[session.current_index],
            question,
            result,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewStepView {
    pub index: usize,
    pub question: String,
    pub options: Vec<String>,
    pub chosen_option: Option<i32>,
    pub correct_option: i32,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

impl ReviewStepView {
    pub fn new(index: usize, question: &QuizQuestion, chosen_option: Option<i32>) -> Self {
        Self {
            index,
            question: question.question.clone(),
            options: question.options().iter().map(|o| o.to_string()).collect(),
            chosen_option,
            correct_option: question.correct_answer,
            is_correct: chosen_option == Some(question.correct_answer),
            explanation: question.explanation.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionView {
    pub course_id: i64,
    pub completed: bool,
    pub survey_recorded: bool,
    pub message: String,
}
