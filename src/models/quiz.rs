use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Every question offers exactly four options, indexed 0 through 3.
pub const OPTION_COUNT: i32 = 4;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizQuestion {
    pub id: i64,
    pub course_id: i64,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: i32,
    pub explanation: Option<String>,
    pub order_index: i32,
}

impl QuizQuestion {
    pub fn options(&self) -> [&str; OPTION_COUNT as usize] {
        [
            &self.option_a,
            &self.option_b,
            &self.option_c,
            &self.option_d,
        ]
    }

    pub fn option_text(&self, index: i32) -> Option<&str> {
        match index {
            0 => Some(&self.option_a),
            1 => Some(&self.option_b),
            2 => Some(&self.option_c),
            3 => Some(&self.option_d),
            _ => None,
        }
    }
}

/// Per-question scoring verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: i64,
    pub chosen_option: Option<i32>,
    pub correct_option: i32,
    pub is_correct: bool,
}

/// Full scoring verdict for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizScore {
    pub correct_count: i32,
    pub total_questions: i32,
    pub percentage: i32,
    pub passed: bool,
    pub detail: Vec<QuestionOutcome>,
}
