use crate::models::quiz::{QuestionOutcome, QuizQuestion, QuizScore};

/// Minimum percentage for a passing quiz.
pub const PASSING_PERCENTAGE: i32 = 60;

/// Pure scoring engine. No clock, no I/O; the same submission always scores
/// the same way.
pub struct ScoringService;

impl ScoringService {
    /// Scores `answers` against the question snapshot, position by position.
    /// An unanswered question (`None`) matches nothing, including option 0.
    /// The percentage is rounded half-up to the nearest integer.
    pub fn score(questions: &[QuizQuestion], answers: &[Option<i32>]) -> QuizScore {
        let total_questions = questions.len() as i32;
        let mut detail = Vec::with_capacity(questions.len());
        let mut correct_count = 0;

        for (idx, question) in questions.iter().enumerate() {
            let chosen = answers.get(idx).copied().flatten();
            let is_correct = chosen == Some(question.correct_answer);
            if is_correct {
                correct_count += 1;
            }
            detail.push(QuestionOutcome {
                question_id: question.id,
                chosen_option: chosen,
                correct_option: question.correct_answer,
                is_correct,
            });
        }

        let percentage = if total_questions == 0 {
            0
        } else {
            (correct_count as f64 / total_questions as f64 * 100.0).round() as i32
        };

        QuizScore {
            correct_count,
            total_questions,
            percentage,
            passed: percentage >= PASSING_PERCENTAGE,
            detail,
        }
    }
}
