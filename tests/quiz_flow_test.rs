mod common;

use std::sync::Arc;

use easylearn_backend::error::Error;
use easylearn_backend::models::quiz_session::SessionState;
use easylearn_backend::models::survey::SurveyFeedback;
use easylearn_backend::services::completion_service::CompletionService;
use easylearn_backend::services::session_service::SessionService;

use common::{question, FakeProgressStore, FakeQuizStore};

const USER: i64 = 7;
const COURSE: i64 = 42;
const OTHER_COURSE: i64 = 43;

/// Three questions whose correct answers are options 0, 1 and 2.
fn service_with_quiz() -> (SessionService, Arc<FakeProgressStore>) {
    let quiz_store = Arc::new(FakeQuizStore::default().with_course(
        COURSE,
        vec![
            question(1, COURSE, 0),
            question(2, COURSE, 1),
            question(3, COURSE, 2),
        ],
    ));
    let progress_store = Arc::new(FakeProgressStore::default());
    let completion = CompletionService::new(progress_store.clone());
    (SessionService::new(quiz_store, completion), progress_store)
}

fn feedback() -> SurveyFeedback {
    SurveyFeedback {
        rating: 5,
        liked: "The pacing".to_string(),
        improvement: String::new(),
        recommend: true,
    }
}

/// Answers every question in order, navigating forward between them.
async fn answer_all(service: &SessionService, answers: &[i32]) {
    for (i, answer) in answers.iter().enumerate() {
        service.select_answer(USER, *answer).await.expect("answer");
        if i + 1 < answers.len() {
            service.navigate(USER, 1).await.expect("navigate");
        }
    }
}

#[tokio::test]
async fn passing_the_quiz_completes_the_course() {
    let (service, store) = service_with_quiz();

    let view = service.start(USER, COURSE).await.expect("start");
    assert_eq!(view.state, SessionState::InProgress);
    assert_eq!(view.question_count, 3);
    assert_eq!(view.current_index, 0);
    assert!(view.question.is_some());

    answer_all(&service, &[0, 1, 2]).await;

    let result = service.submit(USER, false).await.expect("submit");
    assert!(result.passed);
    assert_eq!(result.score, 100);
    assert_eq!(result.correct_answers, 3);
    assert_eq!(result.message, "Quiz passed! Course completed.");

    let attempts = store.attempts();
    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].passed);
    assert_eq!(attempts[0].score, 100);

    let progress = store.course_progress(USER, COURSE).expect("progress row");
    assert!(progress.completed);
    assert!(progress.completed_at.is_some());

    let completion = service
        .submit_survey(USER, COURSE, feedback())
        .await
        .expect("survey");
    assert!(completion.completed);
    assert!(completion.survey_recorded);
    assert_eq!(store.survey_count(), 1);

    // The session is retired; the user is back to a clean slate.
    let view = service.current_view(USER).await;
    assert_eq!(view.state, SessionState::NotStarted);
}

#[tokio::test]
async fn failed_attempt_is_logged_but_leaves_progress_untouched() {
    let (service, store) = service_with_quiz();

    service.start(USER, COURSE).await.expect("start");
    answer_all(&service, &[3, 3, 3]).await;

    let result = service.submit(USER, false).await.expect("submit");
    assert!(!result.passed);
    assert_eq!(result.score, 0);
    assert_eq!(result.message, "Quiz failed. Please try again.");

    assert_eq!(store.attempt_count(), 1);
    assert!(!store.attempts()[0].passed);
    assert!(store.course_progress(USER, COURSE).is_none());

    // Retry opens a fresh run over the same course.
    let view = service.retry(USER).await.expect("retry");
    assert_eq!(view.state, SessionState::InProgress);
    assert_eq!(view.answered_count, 0);
    assert_eq!(view.course_id, Some(COURSE));

    answer_all(&service, &[0, 1, 2]).await;
    let result = service.submit(USER, false).await.expect("second submit");
    assert!(result.passed);

    assert_eq!(store.attempt_count(), 2);
    let progress = store.course_progress(USER, COURSE).expect("progress row");
    assert!(progress.completed);
}

#[tokio::test]
async fn forward_navigation_requires_an_answer() {
    let (service, _store) = service_with_quiz();
    service.start(USER, COURSE).await.expect("start");

    let err = service.navigate(USER, 1).await.unwrap_err();
    assert!(matches!(err, Error::InvalidStateTransition(_)));

    // Stepping back past the first question is a silent no-op.
    let view = service.navigate(USER, -1).await.expect("navigate back");
    assert_eq!(view.current_index, 0);

    let err = service.navigate(USER, 2).await.unwrap_err();
    assert!(matches!(err, Error::BadRequest(_)));

    service.select_answer(USER, 0).await.expect("answer");
    let view = service.navigate(USER, 1).await.expect("navigate");
    assert_eq!(view.current_index, 1);

    // Going back and re-answering overwrites the earlier choice.
    let view = service.navigate(USER, -1).await.expect("navigate back");
    assert_eq!(view.current_answer, Some(0));
    let view = service.select_answer(USER, 2).await.expect("re-answer");
    assert_eq!(view.current_answer, Some(2));

    let err = service.select_answer(USER, 7).await.unwrap_err();
    assert!(matches!(err, Error::InvalidAnswerIndex(7)));
}

#[tokio::test]
async fn repeat_pass_reuses_the_progress_row() {
    let (service, store) = service_with_quiz();

    for _ in 0..2 {
        service.start(USER, COURSE).await.expect("start");
        answer_all(&service, &[0, 1, 2]).await;
        service.submit(USER, false).await.expect("submit");
        service.skip_survey(USER, COURSE).await.expect("skip survey");
    }

    assert_eq!(store.attempt_count(), 2);
    assert_eq!(store.progress_row_count(), 1);
    let progress = store.course_progress(USER, COURSE).expect("progress row");
    assert!(progress.completed);
}

#[tokio::test]
async fn partial_submission_needs_force() {
    let (service, store) = service_with_quiz();
    service.start(USER, COURSE).await.expect("start");
    service.select_answer(USER, 0).await.expect("answer");

    match service.submit(USER, false).await.unwrap_err() {
        Error::IncompleteAnswers { missing } => assert_eq!(missing, 2),
        other => panic!("unexpected error: {other}"),
    }

    // Force submits anyway; unanswered questions score as wrong.
    let result = service.submit(USER, true).await.expect("forced submit");
    assert_eq!(result.correct_answers, 1);
    assert_eq!(result.total_questions, 3);
    assert_eq!(result.score, 33);
    assert!(!result.passed);

    let attempts = store.attempts();
    assert_eq!(attempts[0].answers, vec![Some(0), None, None]);
}

#[tokio::test]
async fn failed_persistence_is_retried_without_rescoring() {
    let (service, store) = service_with_quiz();
    service.start(USER, COURSE).await.expect("start");
    answer_all(&service, &[0, 1, 2]).await;

    store.set_attempt_writes_failing(true);
    let err = service.submit(USER, false).await.unwrap_err();
    assert!(matches!(err, Error::Database(_)));
    assert_eq!(store.attempt_count(), 0);
    assert!(store.course_progress(USER, COURSE).is_none());

    // The scored outcome stays on the session while the write is down.
    let view = service.current_view(USER).await;
    assert_eq!(view.state, SessionState::Submitted);
    let stuck = view.result.expect("scored result");
    assert!(stuck.passed);

    store.set_attempt_writes_failing(false);
    let result = service.submit(USER, false).await.expect("retried submit");
    assert_eq!(result.attempt_id, stuck.attempt_id);
    assert_eq!(result.score, stuck.score);

    assert_eq!(store.attempt_count(), 1);
    assert_eq!(store.attempts()[0].id, stuck.attempt_id);
    let progress = store.course_progress(USER, COURSE).expect("progress row");
    assert!(progress.completed);

    // Once the attempt has landed, another submit is a repeat.
    let err = service.submit(USER, false).await.unwrap_err();
    assert!(matches!(err, Error::InvalidStateTransition(_)));
}

#[tokio::test]
async fn skipping_the_survey_still_completes_the_course() {
    let (service, store) = service_with_quiz();
    service.start(USER, COURSE).await.expect("start");
    answer_all(&service, &[0, 1, 2]).await;
    service.submit(USER, false).await.expect("submit");

    let completion = service.skip_survey(USER, COURSE).await.expect("skip");
    assert!(completion.completed);
    assert!(!completion.survey_recorded);
    assert_eq!(completion.message, "Course completed");

    assert_eq!(store.survey_count(), 0);
    let progress = store.course_progress(USER, COURSE).expect("progress row");
    assert!(progress.completed);
    let view = service.current_view(USER).await;
    assert_eq!(view.state, SessionState::NotStarted);
}

#[tokio::test]
async fn review_reveals_answers_only_after_submit() {
    let (service, _store) = service_with_quiz();
    service.start(USER, COURSE).await.expect("start");

    let err = service.review_step(USER, 0).await.unwrap_err();
    assert!(matches!(err, Error::InvalidStateTransition(_)));

    answer_all(&service, &[0, 1, 3]).await;
    service.submit(USER, false).await.expect("submit");

    let step = service.review_step(USER, 2).await.expect("review");
    assert_eq!(step.index, 2);
    assert_eq!(step.chosen_option, Some(3));
    assert_eq!(step.correct_option, 2);
    assert!(!step.is_correct);
    assert!(step.explanation.is_some());

    let err = service.review_step(USER, 9).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    // Reviewing does not forfeit the pass; the survey step still works.
    let completion = service.skip_survey(USER, COURSE).await.expect("skip");
    assert!(completion.completed);
}

#[tokio::test]
async fn failed_quiz_cannot_reach_the_survey() {
    let (service, store) = service_with_quiz();
    service.start(USER, COURSE).await.expect("start");
    answer_all(&service, &[3, 3, 3]).await;
    service.submit(USER, false).await.expect("submit");

    let err = service.skip_survey(USER, COURSE).await.unwrap_err();
    assert!(matches!(err, Error::InvalidStateTransition(_)));
    assert!(store.course_progress(USER, COURSE).is_none());

    // The failed session stays around for a retry.
    let view = service.current_view(USER).await;
    assert_eq!(view.state, SessionState::Submitted);
}

#[tokio::test]
async fn survey_requires_a_passed_session_on_the_same_course() {
    let (service, store) = service_with_quiz();

    let err = service
        .submit_survey(USER, COURSE, feedback())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    service.start(USER, COURSE).await.expect("start");
    let err = service
        .submit_survey(USER, COURSE, feedback())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidStateTransition(_)));

    answer_all(&service, &[0, 1, 2]).await;
    service.submit(USER, false).await.expect("submit");

    let err = service
        .submit_survey(USER, OTHER_COURSE, feedback())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidStateTransition(_)));
    assert_eq!(store.survey_count(), 0);

    service
        .submit_survey(USER, COURSE, feedback())
        .await
        .expect("survey");
    assert_eq!(store.survey_count(), 1);
}

#[tokio::test]
async fn abandoning_drops_the_session_without_logging_an_attempt() {
    let (service, store) = service_with_quiz();

    let err = service.abandon(USER).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    service.start(USER, COURSE).await.expect("start");
    service.select_answer(USER, 0).await.expect("answer");
    service.abandon(USER).await.expect("abandon");

    let view = service.current_view(USER).await;
    assert_eq!(view.state, SessionState::NotStarted);
    assert_eq!(store.attempt_count(), 0);
}

#[tokio::test]
async fn restart_replaces_the_active_session() {
    let (service, store) = service_with_quiz();
    service.start(USER, COURSE).await.expect("start");
    service.select_answer(USER, 0).await.expect("answer");

    let view = service.start(USER, COURSE).await.expect("restart");
    assert_eq!(view.answered_count, 0);
    assert_eq!(view.current_index, 0);
    assert_eq!(store.attempt_count(), 0);
}

#[tokio::test]
async fn start_rejects_unknown_and_quizless_courses() {
    let quiz_store = Arc::new(FakeQuizStore::default().with_course(COURSE, Vec::new()));
    let progress_store = Arc::new(FakeProgressStore::default());
    let service = SessionService::new(quiz_store, CompletionService::new(progress_store));

    let err = service.start(USER, 999).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = service.start(USER, COURSE).await.unwrap_err();
    assert!(matches!(err, Error::NoQuizAvailable(id) if id == COURSE));
}
