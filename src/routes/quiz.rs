use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::quiz_dto::{
        AnswerPayload, NavigatePayload, QuizQuestionsResponse, SubmitPayload,
    },
    error::Result,
    middleware::auth::Claims,
    AppState,
};

#[axum::debug_handler]
pub async fn get_quiz_questions(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let questions = state.course_service.quiz_questions(course_id).await?;
    Ok(Json(QuizQuestionsResponse {
        course_id,
        questions,
    }))
}

#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/quiz/start",
    params(
        ("course_id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 201, description = "Quiz session opened on the first question"),
        (status = 404, description = "No quiz available for this course")
    )
)]
#[axum::debug_handler]
pub async fn start_quiz(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let view = state
        .session_service
        .start(claims.user_id()?, course_id)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let view = state.session_service.current_view(claims.user_id()?).await;
    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn select_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AnswerPayload>,
) -> Result<impl IntoResponse> {
    let view = state
        .session_service
        .select_answer(claims.user_id()?, payload.option_index)
        .await?;
    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn navigate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NavigatePayload>,
) -> Result<impl IntoResponse> {
    let view = state
        .session_service
        .navigate(claims.user_id()?, payload.direction)
        .await?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/api/quiz/session/submit",
    request_body = SubmitPayload,
    responses(
        (status = 200, description = "Attempt scored and persisted"),
        (status = 409, description = "Unanswered questions remain and force was not set")
    )
)]
#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Option<Json<SubmitPayload>>,
) -> Result<impl IntoResponse> {
    let force = payload.map(|Json(p)| p.force).unwrap_or_default();
    let result = state
        .session_service
        .submit(claims.user_id()?, force)
        .await?;
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn review_step(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let step = state
        .session_service
        .review_step(claims.user_id()?, index)
        .await?;
    Ok(Json(step))
}

#[axum::debug_handler]
pub async fn retry_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let view = state.session_service.retry(claims.user_id()?).await?;
    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn abandon_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    state.session_service.abandon(claims.user_id()?).await?;
    Ok(StatusCode::NO_CONTENT)
}
