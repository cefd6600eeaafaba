use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::progress_dto::{CourseProgressRequest, ProgressOverviewResponse, ProgressUpdateResponse},
    error::{Error, Result},
    middleware::auth::Claims,
    AppState,
};

#[axum::debug_handler]
pub async fn complete_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let progress = state
        .progress_service
        .complete_lesson(claims.user_id()?, lesson_id)
        .await?;
    Ok(Json(ProgressUpdateResponse {
        message: "Lesson marked as complete".to_string(),
        progress,
    }))
}

#[axum::debug_handler]
pub async fn save_course_progress(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CourseProgressRequest>,
) -> Result<impl IntoResponse> {
    let progress = state
        .progress_service
        .save_course_progress(claims.user_id()?, payload.course_id, payload.completed)
        .await?;
    let message = if payload.completed {
        "Course marked as complete"
    } else {
        "Course progress saved"
    };
    Ok(Json(ProgressUpdateResponse {
        message: message.to_string(),
        progress,
    }))
}

/// Progress is private to its owner; any other caller gets a 403.
#[axum::debug_handler]
pub async fn get_user_progress(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    if claims.user_id()? != user_id {
        return Err(Error::Forbidden("Access denied".to_string()));
    }
    let progress = state.progress_service.overview(user_id).await?;
    Ok(Json(ProgressOverviewResponse { progress }))
}
