use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::quiz_dto::SurveyPayload,
    error::Result,
    middleware::auth::Claims,
    models::survey::SurveyFeedback,
    AppState,
};

#[axum::debug_handler]
pub async fn submit_survey(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SurveyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let feedback = SurveyFeedback {
        rating: payload.rating,
        liked: payload.liked.unwrap_or_default(),
        improvement: payload.improvement.unwrap_or_default(),
        recommend: payload.recommend.unwrap_or_default(),
    };
    let view = state
        .session_service
        .submit_survey(claims.user_id()?, course_id, feedback)
        .await?;
    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn skip_survey(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let view = state
        .session_service
        .skip_survey(claims.user_id()?, course_id)
        .await?;
    Ok(Json(view))
}
