use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::auth_dto::{
        AuthResponse, LoginRequest, ProfileInfo, ProfileResponse, RegisterRequest, UserInfo,
    },
    error::Result,
    middleware::auth::Claims,
    AppState,
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (user, token) = state
        .user_service
        .register(&payload.name, &payload.email, &payload.password)
        .await?;
    let body = AuthResponse {
        message: "User registered successfully".to_string(),
        token,
        user: UserInfo::from(&user),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (user, token) = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;
    let body = AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: UserInfo::from(&user),
    };
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.profile(claims.user_id()?).await?;
    Ok(Json(ProfileResponse {
        user: ProfileInfo::from(&user),
    }))
}
