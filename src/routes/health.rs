use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };
    let body = json!({
        "status": "ok",
        "database": database,
        "timestamp": chrono::Utc::now(),
    });
    (StatusCode::OK, Json(body))
}
