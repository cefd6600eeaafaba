use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use easylearn_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware, routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/api/health", get(routes::health::health));

    let auth_api = Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.public_rps),
            middleware::rate_limit::rps_middleware,
        ));

    let catalog_api = Router::new()
        .route("/api/courses", get(routes::courses::list_courses))
        .route("/api/courses/:course_id", get(routes::courses::get_course))
        .layer(axum::middleware::from_fn(
            middleware::auth::optional_bearer_auth,
        ));

    let learner_api = Router::new()
        .route("/api/auth/profile", get(routes::auth::profile))
        .route(
            "/api/courses/:course_id/lessons/:lesson_id",
            get(routes::courses::get_lesson),
        )
        .route(
            "/api/progress/lessons/:lesson_id/complete",
            post(routes::progress::complete_lesson),
        )
        .route(
            "/api/progress/course",
            post(routes::progress::save_course_progress),
        )
        .route(
            "/api/progress/user/:user_id",
            get(routes::progress::get_user_progress),
        )
        .route(
            "/api/courses/:course_id/quiz/questions",
            get(routes::quiz::get_quiz_questions),
        )
        .route(
            "/api/courses/:course_id/quiz/start",
            post(routes::quiz::start_quiz),
        )
        .route(
            "/api/quiz/session",
            get(routes::quiz::get_session).delete(routes::quiz::abandon_session),
        )
        .route(
            "/api/quiz/session/answer",
            post(routes::quiz::select_answer),
        )
        .route("/api/quiz/session/navigate", post(routes::quiz::navigate))
        .route("/api/quiz/session/submit", post(routes::quiz::submit_quiz))
        .route(
            "/api/quiz/session/review/:index",
            get(routes::quiz::review_step),
        )
        .route("/api/quiz/session/retry", post(routes::quiz::retry_quiz))
        .route(
            "/api/courses/:course_id/survey",
            post(routes::survey::submit_survey),
        )
        .route(
            "/api/courses/:course_id/survey/skip",
            post(routes::survey::skip_survey),
        )
        .layer(axum::middleware::from_fn(
            middleware::auth::require_bearer_auth,
        ));

    let app = base_routes
        .merge(auth_api)
        .merge(catalog_api)
        .merge(learner_api)
        .with_state(app_state)
        .layer(middleware::cors::cors_layer(config.client_url.as_deref()))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
