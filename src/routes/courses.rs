use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::course_dto::{CourseDetailResponse, CourseListResponse, LessonResponse},
    error::Result,
    middleware::auth::Claims,
    AppState,
};

fn optional_user_id(claims: Option<Extension<Claims>>) -> Result<Option<i64>> {
    match claims {
        Some(Extension(claims)) => Ok(Some(claims.user_id()?)),
        None => Ok(None),
    }
}

#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "Course catalog with per-user completion flags", body = Json<CourseListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_courses(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
) -> Result<impl IntoResponse> {
    let courses = state
        .course_service
        .list_courses(optional_user_id(claims)?)
        .await?;
    Ok(Json(CourseListResponse { courses }))
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}",
    params(
        ("course_id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course with lessons, progress and quiz metadata", body = Json<CourseDetailResponse>),
        (status = 404, description = "Course not found")
    )
)]
#[axum::debug_handler]
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    claims: Option<Extension<Claims>>,
) -> Result<impl IntoResponse> {
    let course = state
        .course_service
        .course_detail(course_id, optional_user_id(claims)?)
        .await?;
    Ok(Json(CourseDetailResponse { course }))
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/lessons/{lesson_id}",
    params(
        ("course_id" = i64, Path, description = "Course ID"),
        ("lesson_id" = i64, Path, description = "Lesson ID")
    ),
    responses(
        (status = 200, description = "Lesson content", body = Json<LessonResponse>),
        (status = 404, description = "Lesson not found")
    )
)]
#[axum::debug_handler]
pub async fn get_lesson(
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse> {
    let lesson = state.course_service.lesson(course_id, lesson_id).await?;
    Ok(Json(LessonResponse { lesson }))
}
