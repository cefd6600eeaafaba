pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use sqlx::PgPool;

use crate::database::progress_store::{PgProgressStore, ProgressStore};
use crate::database::quiz_store::{PgQuizStore, QuizStore};
use crate::services::{
    completion_service::CompletionService, course_service::CourseService,
    progress_service::ProgressService, session_service::SessionService,
    user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub user_service: UserService,
    pub course_service: CourseService,
    pub progress_service: ProgressService,
    pub session_service: SessionService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let quiz_store: Arc<dyn QuizStore> = Arc::new(PgQuizStore::new(pool.clone()));
        let progress_store: Arc<dyn ProgressStore> = Arc::new(PgProgressStore::new(pool.clone()));

        let completion_service = CompletionService::new(progress_store.clone());
        let user_service = UserService::new(pool.clone());
        let course_service = CourseService::new(pool.clone(), quiz_store.clone());
        let progress_service = ProgressService::new(pool.clone(), progress_store);
        let session_service = SessionService::new(quiz_store, completion_service);

        Self {
            pool,
            user_service,
            course_service,
            progress_service,
            session_service,
        }
    }
}
