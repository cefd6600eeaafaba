pub mod auth_dto;
pub mod course_dto;
pub mod progress_dto;
pub mod quiz_dto;
