pub mod completion_service;
pub mod course_service;
pub mod progress_service;
pub mod scoring_service;
pub mod session_service;
pub mod user_service;
