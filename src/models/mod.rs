pub mod course;
pub mod lesson;
pub mod progress;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_session;
pub mod survey;
pub mod user;
