pub mod auth;
pub mod courses;
pub mod health;
pub mod progress;
pub mod quiz;
pub mod survey;
