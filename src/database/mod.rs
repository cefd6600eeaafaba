pub mod pool;
pub mod progress_store;
pub mod quiz_store;
