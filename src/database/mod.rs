pub mod activity_logs;
pub mod admin;
pub mod manager;
pub mod models;
pub mod stats;
pub mod users;

pub use manager::{DatabaseError, DatabaseManager};
