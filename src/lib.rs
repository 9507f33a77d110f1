pub mod ai;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod oauth;
pub mod state;
pub mod turnstile;

pub use app::build_router;
pub use state::AppState;
