// handlers/protected/mod.rs - Endpoints behind the session cookie
//
// Middleware: require_session (auth_token cookie -> SessionUser extension)
pub mod analyze;
pub mod logs;
pub mod stats;
