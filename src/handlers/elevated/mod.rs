// handlers/elevated/mod.rs - Endpoints restricted to the ADMIN role
//
// Middleware: require_session, then require_admin
pub mod admin;
