// handlers/public/mod.rs - Endpoints reachable without a session
//
// Route Prefix: /api/auth/*, /api/verify-turnstile, /health
pub mod auth;
pub mod health;
pub mod verify;
