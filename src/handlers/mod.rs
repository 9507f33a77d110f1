// handlers/mod.rs - 3-tier handler layout
//
// Public (no session) -> Protected (auth_token cookie) -> Elevated (ADMIN role)
pub mod public;    // /api/auth/*, /api/verify-turnstile, /health
pub mod protected; // /api/logs/*, /api/stats/*, /api/analyze
pub mod elevated;  // /api/admin/*

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::ApiError;

/// Unwrap a JSON body, turning extractor rejections into our JSON error shape
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}
