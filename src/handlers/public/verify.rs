// handlers/public/verify.rs - POST /api/verify-turnstile handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::Deserialize;

use crate::auth::cookies::{build_cookie, HUMAN_COOKIE};
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::ApiResponse;
use crate::state::AppState;
use crate::turnstile;

const HUMAN_COOKIE_MAX_AGE_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: Option<String>,
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(ip) = headers.get("cf-connecting-ip").and_then(|v| v.to_str().ok()) {
        return Some(ip.trim().to_string());
    }
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

/// POST /api/verify-turnstile - Exchange a Turnstile token for the `human_verified` cookie
///
/// Input: `{"token": "<widget response>"}`
/// Output: `{"success": true}` plus `Set-Cookie: human_verified=true` (24h)
pub async fn verify_turnstile(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = json_body(payload)?;
    let token = body
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing token"))?;

    let remote_ip = client_ip(&headers);
    turnstile::verify_token(&state.http, &state.config.turnstile, &token, remote_ip.as_deref()).await?;

    let cookie = build_cookie(
        HUMAN_COOKIE,
        "true",
        HUMAN_COOKIE_MAX_AGE_SECS,
        true,
        state.config.security.secure_cookies,
    );

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), ApiResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn prefers_cloudflare_header_then_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.9"));

        headers.insert("cf-connecting-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(client_ip(&headers).as_deref(), Some("198.51.100.4"));

        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}
