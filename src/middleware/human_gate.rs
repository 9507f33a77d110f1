use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use url::form_urlencoded;

use crate::auth::cookies::{read_cookie, HUMAN_COOKIE};
use crate::error::ApiError;

pub const VERIFY_PATH: &str = "/verify";

/// Paths reachable before the visitor has passed the human check
pub fn is_public_path(path: &str) -> bool {
    const PREFIXES: [&str; 6] = [
        "/api/verify-turnstile",
        "/api/auth/",
        "/assets/",
        "/src/",
        "/node_modules/",
        "/@",
    ];

    path == VERIFY_PATH
        || path == "/health"
        || PREFIXES.iter().any(|prefix| path.starts_with(prefix))
        || path.contains('.')
}

/// Global middleware: requires `human_verified=true` outside the allow-list
pub async fn human_gate(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    if is_public_path(&path) {
        return next.run(request).await;
    }

    if read_cookie(request.headers(), HUMAN_COOKIE).as_deref() == Some("true") {
        return next.run(request).await;
    }

    if path.starts_with("/api/") {
        tracing::debug!("Blocked unverified API request to {}", path);
        return verification_required().into_response();
    }

    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(&path);
    let next_param: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
    let location = format!("{}?next={}", VERIFY_PATH, next_param);

    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

fn verification_required() -> (StatusCode, Json<serde_json::Value>) {
    let api_error = ApiError::forbidden("Human verification required");
    let mut body = api_error.to_json();
    body["code"] = "HUMAN_VERIFICATION_REQUIRED".into();
    body["verificationUrl"] = VERIFY_PATH.into();
    (api_error.status_code(), Json(body))
}
