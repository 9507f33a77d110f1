use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{cookies, validate_jwt, Claims};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, inserted into request extensions by `require_session`
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub id: i64,
    pub claims: Claims,
}

/// Claims from a valid `auth_token` cookie, if any
pub fn session_claims(headers: &HeaderMap, secret: &str) -> Option<Claims> {
    let token = cookies::read_cookie(headers, cookies::AUTH_COOKIE)?;
    validate_jwt(&token, secret).ok()
}

/// Protected tier: verifies the session cookie and attaches `SessionUser`
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = cookies::read_cookie(request.headers(), cookies::AUTH_COOKIE)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let claims = validate_jwt(&token, &state.config.security.jwt_secret).map_err(|e| {
        tracing::warn!("Rejected session cookie on {}: {}", request.uri().path(), e);
        ApiError::unauthorized("Invalid token")
    })?;

    let id = claims
        .user_id()
        .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

    request.extensions_mut().insert(SessionUser { id, claims });
    Ok(next.run(request).await)
}

/// Elevated tier: must run inside `require_session`
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<SessionUser>()
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    if !user.claims.is_admin() {
        tracing::warn!("Non-admin user {} denied {}", user.id, request.uri().path());
        return Err(ApiError::forbidden("Forbidden: Admin access required"));
    }

    Ok(next.run(request).await)
}
