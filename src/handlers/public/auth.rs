// handlers/public/auth.rs - Google sign-in and session cookie handlers

use axum::{
    extract::{Query, State},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, HeaderName, StatusCode,
    },
    response::{AppendHeaders, IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::cookies::{build_cookie, expire_cookie, read_cookie, AUTH_COOKIE, OAUTH_STATE_COOKIE};
use crate::auth::{generate_jwt, Claims};
use crate::database::models::Role;
use crate::database::users;
use crate::error::ApiError;
use crate::middleware::{session_claims, ApiResponse};
use crate::oauth::GoogleOAuth;
use crate::state::AppState;

const OAUTH_STATE_MAX_AGE_SECS: i64 = 10 * 60;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn redirect_with_cookies(location: &str, cookies: Vec<String>) -> Response {
    let mut headers: Vec<(HeaderName, String)> = cookies.into_iter().map(|c| (SET_COOKIE, c)).collect();
    headers.push((LOCATION, location.to_string()));
    (StatusCode::FOUND, AppendHeaders(headers)).into_response()
}

/// GET /api/auth/login - Redirect to the Google consent screen
///
/// A random `state` is stored in a short-lived `oauth_state` cookie and checked
/// again on the callback.
pub async fn login(State(state): State<AppState>) -> Result<Response, ApiError> {
    let nonce = Uuid::new_v4().simple().to_string();
    let url = GoogleOAuth::new(&state.config.oauth, &state.http).authorize_url(&nonce)?;

    let state_cookie = build_cookie(
        OAUTH_STATE_COOKIE,
        &nonce,
        OAUTH_STATE_MAX_AGE_SECS,
        true,
        state.config.security.secure_cookies,
    );

    Ok(redirect_with_cookies(url.as_str(), vec![state_cookie]))
}

/// GET /api/auth/callback - Finish Google sign-in
///
/// Exchanges the code, upserts the user by email, then sets the `auth_token`
/// cookie and redirects to the dashboard.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ApiError> {
    if let Some(error) = params.error {
        warn!("Google returned an OAuth error: {}", error);
        return Err(ApiError::bad_request(format!("Google sign-in failed: {}", error)));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing code"))?;

    if let Some(expected) = read_cookie(&headers, OAUTH_STATE_COOKIE) {
        if params.state.as_deref() != Some(expected.as_str()) {
            warn!("OAuth state mismatch on callback");
            return Err(ApiError::bad_request("Invalid OAuth state"));
        }
    }

    let config = &state.config;
    let google = GoogleOAuth::new(&config.oauth, &state.http);
    let access_token = google.exchange_code(&code).await?;
    let profile = google.fetch_profile(&access_token).await?;

    let role_if_new = if config.is_admin_email(&profile.email) {
        Role::Admin
    } else {
        Role::User
    };

    let user = users::upsert_google_user(
        &state.pool,
        &profile.email,
        &profile.name,
        profile.picture.as_deref(),
        role_if_new,
    )
    .await?;

    let claims = Claims::for_user(&user, config.security.session_hours)?;
    let token = generate_jwt(&claims, &config.security.jwt_secret)?;
    info!("User {} signed in as {:?}", user.id, claims.role);

    let secure = config.security.secure_cookies;
    let cookies = vec![
        build_cookie(AUTH_COOKIE, &token, claims.lifetime_secs(), true, secure),
        expire_cookie(OAUTH_STATE_COOKIE, secure),
    ];

    Ok(redirect_with_cookies(&config.oauth.post_login_path, cookies))
}

/// GET /api/auth/me - Current session claims
///
/// ```json
/// { "user": { "sub": "12", "email": "a@b.c", "name": "A", "picture": null, "role": "USER", "iat": 0, "exp": 0 } }
/// ```
/// `{"user": null}` when there is no valid session; never 401.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let claims = session_claims(&headers, &state.config.security.jwt_secret);
    Json(json!({ "user": claims }))
}

/// POST /api/auth/logout - Clear the session cookie
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = expire_cookie(AUTH_COOKIE, state.config.security.secure_cookies);
    (AppendHeaders([(SET_COOKIE, cookie)]), ApiResponse::ok())
}
