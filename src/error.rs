// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (Google, Gemini, Turnstile)
    BadGateway(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code()
        });

        if let ApiError::ValidationError {
            field_errors: Some(field_errors),
            ..
        } = self
        {
            body["field_errors"] = json!(field_errors);
        }

        body
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        use crate::database::DatabaseError;
        match err {
            DatabaseError::ConfigMissing(what) => {
                tracing::error!("Database misconfigured: missing {}", what);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut) => {
                tracing::error!("Database pool timed out");
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        crate::database::DatabaseError::from(err).into()
    }
}

impl From<crate::auth::JwtError> for ApiError {
    fn from(err: crate::auth::JwtError) -> Self {
        use crate::auth::JwtError;
        match err {
            JwtError::Invalid(msg) => {
                tracing::debug!("Rejected session token: {}", msg);
                ApiError::unauthorized("Invalid token")
            }
            JwtError::InvalidSecret | JwtError::TokenGeneration(_) => {
                tracing::error!("Session token error: {}", err);
                ApiError::internal_server_error("Failed to issue session")
            }
        }
    }
}

impl From<crate::oauth::OAuthError> for ApiError {
    fn from(err: crate::oauth::OAuthError) -> Self {
        use crate::oauth::OAuthError;
        match err {
            OAuthError::NotConfigured(what) => {
                tracing::error!("OAuth misconfigured: missing {}", what);
                ApiError::internal_server_error("Server configuration error: Google sign-in is not configured")
            }
            OAuthError::InvalidUrl(_) => {
                tracing::error!("OAuth misconfigured: {}", err);
                ApiError::internal_server_error("Server configuration error: invalid Google OAuth endpoint")
            }
            OAuthError::Rejected(_) => ApiError::bad_request(err.to_string()),
            OAuthError::MissingEmail => ApiError::bad_gateway(err.to_string()),
            OAuthError::Transport(_) => {
                tracing::error!("Google OAuth failure: {}", err);
                ApiError::bad_gateway("Failed to reach Google")
            }
        }
    }
}

impl From<crate::ai::CompletionError> for ApiError {
    fn from(err: crate::ai::CompletionError) -> Self {
        use crate::ai::CompletionError;
        match err {
            CompletionError::MissingApiKey => {
                ApiError::internal_server_error("Server configuration error: Missing Gemini API Key")
            }
            CompletionError::Transport(_) => {
                tracing::error!("Completion failure: {}", err);
                ApiError::bad_gateway("Gemini API request failed")
            }
            CompletionError::Upstream(_) | CompletionError::EmptyResponse | CompletionError::Unparseable(_) => {
                tracing::warn!("Completion failure: {}", err);
                ApiError::bad_gateway(err.to_string())
            }
        }
    }
}

impl From<crate::turnstile::TurnstileError> for ApiError {
    fn from(err: crate::turnstile::TurnstileError) -> Self {
        use crate::turnstile::TurnstileError;
        match err {
            TurnstileError::NotConfigured => {
                ApiError::internal_server_error("Server configuration error: human verification is not configured")
            }
            TurnstileError::Failed(_) => ApiError::forbidden(err.to_string()),
            TurnstileError::Transport(_) => {
                tracing::error!("Turnstile failure: {}", err);
                ApiError::bad_gateway("Human verification service unavailable")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_field_errors() {
        let mut fields = HashMap::new();
        fields.insert("type".to_string(), "must be FOOD or EXERCISE".to_string());
        let err = ApiError::validation_error("Invalid log entry", Some(fields));

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = err.to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["type"], "must be FOOD or EXERCISE");
    }

    #[test]
    fn internal_errors_hide_details() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Database error occurred");
    }

    #[test]
    fn pool_timeout_maps_to_unavailable() {
        let err: ApiError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
