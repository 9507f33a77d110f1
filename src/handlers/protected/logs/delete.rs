// handlers/protected/logs/delete.rs - POST /api/logs/delete handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::database::activity_logs;
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteLogRequest {
    pub id: Option<Value>,
}

impl DeleteLogRequest {
    /// Accepts a positive JSON number or numeric string
    pub fn log_id(&self) -> Option<i64> {
        let id = match self.id.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        id.filter(|id| *id > 0)
    }
}

/// POST /api/logs/delete - Remove one of the caller's entries
///
/// Input: `{"id": 42}`. Entries owned by someone else look exactly like missing ones.
pub async fn delete_log(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    payload: Result<Json<DeleteLogRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let log_id = json_body(payload)?
        .log_id()
        .ok_or_else(|| ApiError::bad_request("Missing log ID"))?;

    if !activity_logs::delete_for_user(&state.pool, user.id, log_id).await? {
        return Err(ApiError::not_found("Log not found or unauthorized"));
    }

    Ok(ApiResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_accepts_numbers_and_numeric_strings() {
        let parse = |v: Value| serde_json::from_value::<DeleteLogRequest>(v).unwrap().log_id();
        assert_eq!(parse(serde_json::json!({ "id": 9 })), Some(9));
        assert_eq!(parse(serde_json::json!({ "id": "12" })), Some(12));
        assert_eq!(parse(serde_json::json!({ "id": "abc" })), None);
        assert_eq!(parse(serde_json::json!({})), None);
    }

    #[test]
    fn id_must_be_positive() {
        let parse = |v: Value| serde_json::from_value::<DeleteLogRequest>(v).unwrap().log_id();
        assert_eq!(parse(serde_json::json!({ "id": 0 })), None);
        assert_eq!(parse(serde_json::json!({ "id": -3 })), None);
        assert_eq!(parse(serde_json::json!({ "id": "0" })), None);
        assert_eq!(parse(serde_json::json!({ "id": 1.5 })), None);
        assert_eq!(parse(serde_json::json!({ "id": 1 })), Some(1));
    }
}
