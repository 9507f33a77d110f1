// handlers/protected/logs/list.rs - GET /api/logs/list handler

use axum::{
    extract::{Query, State},
    Extension,
};
use serde::{Deserialize, Serialize};

use super::parse_date;
use crate::database::activity_logs;
use crate::database::models::ActivityLog;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogList {
    pub logs: Vec<ActivityLog>,
}

/// GET /api/logs/list?date=YYYY-MM-DD - The caller's entries, newest first
///
/// Without `date` every entry is returned.
pub async fn list_logs(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<LogList> {
    let date = match params.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        None => None,
        Some(raw) => Some(parse_date(raw).ok_or_else(|| ApiError::bad_request("Invalid date, expected YYYY-MM-DD"))?),
    };

    let logs = activity_logs::list_for_user(&state.pool, user.id, date).await?;
    Ok(ApiResponse::success(LogList { logs }))
}
