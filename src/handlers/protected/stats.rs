// handlers/protected/stats.rs - GET /api/stats/summary handler

use axum::{
    extract::{Query, State},
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::database::stats::{self, DailyStat, Granularity, StatsRange};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub range: Option<String>,
    pub granularity: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub stats: Vec<DailyStat>,
}

/// GET /api/stats/summary?range=7|30|<n>|ALL&granularity=day|week
///
/// Expected Output:
/// ```json
/// { "stats": [{ "recorded_date": "2025-01-01", "net_calories": 1650, "total_protein": 72.5, "entries": 4 }] }
/// ```
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(params): Query<SummaryParams>,
) -> ApiResult<Summary> {
    let range = StatsRange::parse(params.range.as_deref())
        .ok_or_else(|| ApiError::bad_request("Invalid range, expected a number of days or ALL"))?;
    let granularity = Granularity::parse(params.granularity.as_deref())
        .ok_or_else(|| ApiError::bad_request("Invalid granularity, expected day or week"))?;

    let today = chrono::Utc::now().date_naive();
    let start = range.start_date(today);

    let stats = stats::summarize(&state.pool, user.id, start, today, granularity).await?;
    Ok(ApiResponse::success(Summary { stats }))
}
