// handlers/protected/logs/batch_create.rs - POST /api/logs/batch_create handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::parse_date;
use crate::database::activity_logs;
use crate::database::models::activity_log::{deserialize_opt_calories, ActivityType, Category, NewActivityLog};
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, SessionUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BatchItem {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_calories")]
    pub calories: Option<i32>,
    pub protein: Option<f64>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchCreateRequest {
    pub items: Option<Vec<BatchItem>>,
    pub recorded_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchCreated {
    pub count: usize,
}

impl BatchCreateRequest {
    pub fn into_entries(self) -> Result<Vec<NewActivityLog>, ApiError> {
        let items = self
            .items
            .filter(|items| !items.is_empty())
            .ok_or_else(|| ApiError::bad_request("Invalid items"))?;

        let recorded_date = self
            .recorded_date
            .as_deref()
            .and_then(parse_date)
            .ok_or_else(|| ApiError::bad_request("Invalid recorded_date, expected YYYY-MM-DD"))?;

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| item.into_entry(recorded_date).ok_or_else(|| {
                ApiError::bad_request(format!("Invalid item at index {}: type, name and calories are required", index))
            }))
            .collect()
    }
}

impl BatchItem {
    fn into_entry(self, recorded_date: chrono::NaiveDate) -> Option<NewActivityLog> {
        let kind = self.kind.as_deref().and_then(ActivityType::parse)?;
        let content = self.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())?;

        Some(NewActivityLog {
            kind,
            content,
            calories: self.calories?,
            protein: self.protein.filter(|p| p.is_finite() && *p >= 0.0).unwrap_or(0.0),
            category: self.category.as_deref().and_then(Category::parse),
            recorded_date,
        })
    }
}

/// POST /api/logs/batch_create - Save analyzed items for one day
///
/// Expected Input:
/// ```json
/// {
///   "recorded_date": "2025-01-01",
///   "items": [{ "type": "FOOD", "name": "라면", "calories": 500, "protein": 10, "category": "DINNER" }]
/// }
/// ```
///
/// All rows are written in one transaction. Output: `{"success": true, "count": 1}`
pub async fn batch_create_logs(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    payload: Result<Json<BatchCreateRequest>, JsonRejection>,
) -> ApiResult<BatchCreated> {
    let entries = json_body(payload)?.into_entries()?;
    let count = activity_logs::insert_batch(&state.pool, user.id, &entries).await?;

    tracing::info!("User {} saved {} analyzed entries", user.id, count);
    Ok(ApiResponse::success(BatchCreated { count }))
}
