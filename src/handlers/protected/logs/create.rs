// handlers/protected/logs/create.rs - POST /api/logs/create handler

use std::collections::HashMap;

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

#[derive(Debug, Default, Deserialize)]
pub struct CreateLogRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_calories")]
    pub calories: Option<i32>,
    pub protein: Option<f64>,
    pub recorded_date: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedLog {
    pub id: i64,
}

impl CreateLogRequest {
    /// Check every field, collecting all problems before rejecting
    pub fn validate(self) -> Result<NewActivityLog, ApiError> {
        let mut errors = HashMap::new();

        let kind = self.kind.as_deref().and_then(ActivityType::parse);
        if kind.is_none() {
            errors.insert("type".to_string(), "must be FOOD or EXERCISE".to_string());
        }

        let content = self.content.map(|c| c.trim().to_string()).unwrap_or_default();
        if content.is_empty() {
            errors.insert("content".to_string(), "is required".to_string());
        }

        if self.calories.is_none() {
            errors.insert("calories".to_string(), "is required".to_string());
        }

        let recorded_date = self.recorded_date.as_deref().and_then(parse_date);
        if recorded_date.is_none() {
            errors.insert("recorded_date".to_string(), "must be YYYY-MM-DD".to_string());
        }

        let category = match self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            None => None,
            Some(raw) => {
                let parsed = Category::parse(raw);
                if parsed.is_none() {
                    errors.insert("category".to_string(), format!("unknown category '{}'", raw));
                }
                parsed
            }
        };

        let protein = self.protein.unwrap_or(0.0);
        if !protein.is_finite() || protein < 0.0 {
            errors.insert("protein".to_string(), "must be a non-negative number".to_string());
        }

        match (kind, self.calories, recorded_date) {
            (Some(kind), Some(calories), Some(recorded_date)) if errors.is_empty() => Ok(NewActivityLog {
                kind,
                content,
                calories,
                protein,
                category,
                recorded_date,
            }),
            _ => Err(ApiError::validation_error("Missing required fields", Some(errors))),
        }
    }
}

/// POST /api/logs/create - Record one food or exercise entry
///
/// Expected Input:
/// ```json
/// { "type": "FOOD", "content": "비빔밥", "calories": 560, "protein": 18, "recorded_date": "2025-01-01", "category": "LUNCH" }
/// ```
///
/// Expected Output:
/// ```json
/// { "success": true, "id": 42 }
/// ```
pub async fn create_log(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    payload: Result<Json<CreateLogRequest>, JsonRejection>,
) -> ApiResult<CreatedLog> {
    let entry = json_body(payload)?.validate()?;
    let id = activity_logs::insert_log(&state.pool, user.id, &entry).await?;

    tracing::debug!("User {} logged {} entry {}", user.id, entry.kind.as_str(), id);
    Ok(ApiResponse::success(CreatedLog { id }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: serde_json::Value) -> CreateLogRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn valid_entry_defaults_protein() {
        let entry = request(serde_json::json!({
            "type": "EXERCISE",
            "content": " 요가 ",
            "calories": -180.6,
            "recorded_date": "2025-03-02"
        }))
        .validate()
        .unwrap();

        assert_eq!(entry.kind, ActivityType::Exercise);
        assert_eq!(entry.content, "요가");
        assert_eq!(entry.calories, -181);
        assert_eq!(entry.protein, 0.0);
        assert_eq!(entry.category, None);
    }

    #[test]
    fn collects_every_field_error() {
        let err = request(serde_json::json!({ "type": "NAP", "category": "BRUNCH" }))
            .validate()
            .unwrap_err();

        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        for field in ["type", "content", "calories", "recorded_date", "category"] {
            assert!(body["field_errors"][field].is_string(), "missing error for {}", field);
        }
    }
}
