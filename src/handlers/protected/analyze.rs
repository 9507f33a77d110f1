// handlers/protected/analyze.rs - POST /api/analyze handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::ai::{analyze_text, AnalysisResult, CompletionError};
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::SessionUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: Option<String>,
}

/// POST /api/analyze - Break free text into food/exercise items with Gemini
///
/// Expected Input:
/// ```json
/// { "text": "아침에 계란 두 개, 저녁에 30분 달리기" }
/// ```
///
/// Expected Output (the parsed model response, nothing added):
/// ```json
/// { "items": [{ "type": "FOOD", "name": "계란", "calories": 140, "protein": 12, "category": "BREAKFAST" }] }
/// ```
pub async fn analyze(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let text = json_body(payload)?
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing text input"))?;

    let max_chars = state.config.ai.max_input_chars;
    if text.chars().count() > max_chars {
        return Err(ApiError::bad_request(format!(
            "Text input is too long (max {} characters)",
            max_chars
        )));
    }

    if !state.completion.is_configured() {
        return Err(CompletionError::MissingApiKey.into());
    }

    let result = analyze_text(state.completion.as_ref(), &text).await?;
    tracing::debug!("Analyzed text for user {} into {} items", user.id, result.items.len());

    Ok(Json(result))
}
