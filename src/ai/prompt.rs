use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::{CompletionClient, CompletionError};
use crate::database::models::activity_log::{round_calories, ActivityType, Category};

const PROMPT_TEMPLATE: &str = r#"
      Analyze the following text describing food intake or exercise.
      Break it down into individual distinct items.

      For each item, extract:
      - "type": "FOOD" or "EXERCISE"
      - "name": Short description (string). MUST be in Korean (translate if necessary).
      - "calories": number (positive integer for food, negative for exercise)
      - "protein": number (in grams, 0 if not applicable)
      - "category": One of "BREAKFAST", "LUNCH", "DINNER", "SNACK", "MORNING_EXERCISE", "EVENING_EXERCISE", "OTHER" (Infer based on context like "morning", "lunch", or food type)

      Output Schema:
      {
        "items": [
          { "type": "...", "name": "...", "calories": 0, "protein": 0, "category": "..." }
        ]
      }

      Return ONLY the raw JSON object. No Markdown. No comments.

      Text: "{text}"
    "#;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedItem {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub name: String,
    pub calories: i32,
    pub protein: f64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub items: Vec<AnalyzedItem>,
}

pub fn build_prompt(text: &str) -> String {
    PROMPT_TEMPLATE.replace("{text}", text.trim())
}

/// Locate the JSON object in a model reply that may wrap it in prose or code fences
pub fn extract_json(raw: &str) -> &str {
    if let Some(start) = raw.find("```json") {
        let body = &raw[start + 7..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
    }

    if let Some(start) = raw.find("```") {
        let after_fence = &raw[start + 3..];
        if let Some(nl) = after_fence.find('\n') {
            let body = &after_fence[nl + 1..];
            if let Some(end) = body.find("```") {
                let candidate = body[..end].trim();
                if candidate.starts_with('{') {
                    return candidate;
                }
            }
        }
    }

    let trimmed = raw.trim();
    if trimmed.starts_with('{') {
        return trimmed;
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, CompletionError> {
    let json = extract_json(raw);
    let parsed: Value = serde_json::from_str(json).map_err(|e| CompletionError::Unparseable(e.to_string()))?;

    let root = parsed
        .as_object()
        .ok_or_else(|| CompletionError::Unparseable("expected a JSON object".to_string()))?;

    let raw_items = match root.get("items") {
        None | Some(Value::Null) => return Ok(AnalysisResult { items: Vec::new() }),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(CompletionError::Unparseable("\"items\" is not an array".to_string())),
    };

    let items = raw_items
        .iter()
        .filter_map(|raw| {
            let item = normalize_item(raw);
            if item.is_none() {
                warn!("Dropping AI item without a usable type or name");
            }
            item
        })
        .collect();

    Ok(AnalysisResult { items })
}

fn text_field<'a>(item: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str)
}

/// Numbers may arrive as JSON numbers or numeric strings
fn number_field(item: &Map<String, Value>, key: &str) -> Option<f64> {
    match item.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn normalize_item(raw: &Value) -> Option<AnalyzedItem> {
    let item = raw.as_object()?;
    let kind = text_field(item, "type").and_then(ActivityType::parse)?;
    let name = text_field(item, "name").map(str::trim).filter(|n| !n.is_empty())?;
    let calories = number_field(item, "calories").and_then(round_calories).unwrap_or(0);
    let protein = number_field(item, "protein")
        .filter(|p| p.is_finite() && *p >= 0.0)
        .unwrap_or(0.0);
    let category = text_field(item, "category")
        .and_then(Category::parse)
        .unwrap_or(Category::Other);

    Some(AnalyzedItem {
        kind,
        name: name.to_string(),
        calories,
        protein,
        category,
    })
}

/// Ask the model to break free text into food/exercise items
pub async fn analyze_text(client: &dyn CompletionClient, text: &str) -> Result<AnalysisResult, CompletionError> {
    let prompt = build_prompt(text);
    let raw = client.complete(&prompt).await?;
    parse_analysis(&raw)
}
