use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Success response: object payloads get `"success": true` merged in,
/// anything else is nested under `data`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { data }
    }
}

impl ApiResponse<Value> {
    /// Bare `{"success": true}`
    pub fn ok() -> Self {
        Self::success(Value::Object(Map::new()))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        Json(envelope(data_value)).into_response()
    }
}

fn envelope(data: Value) -> Value {
    match data {
        Value::Object(fields) => {
            let mut merged = Map::with_capacity(fields.len() + 1);
            merged.insert("success".to_string(), Value::Bool(true));
            merged.extend(fields);
            Value::Object(merged)
        }
        other => json!({ "success": true, "data": other }),
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objects_gain_success_flag() {
        assert_eq!(
            envelope(json!({ "id": 7 })),
            json!({ "success": true, "id": 7 })
        );
        assert_eq!(envelope(json!({})), json!({ "success": true }));
    }

    #[test]
    fn non_objects_nest_under_data() {
        assert_eq!(
            envelope(json!([1, 2])),
            json!({ "success": true, "data": [1, 2] })
        );
    }
}
