// handlers/public/health.rs - GET /health handler

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": e.to_string()
                    }
                })),
            )
        }
    }
}
