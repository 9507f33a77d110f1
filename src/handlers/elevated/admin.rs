// handlers/elevated/admin.rs - GET /api/admin/summary and /api/admin/status handlers

use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AdminConfig;
use crate::database::models::AdminLogRow;
use crate::database::{activity_logs, admin, users, DatabaseManager};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

/// Resolved paging window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: i64,
    pub limit: i64,
}

impl Paging {
    /// Unparseable values fall back to defaults; limit is clamped to the configured maximum
    pub fn from_params(params: &SummaryParams, config: &AdminConfig) -> Self {
        let page = params
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        let max = config.max_page_size.max(1);
        let limit = params
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(config.default_page_size)
            .clamp(1, max);

        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        let limit = self.limit.max(1);
        (total.max(0) + limit - 1) / limit
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub total_users: i64,
    pub total_logs: i64,
    pub filtered_total: i64,
    pub recent_logs: Vec<AdminLogRow>,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// GET /api/admin/summary?page=1&limit=10&search=
///
/// `search` matches user name, email, log content and type case-insensitively.
///
/// Expected Output:
/// ```json
/// {
///   "totalUsers": 3, "totalLogs": 120, "filteredTotal": 120,
///   "recentLogs": [{ "id": 1, "type": "FOOD", "content": "...", "email": "a@b.c", "name": "A", ... }],
///   "page": 1, "limit": 10, "totalPages": 12
/// }
/// ```
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> ApiResult<AdminSummary> {
    let paging = Paging::from_params(&params, &state.config.admin);
    let pattern = admin::like_pattern(params.search.as_deref());
    let pool = &state.pool;

    let (total_users, total_logs, filtered_total, recent_logs) = futures::try_join!(
        users::count_users(pool),
        activity_logs::count_logs(pool),
        admin::count_matching_logs(pool, pattern.as_deref()),
        admin::search_logs(pool, pattern.as_deref(), paging.limit, paging.offset()),
    )?;

    Ok(ApiResponse::success(AdminSummary {
        total_users,
        total_logs,
        filtered_total,
        recent_logs,
        page: paging.page,
        limit: paging.limit,
        total_pages: paging.total_pages(filtered_total),
    }))
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckState {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct Check {
    pub status: CheckState,
    pub message: String,
}

impl Check {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: CheckState::Ok,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: CheckState::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub google: Check,
    pub gemini: Check,
    pub server: Check,
    pub database: Check,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/admin/status - Which integrations are configured and reachable
pub async fn status(State(state): State<AppState>) -> ApiResult<SystemStatus> {
    let oauth = &state.config.oauth;
    let google = if oauth.google_client_id.is_empty() || oauth.google_client_secret.is_empty() {
        Check::error("Google OAuth credentials are missing")
    } else {
        Check::ok("Google OAuth credentials configured")
    };

    let gemini = if state.completion.is_configured() {
        Check::ok(format!("Gemini API key configured (model {})", state.config.ai.model))
    } else {
        Check::error("Gemini API key is missing")
    };

    let database = match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => Check::ok("Database connection healthy"),
        Err(e) => {
            tracing::warn!("Admin status database check failed: {}", e);
            Check::error("Database connection failed")
        }
    };

    Ok(ApiResponse::success(SystemStatus {
        google,
        gemini,
        server: Check::ok("Server running"),
        database,
        timestamp: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn params(page: Option<&str>, limit: Option<&str>) -> SummaryParams {
        SummaryParams {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
            search: None,
        }
    }

    #[test]
    fn paging_defaults_and_clamps() {
        let config = AppConfig::development().admin;

        assert_eq!(Paging::from_params(&params(None, None), &config), Paging { page: 1, limit: 10 });
        assert_eq!(Paging::from_params(&params(Some("3"), Some("500")), &config), Paging { page: 3, limit: 100 });
        assert_eq!(Paging::from_params(&params(Some("0"), Some("abc")), &config), Paging { page: 1, limit: 10 });
        assert_eq!(Paging::from_params(&params(Some("-2"), Some("-5")), &config), Paging { page: 1, limit: 10 });
    }

    #[test]
    fn zero_or_negative_config_still_yields_a_usable_limit() {
        let mut config = AppConfig::development().admin;
        config.max_page_size = 0;
        config.default_page_size = 0;

        let paging = Paging::from_params(&SummaryParams::default(), &config);
        assert_eq!(paging.limit, 1);
        assert_eq!(paging.total_pages(5), 5);

        config.max_page_size = -10;
        config.default_page_size = -3;
        let paging = Paging::from_params(&params(Some("2"), Some("50")), &config);
        assert_eq!(paging, Paging { page: 2, limit: 1 });
        assert_eq!(paging.offset(), 1);
    }

    #[test]
    fn offset_and_page_count() {
        let paging = Paging { page: 3, limit: 10 };
        assert_eq!(paging.offset(), 20);
        assert_eq!(paging.total_pages(0), 0);
        assert_eq!(paging.total_pages(10), 1);
        assert_eq!(paging.total_pages(21), 3);
    }

    #[test]
    fn check_serializes_uppercase_status() {
        let value = serde_json::to_value(Check::error("down")).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "ERROR", "message": "down" }));
    }
}
