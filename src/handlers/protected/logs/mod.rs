// handlers/protected/logs/mod.rs - Activity log endpoints, all scoped to the session user
pub mod batch_create;
pub mod create;
pub mod delete;
pub mod list;

use chrono::NaiveDate;

/// Strict `YYYY-MM-DD`
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
