use chrono::{Duration, NaiveDate};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;

/// Lookback window for the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsRange {
    Days(u32),
    All,
}

impl StatsRange {
    pub const DEFAULT_DAYS: u32 = 7;

    /// `None` or empty means the default window; `ALL` means everything since 2000-01-01
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            None | Some("") => Some(StatsRange::Days(Self::DEFAULT_DAYS)),
            Some(value) if value.eq_ignore_ascii_case("ALL") => Some(StatsRange::All),
            Some(value) => value.parse::<u32>().ok().map(StatsRange::Days),
        }
    }

    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        match self {
            StatsRange::All => NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN),
            StatsRange::Days(days) => today
                .checked_sub_signed(Duration::days(i64::from(*days)))
                .unwrap_or(NaiveDate::MIN),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    /// Buckets keyed by the Monday starting each ISO week
    Week,
}

impl Granularity {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("day") | Some("daily") => Some(Granularity::Day),
            Some("week") | Some("weekly") => Some(Granularity::Week),
            _ => None,
        }
    }

    /// Field name understood by Postgres `date_trunc`
    fn trunc_field(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailyStat {
    pub recorded_date: NaiveDate,
    pub net_calories: i64,
    pub total_protein: f64,
    pub entries: i64,
}

/// Net calories (food minus the absolute value of exercise) and protein per bucket, oldest first
pub async fn summarize(
    pool: &PgPool,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    granularity: Granularity,
) -> Result<Vec<DailyStat>, DatabaseError> {
    let stats = sqlx::query_as::<_, DailyStat>(
        "SELECT
            date_trunc($4, recorded_date::TIMESTAMP)::DATE AS recorded_date,
            COALESCE(SUM(CASE WHEN type = 'FOOD' THEN calories ELSE -ABS(calories) END), 0)::BIGINT AS net_calories,
            COALESCE(SUM(protein), 0)::DOUBLE PRECISION AS total_protein,
            COUNT(*) AS entries
         FROM activity_logs
         WHERE user_id = $1 AND recorded_date >= $2 AND recorded_date <= $3
         GROUP BY 1
         ORDER BY 1 ASC",
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .bind(granularity.trunc_field())
    .fetch_all(pool)
    .await?;

    Ok(stats)
}
