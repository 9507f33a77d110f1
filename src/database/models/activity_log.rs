use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityType {
    Food,
    Exercise,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Food => "FOOD",
            ActivityType::Exercise => "EXERCISE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FOOD" => Some(ActivityType::Food),
            "EXERCISE" => Some(ActivityType::Exercise),
            _ => None,
        }
    }
}

/// Meal or workout slot the entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    MorningExercise,
    EveningExercise,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Breakfast,
        Category::Lunch,
        Category::Dinner,
        Category::Snack,
        Category::MorningExercise,
        Category::EveningExercise,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Breakfast => "BREAKFAST",
            Category::Lunch => "LUNCH",
            Category::Dinner => "DINNER",
            Category::Snack => "SNACK",
            Category::MorningExercise => "MORNING_EXERCISE",
            Category::EveningExercise => "EVENING_EXERCISE",
            Category::Other => "OTHER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let wanted = value.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|c| c.as_str() == wanted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    pub id: i64,
    pub user_id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub calories: i32,
    pub protein: f64,
    pub category: Option<String>,
    pub recorded_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Log row joined with its owner, for the admin view
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminLogRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub log: ActivityLog,
    pub email: String,
    pub name: String,
}

/// Validated entry ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivityLog {
    pub kind: ActivityType,
    pub content: String,
    pub calories: i32,
    pub protein: f64,
    pub category: Option<Category>,
    pub recorded_date: NaiveDate,
}

pub fn round_calories(value: f64) -> Option<i32> {
    if value.is_finite() && value.abs() <= i32::MAX as f64 {
        Some(value.round() as i32)
    } else {
        None
    }
}

/// Accepts integer or fractional JSON numbers, rounding to whole calories
pub fn deserialize_opt_calories<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(value) => round_calories(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom("calories out of range")),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "deserialize_opt_calories")]
        calories: Option<i32>,
    }

    #[test]
    fn calories_round_from_floats() {
        let s: Sample = serde_json::from_str(r#"{"calories": 249.6}"#).unwrap();
        assert_eq!(s.calories, Some(250));

        let s: Sample = serde_json::from_str(r#"{"calories": -120.4}"#).unwrap();
        assert_eq!(s.calories, Some(-120));

        let s: Sample = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(s.calories, None);

        assert!(serde_json::from_str::<Sample>(r#"{"calories": 1e12}"#).is_err());
        assert_eq!(round_calories(f64::NAN), None);
    }

    #[test]
    fn parses_types_and_categories_loosely() {
        assert_eq!(ActivityType::parse(" food "), Some(ActivityType::Food));
        assert_eq!(ActivityType::parse("sleep"), None);
        assert_eq!(Category::parse("morning_exercise"), Some(Category::MorningExercise));
        assert_eq!(Category::parse("BRUNCH"), None);
    }

    #[test]
    fn category_serializes_screaming_snake() {
        let json = serde_json::to_string(&Category::EveningExercise).unwrap();
        assert_eq!(json, "\"EVENING_EXERCISE\"");
    }

    #[test]
    fn log_serializes_kind_as_type() {
        let log = ActivityLog {
            id: 1,
            user_id: 2,
            kind: "FOOD".to_string(),
            content: "김밥".to_string(),
            calories: 320,
            protein: 9.5,
            category: Some("LUNCH".to_string()),
            recorded_date: NaiveDate::from_ymd_opt(2026, 1, 29).unwrap(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&log).unwrap();
        assert_eq!(value["type"], "FOOD");
        assert_eq!(value["recorded_date"], "2026-01-29");
        assert!(value.get("kind").is_none());
    }
}
