use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};

use crate::database::manager::DatabaseError;
use crate::database::models::activity_log::{ActivityLog, NewActivityLog};

const INSERT_LOG: &str = "INSERT INTO activity_logs
        (user_id, type, content, calories, protein, recorded_date, category)
     VALUES ($1, $2, $3, $4, $5, $6, $7)
     RETURNING id";

pub async fn insert_log(pool: &PgPool, user_id: i64, entry: &NewActivityLog) -> Result<i64, DatabaseError> {
    Ok(insert_one(pool, user_id, entry).await?)
}

/// Insert every entry or none of them
pub async fn insert_batch(pool: &PgPool, user_id: i64, entries: &[NewActivityLog]) -> Result<usize, DatabaseError> {
    let mut tx = pool.begin().await?;

    for entry in entries {
        insert_one(&mut *tx, user_id, entry).await?;
    }

    tx.commit().await?;
    Ok(entries.len())
}

async fn insert_one<'e, E>(executor: E, user_id: i64, entry: &NewActivityLog) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(INSERT_LOG)
        .bind(user_id)
        .bind(entry.kind.as_str())
        .bind(&entry.content)
        .bind(entry.calories)
        .bind(entry.protein)
        .bind(entry.recorded_date)
        .bind(entry.category.map(|c| c.as_str()))
        .fetch_one(executor)
        .await
}

/// The user's entries, newest first, optionally limited to one day
pub async fn list_for_user(
    pool: &PgPool,
    user_id: i64,
    date: Option<NaiveDate>,
) -> Result<Vec<ActivityLog>, DatabaseError> {
    let logs = sqlx::query_as::<_, ActivityLog>(
        "SELECT id, user_id, type, content, calories, protein, category, recorded_date, created_at
         FROM activity_logs
         WHERE user_id = $1
           AND ($2::DATE IS NULL OR recorded_date = $2)
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(logs)
}

/// Returns false when the row does not exist or belongs to someone else
pub async fn delete_for_user(pool: &PgPool, user_id: i64, log_id: i64) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM activity_logs WHERE id = $1 AND user_id = $2")
        .bind(log_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_logs(pool: &PgPool) -> Result<i64, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
