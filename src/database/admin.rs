use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::activity_log::AdminLogRow;

const SEARCH_CLAUSE: &str = "($1::TEXT IS NULL
        OR u.name ILIKE $1
        OR u.email ILIKE $1
        OR l.content ILIKE $1
        OR l.type ILIKE $1)";

/// `%term%` with LIKE wildcards in the term escaped, or `None` for a blank search
pub fn like_pattern(search: Option<&str>) -> Option<String> {
    let term = search.map(str::trim).filter(|s| !s.is_empty())?;
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}

pub async fn count_matching_logs(pool: &PgPool, pattern: Option<&str>) -> Result<i64, DatabaseError> {
    let sql = format!(
        "SELECT COUNT(*)
         FROM activity_logs l
         JOIN users u ON l.user_id = u.id
         WHERE {}",
        SEARCH_CLAUSE
    );

    let count: i64 = sqlx::query_scalar(&sql).bind(pattern).fetch_one(pool).await?;
    Ok(count)
}

/// One page of logs across all users, newest first
pub async fn search_logs(
    pool: &PgPool,
    pattern: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<AdminLogRow>, DatabaseError> {
    let sql = format!(
        "SELECT l.id, l.user_id, l.type, l.content, l.calories, l.protein, l.category,
                l.recorded_date, l.created_at, u.email, u.name
         FROM activity_logs l
         JOIN users u ON l.user_id = u.id
         WHERE {}
         ORDER BY l.created_at DESC
         LIMIT $2 OFFSET $3",
        SEARCH_CLAUSE
    );

    let rows = sqlx::query_as::<_, AdminLogRow>(&sql)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_means_no_filter() {
        assert_eq!(like_pattern(None), None);
        assert_eq!(like_pattern(Some("   ")), None);
    }

    #[test]
    fn wraps_and_escapes_term() {
        assert_eq!(like_pattern(Some(" rice ")).as_deref(), Some("%rice%"));
        assert_eq!(like_pattern(Some("100%_x")).as_deref(), Some("%100\\%\\_x%"));
    }
}
