use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::user::{Role, User};

/// Insert the user on first sign-in, otherwise refresh name/picture.
/// `role_if_new` only applies to the insert; existing users keep their role.
pub async fn upsert_google_user(
    pool: &PgPool,
    email: &str,
    name: &str,
    picture: Option<&str>,
    role_if_new: Role,
) -> Result<User, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, name, picture, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (email) DO UPDATE
            SET name = EXCLUDED.name,
                picture = EXCLUDED.picture
         RETURNING id, email, name, picture, role, created_at",
    )
    .bind(email)
    .bind(name)
    .bind(picture)
    .bind(role_if_new.as_str())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn count_users(pool: &PgPool) -> Result<i64, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
