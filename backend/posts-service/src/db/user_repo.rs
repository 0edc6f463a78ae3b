use crate::models::UserOut;
use sqlx::PgPool;

/// Find the public columns of a user
pub async fn find_user_by_id(pool: &PgPool, user_id: i32) -> Result<Option<UserOut>, sqlx::Error> {
    let user = sqlx::query_as::<_, UserOut>(
        "SELECT id, email, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
