use sqlx::PgConnection;

/// Record `user_id`'s vote on `post_id`
///
/// A second vote by the same user fails with a unique violation on the
/// composite primary key.
pub async fn insert_vote(
    conn: &mut PgConnection,
    post_id: i32,
    user_id: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO votes (post_id, user_id) VALUES ($1, $2)")
        .bind(post_id)
        .bind(user_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Remove `user_id`'s vote on `post_id`, returning the number of rows removed
pub async fn delete_vote(
    conn: &mut PgConnection,
    post_id: i32,
    user_id: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM votes WHERE post_id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}
