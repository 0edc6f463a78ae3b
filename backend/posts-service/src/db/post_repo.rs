use crate::models::{Post, PostFilter, PostWithOwnerRow, PostWithVotesRow};
use sqlx::{PgConnection, PgPool};

/// Escape `%`, `_` and `\` so a search string matches literally inside LIKE
pub fn escape_like(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len());
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// List posts with their owner and vote count
///
/// Posts without votes are kept by the left join and report zero.
pub async fn list_posts_with_votes(
    pool: &PgPool,
    filter: &PostFilter,
) -> Result<Vec<PostWithVotesRow>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PostWithVotesRow>(
        r#"
        SELECT p.id, p.title, p.content, p.published, p.created_at, p.owner_id,
               u.email AS owner_email, u.created_at AS owner_created_at,
               COUNT(v.post_id) AS votes
        FROM posts p
        JOIN users u ON u.id = p.owner_id
        LEFT JOIN votes v ON v.post_id = p.id
        WHERE p.title LIKE '%' || $1 || '%' ESCAPE '\'
          AND (NOT $2 OR p.published)
        GROUP BY p.id, u.id
        ORDER BY p.id
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(escape_like(&filter.search))
    .bind(filter.published_only)
    .bind(filter.limit)
    .bind(filter.offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Find a single post with its owner and vote count
pub async fn find_post_with_votes(
    pool: &PgPool,
    post_id: i32,
) -> Result<Option<PostWithVotesRow>, sqlx::Error> {
    let row = sqlx::query_as::<_, PostWithVotesRow>(
        r#"
        SELECT p.id, p.title, p.content, p.published, p.created_at, p.owner_id,
               u.email AS owner_email, u.created_at AS owner_created_at,
               COUNT(v.post_id) AS votes
        FROM posts p
        JOIN users u ON u.id = p.owner_id
        LEFT JOIN votes v ON v.post_id = p.id
        WHERE p.id = $1
        GROUP BY p.id, u.id
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns true when a post with this id exists
pub async fn post_exists(conn: &mut PgConnection, post_id: i32) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
        .bind(post_id)
        .fetch_one(conn)
        .await?;

    Ok(exists)
}

/// Insert a post owned by `owner_id`, returning it joined with its owner
pub async fn create_post(
    conn: &mut PgConnection,
    owner_id: i32,
    title: &str,
    content: &str,
    published: bool,
) -> Result<PostWithOwnerRow, sqlx::Error> {
    let row = sqlx::query_as::<_, PostWithOwnerRow>(
        r#"
        WITH inserted AS (
            INSERT INTO posts (title, content, published, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, published, created_at, owner_id
        )
        SELECT i.id, i.title, i.content, i.published, i.created_at, i.owner_id,
               u.email AS owner_email, u.created_at AS owner_created_at
        FROM inserted i
        JOIN users u ON u.id = i.owner_id
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(published)
    .bind(owner_id)
    .fetch_one(conn)
    .await?;

    Ok(row)
}

/// Fetch a post and lock its row until the surrounding transaction ends
pub async fn find_post_for_update(
    conn: &mut PgConnection,
    post_id: i32,
) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, published, created_at, owner_id
        FROM posts
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(post)
}

/// Overwrite every mutable column of a post
pub async fn replace_post(
    conn: &mut PgConnection,
    post_id: i32,
    title: &str,
    content: &str,
    published: bool,
) -> Result<Option<PostWithOwnerRow>, sqlx::Error> {
    let row = sqlx::query_as::<_, PostWithOwnerRow>(
        r#"
        WITH updated AS (
            UPDATE posts
            SET title = $1, content = $2, published = $3
            WHERE id = $4
            RETURNING id, title, content, published, created_at, owner_id
        )
        SELECT up.id, up.title, up.content, up.published, up.created_at, up.owner_id,
               u.email AS owner_email, u.created_at AS owner_created_at
        FROM updated up
        JOIN users u ON u.id = up.owner_id
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(published)
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Hard delete a post. Its votes go with it (`ON DELETE CASCADE`).
pub async fn delete_post(conn: &mut PgConnection, post_id: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}
