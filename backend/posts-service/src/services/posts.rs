/// Post service - listing, retrieval and owner-gated mutation of posts
use crate::config::PostsConfig;
use crate::db::{self, post_repo};
use crate::error::{AppError, Result};
use crate::services::user_does_not_exist;
use crate::models::{ListPostsQuery, Post, PostCreate, PostFilter, PostOut, PostResponse};
use sqlx::PgPool;

pub struct PostService {
    pool: PgPool,
    settings: PostsConfig,
}

/// Fails with `Forbidden` unless `user_id` owns `post`
pub fn ensure_owner(post: &Post, user_id: i32) -> Result<()> {
    if post.owner_id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not Authorized to perform action".to_string(),
        ))
    }
}

fn post_does_not_exist(post_id: i64) -> AppError {
    AppError::NotFound(format!("post with id: {} does not exist", post_id))
}

/// Post ids are `SERIAL`; anything outside `i32` cannot name a stored post.
fn stored_post_id(post_id: i64) -> Option<i32> {
    i32::try_from(post_id).ok()
}

/// Resolve query-string paging into repository parameters
pub fn resolve_filter(query: &ListPostsQuery, settings: &PostsConfig) -> PostFilter {
    let limit = query.limit.unwrap_or(settings.default_limit);
    PostFilter {
        search: query.search.clone().unwrap_or_default(),
        limit: match settings.max_limit {
            Some(max) => limit.clamp(0, max),
            None => limit.max(0),
        },
        offset: query.skip.unwrap_or(0).max(0),
        published_only: settings.list_published_only,
    }
}

impl PostService {
    pub fn with_settings(pool: PgPool, settings: PostsConfig) -> Self {
        Self { pool, settings }
    }

    /// List posts with vote counts, filtered by title substring and paged
    pub async fn list_posts(&self, query: &ListPostsQuery) -> Result<Vec<PostOut>> {
        let filter = resolve_filter(query, &self.settings);
        if filter.limit == 0 {
            return Ok(Vec::new());
        }

        let rows = post_repo::list_posts_with_votes(&self.pool, &filter).await?;
        let posts: Vec<PostOut> = rows.into_iter().map(PostOut::from).collect();

        tracing::debug!(
            search = %filter.search,
            limit = filter.limit,
            offset = filter.offset,
            count = posts.len(),
            ids = ?posts.iter().map(|p| p.post.id).collect::<Vec<_>>(),
            "listed posts"
        );

        Ok(posts)
    }

    /// Get one post with its vote count
    pub async fn get_post(&self, post_id: i64) -> Result<PostOut> {
        let not_found = || AppError::NotFound(format!("post with id: {} was not found", post_id));
        let id = stored_post_id(post_id).ok_or_else(not_found)?;

        post_repo::find_post_with_votes(&self.pool, id)
            .await?
            .map(PostOut::from)
            .ok_or_else(not_found)
    }

    /// Create a post owned by `owner_id`
    pub async fn create_post(&self, owner_id: i32, req: &PostCreate) -> Result<PostResponse> {
        let mut tx = self.pool.begin().await?;

        let row =
            post_repo::create_post(&mut tx, owner_id, &req.title, &req.content, req.published)
                .await
                .map_err(|e| {
                    if db::is_foreign_key_violation(&e)
                        && db::violated_constraint(&e) == Some(db::POSTS_OWNER_FK)
                    {
                        user_does_not_exist(owner_id)
                    } else {
                        e.into()
                    }
                })?;

        tx.commit().await?;

        tracing::info!(post_id = row.id, owner_id, "post created");

        Ok(PostResponse::from(row))
    }

    /// Replace title, content and published of a post owned by `user_id`
    pub async fn update_post(
        &self,
        post_id: i64,
        user_id: i32,
        req: &PostCreate,
    ) -> Result<PostResponse> {
        let id = stored_post_id(post_id).ok_or_else(|| post_does_not_exist(post_id))?;
        let mut tx = self.pool.begin().await?;

        let post = post_repo::find_post_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| post_does_not_exist(post_id))?;
        ensure_owner(&post, user_id)?;

        let row = post_repo::replace_post(&mut tx, id, &req.title, &req.content, req.published)
            .await?
            .ok_or_else(|| post_does_not_exist(post_id))?;

        tx.commit().await?;

        tracing::info!(post_id, user_id, "post updated");

        Ok(PostResponse::from(row))
    }

    /// Delete a post owned by `user_id`
    pub async fn delete_post(&self, post_id: i64, user_id: i32) -> Result<()> {
        let id = stored_post_id(post_id).ok_or_else(|| post_does_not_exist(post_id))?;
        let mut tx = self.pool.begin().await?;

        let post = post_repo::find_post_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| post_does_not_exist(post_id))?;
        ensure_owner(&post, user_id)?;

        post_repo::delete_post(&mut tx, id).await?;

        tx.commit().await?;

        tracing::info!(post_id, user_id, "post deleted");

        Ok(())
    }
}
