/// Post handlers - HTTP endpoints for post operations
use crate::config::Config;
use crate::error::{ErrorResponse, Result};
use crate::middleware::UserId;
use crate::models::{ListPostsQuery, PostCreate, PostOut, PostResponse};
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

fn post_service(pool: &web::Data<PgPool>, config: &web::Data<Config>) -> PostService {
    PostService::with_settings(pool.get_ref().clone(), config.posts.clone())
}

/// List posts with their vote counts
#[utoipa::path(
    get,
    path = "/posts/",
    tag = "posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Posts with vote counts", body = [PostOut]),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 422, description = "Invalid paging parameters", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_posts(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    _user_id: UserId,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse> {
    query.validate()?;

    let posts = post_service(&pool, &config).list_posts(&query).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Create a new post owned by the caller
#[utoipa::path(
    post,
    path = "/posts/",
    tag = "posts",
    request_body = PostCreate,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 422, description = "Malformed post payload", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user_id: UserId,
    req: web::Json<PostCreate>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = post_service(&pool, &config).create_post(user_id.0, &req).await?;

    Ok(HttpResponse::Created().json(post))
}

/// Get a post by ID
#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post with vote count", body = PostOut),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_post(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    _user_id: UserId,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let post = post_service(&pool, &config).get_post(*post_id).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Replace a post's title, content and published flag
#[utoipa::path(
    put,
    path = "/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    request_body = PostCreate,
    responses(
        (status = 202, description = "Post updated", body = PostResponse),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 403, description = "Caller does not own the post", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 422, description = "Malformed post payload", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_post(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user_id: UserId,
    post_id: web::Path<i64>,
    req: web::Json<PostCreate>,
) -> Result<HttpResponse> {
    req.validate()?;

    let post = post_service(&pool, &config)
        .update_post(*post_id, user_id.0, &req)
        .await?;

    Ok(HttpResponse::Accepted().json(post))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 403, description = "Caller does not own the post", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user_id: UserId,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    post_service(&pool, &config)
        .delete_post(*post_id, user_id.0)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
