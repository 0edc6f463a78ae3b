/// Vote handler
use crate::error::{ErrorResponse, Result};
use crate::middleware::UserId;
use crate::models::{MessageResponse, VoteRequest};
use crate::services::VoteService;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

/// Add (`dir = 1`) or remove (`dir = 0`) the caller's vote on a post
#[utoipa::path(
    post,
    path = "/vote/",
    tag = "votes",
    request_body = VoteRequest,
    responses(
        (status = 201, description = "Vote added or removed", body = MessageResponse),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 404, description = "Post or vote not found", body = ErrorResponse),
        (status = 409, description = "Caller already voted on the post", body = ErrorResponse),
        (status = 422, description = "Malformed vote payload", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn vote(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<VoteRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let outcome = VoteService::new(pool.get_ref().clone())
        .vote(user_id.0, &req)
        .await?;

    Ok(HttpResponse::Created().json(MessageResponse {
        message: outcome.message().to_string(),
    }))
}
