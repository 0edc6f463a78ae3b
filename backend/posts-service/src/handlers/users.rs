/// User read handler
use crate::db::user_repo;
use crate::error::{ErrorResponse, Result};
use crate::middleware::UserId;
use crate::models::UserOut;
use crate::services::user_does_not_exist;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

/// Get a user's public fields
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserOut),
        (status = 401, description = "Missing or invalid credentials", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    pool: web::Data<PgPool>,
    _caller: UserId,
    user_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = user_id.into_inner();
    let id = i32::try_from(user_id).map_err(|_| user_does_not_exist(user_id))?;
    let user = user_repo::find_user_by_id(&pool, id)
        .await?
        .ok_or_else(|| user_does_not_exist(user_id))?;

    Ok(HttpResponse::Ok().json(user))
}
