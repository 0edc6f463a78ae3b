/// HTTP handlers and route table
///
/// - Posts: list, create, read, replace, delete
/// - Votes: add or remove the caller's vote
/// - Users: read a user's public fields
/// - Health: liveness and database readiness
pub mod health;
pub mod posts;
pub mod users;
pub mod votes;

pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use users::get_user;
pub use votes::vote;

use crate::error::{json_config, path_config, query_config};
use crate::middleware::JwtAuthMiddleware;
use actix_web::web;

/// Register every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/health", web::get().to(health::health_summary))
        .route("/health/live", web::get().to(health::liveness_check))
        .service(
            web::scope("/posts")
                .wrap(JwtAuthMiddleware)
                .service(
                    web::resource(["", "/"])
                        .route(web::get().to(list_posts))
                        .route(web::post().to(create_post)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(get_post))
                        .route(web::put().to(update_post))
                        .route(web::delete().to(delete_post)),
                ),
        )
        .service(
            web::scope("/vote")
                .wrap(JwtAuthMiddleware)
                .service(web::resource(["", "/"]).route(web::post().to(vote))),
        )
        .service(
            web::scope("/users")
                .wrap(JwtAuthMiddleware)
                .service(web::resource("/{id}").route(web::get().to(get_user))),
        );
}
