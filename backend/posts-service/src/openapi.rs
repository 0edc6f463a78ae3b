/// OpenAPI documentation for the Posts Service
use crate::error::ErrorResponse;
use crate::handlers::{posts, users, votes};
use crate::models::{MessageResponse, PostCreate, PostOut, PostResponse, UserOut, VoteRequest};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Posts Service API",
        version = "1.0.0",
        description = "Posts with votes: create, list, search, update and delete posts, and vote on them. Mutations are restricted to the post owner.",
        license(
            name = "MIT"
        )
    ),
    paths(
        posts::list_posts,
        posts::create_post,
        posts::get_post,
        posts::update_post,
        posts::delete_post,
        votes::vote,
        users::get_user,
    ),
    components(schemas(
        PostCreate,
        PostResponse,
        PostOut,
        UserOut,
        VoteRequest,
        MessageResponse,
        ErrorResponse,
    )),
    tags(
        (name = "posts", description = "Post creation, retrieval, updates, and deletion"),
        (name = "votes", description = "Voting on posts"),
        (name = "users", description = "Public user profiles"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("HS256 JWT issued by the auth service"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/openapi.json"
    }
}
