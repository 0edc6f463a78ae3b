/// Data models for posts-service
///
/// - Row structs (`Post`, `PostWithVotesRow`, `PostWithOwnerRow`) mirror query results.
/// - Request DTOs (`PostCreate`, `VoteRequest`, `ListPostsQuery`) carry validation rules.
/// - Response projections (`UserOut`, `PostResponse`, `PostOut`) are what clients see.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// ============================================
// Storage rows
// ============================================

/// A row of the `posts` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: i32,
}

/// A post joined with its owner's public columns
#[derive(Debug, Clone, FromRow)]
pub struct PostWithOwnerRow {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: i32,
    pub owner_email: String,
    pub owner_created_at: DateTime<Utc>,
}

/// A post joined with its owner and the number of votes referencing it
#[derive(Debug, Clone, FromRow)]
pub struct PostWithVotesRow {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: i32,
    pub owner_email: String,
    pub owner_created_at: DateTime<Utc>,
    pub votes: i64,
}

// ============================================
// Response projections
// ============================================

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserOut {
    pub id: i32,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A post as returned by create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: i32,
    pub owner: UserOut,
}

/// A post together with its vote count, as returned by list and get
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PostOut {
    #[serde(rename = "Post")]
    pub post: PostResponse,
    pub votes: i64,
}

impl From<PostWithOwnerRow> for PostResponse {
    fn from(row: PostWithOwnerRow) -> Self {
        PostResponse {
            id: row.id,
            title: row.title,
            content: row.content,
            published: row.published,
            created_at: row.created_at,
            owner_id: row.owner_id,
            owner: UserOut {
                id: row.owner_id,
                email: row.owner_email,
                created_at: row.owner_created_at,
            },
        }
    }
}

impl From<PostWithVotesRow> for PostOut {
    fn from(row: PostWithVotesRow) -> Self {
        let votes = row.votes;
        let post = PostResponse::from(PostWithOwnerRow {
            id: row.id,
            title: row.title,
            content: row.content,
            published: row.published,
            created_at: row.created_at,
            owner_id: row.owner_id,
            owner_email: row.owner_email,
            owner_created_at: row.owner_created_at,
        });
        PostOut { post, votes }
    }
}

/// Generic acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================
// Requests
// ============================================

fn default_published() -> bool {
    true
}

/// Body of create and update. Update is a full replace: an omitted
/// `published` resets to `true`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PostCreate {
    pub title: String,
    pub content: String,
    #[serde(default = "default_published")]
    pub published: bool,
}

/// Direction of a vote: 1 adds the caller's vote, 0 removes it
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct VoteRequest {
    pub post_id: i32,
    #[validate(range(min = 0, max = 1, message = "dir must be 0 or 1"))]
    pub dir: i32,
}

impl VoteRequest {
    pub fn is_upvote(&self) -> bool {
        self.dir == 1
    }
}

/// Query string of `GET /posts/`
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPostsQuery {
    /// Maximum number of posts to return (default 10)
    #[validate(range(min = 0, message = "limit must not be negative"))]
    pub limit: Option<i64>,
    /// Number of posts to skip (default 0)
    #[validate(range(min = 0, message = "skip must not be negative"))]
    pub skip: Option<i64>,
    /// Substring the title must contain; empty matches every post
    pub search: Option<String>,
}

/// Resolved listing parameters handed to the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFilter {
    pub search: String,
    pub limit: i64,
    pub offset: i64,
    pub published_only: bool,
}
