/// Vote service - add or remove a user's vote on a post
use crate::db::{self, post_repo, vote_repo};
use crate::error::{AppError, Result};
use crate::models::VoteRequest;
use crate::services::user_does_not_exist;
use sqlx::PgPool;

/// What a successful vote request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Added,
    Removed,
}

impl VoteOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            VoteOutcome::Added => "successfully added vote",
            VoteOutcome::Removed => "successfully deleted vote",
        }
    }
}

pub struct VoteService {
    pool: PgPool,
}

impl VoteService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply `req` on behalf of `user_id`
    ///
    /// `dir = 1` adds the vote (409 if present), `dir = 0` removes it (404 if absent).
    pub async fn vote(&self, user_id: i32, req: &VoteRequest) -> Result<VoteOutcome> {
        let post_id = req.post_id;
        let mut tx = self.pool.begin().await?;

        if !post_repo::post_exists(&mut tx, post_id).await? {
            return Err(AppError::NotFound(format!(
                "post with id: {} does not exist",
                post_id
            )));
        }

        let outcome = if req.is_upvote() {
            match vote_repo::insert_vote(&mut tx, post_id, user_id).await {
                Ok(()) => VoteOutcome::Added,
                Err(e) if db::is_unique_violation(&e) => {
                    return Err(AppError::Conflict(format!(
                        "user {} has already voted on post {}",
                        user_id, post_id
                    )));
                }
                Err(e) if db::is_foreign_key_violation(&e) => {
                    return Err(match db::violated_constraint(&e) {
                        Some(db::VOTES_USER_FK) => user_does_not_exist(user_id),
                        _ => AppError::NotFound(format!(
                            "post with id: {} does not exist",
                            post_id
                        )),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            if vote_repo::delete_vote(&mut tx, post_id, user_id).await? == 0 {
                return Err(AppError::NotFound("vote does not exist".to_string()));
            }
            VoteOutcome::Removed
        };

        tx.commit().await?;

        tracing::info!(post_id, user_id, outcome = ?outcome, "vote applied");

        Ok(outcome)
    }
}
