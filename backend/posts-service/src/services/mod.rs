/// Business logic layer
pub mod posts;
pub mod votes;

pub use posts::PostService;
pub use votes::{VoteOutcome, VoteService};

use crate::error::AppError;
use std::fmt::Display;

/// A referenced user row is gone (e.g. deleted while its token is still valid)
pub fn user_does_not_exist(user_id: impl Display) -> AppError {
    AppError::NotFound(format!("user with id: {} does not exist", user_id))
}
