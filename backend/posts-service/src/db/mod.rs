/// Database access layer
///
/// Plain functions over `sqlx`. Reads take the pool; functions that run inside
/// a caller-owned transaction take `&mut PgConnection`.
pub mod post_repo;
pub mod user_repo;
pub mod vote_repo;

use sqlx::migrate::Migrator;

/// Migrations embedded from `backend/posts-service/migrations`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Postgres SQLSTATE codes the services react to
pub const UNIQUE_VIOLATION: &str = "23505";
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Foreign keys named in the migrations
pub const POSTS_OWNER_FK: &str = "posts_owner_id_fkey";
pub const VOTES_USER_FK: &str = "votes_user_id_fkey";

fn has_sql_state(err: &sqlx::Error, state: &str) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(state)
    )
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    has_sql_state(err, UNIQUE_VIOLATION)
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    has_sql_state(err, FOREIGN_KEY_VIOLATION)
}

/// Name of the constraint a database error reports, if any
pub fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}
