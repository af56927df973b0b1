//! `SQLite` implementations of the repository traits.
//!
//! Enable the `sqlx_sqlite` feature to use these implementations, and call
//! [`migrations::run`] before first use.

mod community;
mod invite;
pub mod migrations;
mod user;

pub use community::SqliteCommunityRepository;
pub use invite::SqliteInviteTokenRepository;
use sqlx::SqlitePool;
pub use user::SqliteUserRepository;

use crate::CommunityError;

/// Creates every `SQLite` repository from one connection pool.
pub fn create_repositories(
    pool: SqlitePool,
) -> (
    SqliteUserRepository,
    SqliteCommunityRepository,
    SqliteInviteTokenRepository,
) {
    (
        SqliteUserRepository::new(pool.clone()),
        SqliteCommunityRepository::new(pool.clone()),
        SqliteInviteTokenRepository::new(pool),
    )
}

fn database_error(operation: &str, e: sqlx::Error) -> CommunityError {
    log::error!(
        target: "townhall",
        "msg=\"database error\", operation=\"{operation}\", error=\"{e}\""
    );
    CommunityError::DatabaseError(e.to_string())
}

fn corrupt_row(operation: &str, column: &str, value: &str) -> CommunityError {
    log::error!(
        target: "townhall",
        "msg=\"unreadable row\", operation=\"{operation}\", column=\"{column}\", value=\"{value}\""
    );
    CommunityError::DatabaseError(format!("unexpected {column} value: {value}"))
}
