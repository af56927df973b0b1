//! Community membership and invitation authorization engine.
//!
//! `townhall` decides who may create, view, join, modify or delete a
//! community, and manages the invite codes that grant membership. Storage is
//! pluggable: implement [`UserRepository`], [`communities::CommunityRepository`]
//! and [`communities::InviteTokenRepository`] for your database, or enable one
//! of the bundled backends.
//!
//! # Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `mocks` | In-memory repositories for tests and prototyping |
//! | `sqlx_sqlite` | `SQLite` repositories and embedded migrations |
//! | `axum_api` | Axum router exposing every operation over HTTP |
//! | `tracing` | Spans on actions and store calls, plus [`events::listeners::TracingListener`] |
//!
//! # Example
//!
//! ```rust,ignore
//! use townhall::communities::{CreateCommunityAction, JoinPublicCommunityAction};
//! use townhall::config::TownhallConfig;
//!
//! let config = TownhallConfig::from_env()?;
//! let create = CreateCommunityAction::with_config(communities, users, config.quota);
//! let runners = create.execute("Runners", false, "alice").await?;
//! ```

use std::fmt;

pub mod communities;
pub mod config;
pub mod crypto;
pub mod events;
pub mod repository;

#[cfg(feature = "axum_api")]
pub mod api;

#[cfg(feature = "sqlx_sqlite")]
pub mod sqlite;

pub use events::register_event_listeners;
pub use repository::{Role, RoleRequirement, User, UserRepository};

#[cfg(any(test, feature = "mocks"))]
pub use repository::MockUserRepository;

/// Every failure the engine and its collaborators can report.
///
/// Only the variant is contractual; messages are for humans.
#[derive(Debug, Clone, PartialEq)]
pub enum CommunityError {
    /// The community or invite does not exist, or was deleted.
    NotFound,
    /// The caller is authenticated but not allowed to do this.
    PermissionDenied,
    /// A live community already uses the requested name.
    AlreadyExists,
    /// The caller already belongs to the community.
    AlreadyMember,
    /// The listing category was not recognised.
    InvalidCategory(String),
    /// The community has reached its invite cap.
    TooManyTokens,
    /// The expiry string could not be parsed.
    InvalidTimestamp(String),
    /// The user store holds no users at all.
    EmptyDatabase,
    /// The principal's login does not resolve to a user.
    UserNotFound,
    DatabaseError(String),
    ConfigurationError(String),
    Internal(String),
}

impl std::error::Error for CommunityError {}

impl fmt::Display for CommunityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "Community or invite not found"),
            Self::PermissionDenied => write!(f, "Permission denied"),
            Self::AlreadyExists => write!(f, "A community with this name already exists"),
            Self::AlreadyMember => write!(f, "User is already a member of this community"),
            Self::InvalidCategory(category) => {
                write!(f, "Unsupported community category: {category}")
            }
            Self::TooManyTokens => write!(f, "Community has too many invite links"),
            Self::InvalidTimestamp(value) => write!(
                f,
                "Invalid timestamp \"{value}\" (expected e.g. 2018-05-05T11:50:55.1234)"
            ),
            Self::EmptyDatabase => write!(f, "User database is empty"),
            Self::UserNotFound => write!(f, "User not found"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_details() {
        let err = CommunityError::InvalidCategory("friends".to_owned());
        assert_eq!(err.to_string(), "Unsupported community category: friends");

        let err = CommunityError::InvalidTimestamp("yesterday".to_owned());
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_errors_compare_by_kind_and_payload() {
        assert_eq!(CommunityError::NotFound, CommunityError::NotFound);
        assert_ne!(
            CommunityError::DatabaseError("a".to_owned()),
            CommunityError::DatabaseError("b".to_owned())
        );
    }
}
