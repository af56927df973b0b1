//! Axum router over the community actions.
//!
//! ```rust,ignore
//! use townhall::api::axum::{CommunityState, community_routes};
//!
//! let app = Router::new()
//!     .nest("/communities", community_routes())
//!     .layer(from_fn(my_auth_layer)) // inserts a `Principal` extension
//!     .with_state(CommunityState::new(users, communities, invites));
//! ```

mod error;
mod extract;
mod handlers;
mod middleware;
mod routes;

pub use error::AppError;
pub use extract::{ApiJson, ApiPath, InvalidRequest};
pub use middleware::{PRINCIPAL_HEADER, Principal, trusted_principal_header};
pub use routes::{CommunityState, community_routes};
