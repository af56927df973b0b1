use axum::Router;
use axum::routing::{get, post};

use super::handlers;
use crate::UserRepository;
use crate::communities::{CommunityRepository, InviteTokenRepository};
use crate::config::TownhallConfig;

/// Repositories and configuration shared by the community handlers.
#[derive(Clone)]
pub struct CommunityState<U, C, I> {
    pub user_repo: U,
    pub community_repo: C,
    pub invite_repo: I,
    pub config: TownhallConfig,
}

impl<U, C, I> CommunityState<U, C, I> {
    /// State with the default configuration.
    pub fn new(user_repo: U, community_repo: C, invite_repo: I) -> Self {
        Self {
            user_repo,
            community_repo,
            invite_repo,
            config: TownhallConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: TownhallConfig) -> Self {
        self.config = config;
        self
    }
}

/// Creates all community routes.
///
/// Every route needs a [`Principal`](super::Principal) extension.
///
/// - `POST /` - Create a community
/// - `GET /?type=` - List communities (`PUBLIC`, `JOINED`, `CREATED`, `ALL`)
/// - `GET /{id}` - Get a community
/// - `PUT /{id}` - Rename or change privacy
/// - `DELETE /{id}` - Delete a community
/// - `POST /{id}/join` - Join a public community
/// - `POST /{id}/invites` - Issue an invite code
/// - `POST /join/{code}` - Join by invite code
pub fn community_routes<U, C, I>() -> Router<CommunityState<U, C, I>>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    C: CommunityRepository + Clone + Send + Sync + 'static,
    I: InviteTokenRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            post(handlers::create_community::<U, C, I>)
                .get(handlers::list_communities::<U, C, I>),
        )
        .route(
            "/{id}",
            get(handlers::get_community::<U, C, I>)
                .put(handlers::update_community::<U, C, I>)
                .delete(handlers::delete_community::<U, C, I>),
        )
        .route("/{id}/join", post(handlers::join_community::<U, C, I>))
        .route("/{id}/invites", post(handlers::create_invite::<U, C, I>))
        .route("/join/{code}", post(handlers::join_by_invite::<U, C, I>))
}
