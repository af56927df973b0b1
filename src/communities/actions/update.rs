use chrono::Utc;

use crate::communities::visibility::resolve_visible_community;
use crate::communities::{Community, CommunityPatch, CommunityRepository};
use crate::events::{CommunityEvent, dispatch};
use crate::{CommunityError, UserRepository};

/// Renames a community or changes its privacy.
///
/// Only the creator or an administrator may update. Nothing is written when
/// the caller is denied. A new name is not checked against other communities.
pub struct UpdateCommunityAction<C: CommunityRepository, U: UserRepository> {
    community_repo: C,
    user_repo: U,
}

impl<C: CommunityRepository, U: UserRepository> UpdateCommunityAction<C, U> {
    pub fn new(community_repo: C, user_repo: U) -> Self {
        Self {
            community_repo,
            user_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_community", skip_all, err)
    )]
    pub async fn execute(
        &self,
        id: i64,
        patch: CommunityPatch,
        principal: &str,
    ) -> Result<Community, CommunityError> {
        let (community, user) =
            resolve_visible_community(&self.community_repo, &self.user_repo, id, principal)
                .await?;

        if !user.role.is_administrator() && !community.is_created_by(user.id) {
            log::warn!(
                target: "townhall",
                "msg=\"update denied\", community_id={}, user_id={}",
                community.id,
                user.id
            );
            return Err(CommunityError::PermissionDenied);
        }

        let updated = self
            .community_repo
            .update(community.id, patch.name.as_deref(), patch.is_private)
            .await?;

        dispatch(CommunityEvent::CommunityUpdated {
            community_id: updated.id,
            user_id: user.id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "townhall",
            "msg=\"community updated\", community_id={}, user_id={}",
            updated.id,
            user.id
        );

        Ok(updated)
    }
}
