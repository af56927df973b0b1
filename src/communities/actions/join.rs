use chrono::Utc;

use crate::communities::visibility::resolve_visible_community;
use crate::communities::{Community, CommunityRepository};
use crate::events::{CommunityEvent, dispatch};
use crate::{CommunityError, UserRepository};

/// Joins a public community without an invite.
pub struct JoinPublicCommunityAction<C: CommunityRepository, U: UserRepository> {
    community_repo: C,
    user_repo: U,
}

impl<C: CommunityRepository, U: UserRepository> JoinPublicCommunityAction<C, U> {
    pub fn new(community_repo: C, user_repo: U) -> Self {
        Self {
            community_repo,
            user_repo,
        }
    }

    /// # Returns
    ///
    /// - `Ok(community)` - the principal is now a member
    /// - `Err(CommunityError::AlreadyMember)` - the principal was a member already
    /// - `Err(CommunityError::PermissionDenied)` - the community is private
    /// - `Err(CommunityError::NotFound)` - no such active community
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "join_public_community", skip_all, err)
    )]
    pub async fn execute(&self, id: i64, principal: &str) -> Result<Community, CommunityError> {
        let (community, user) =
            resolve_visible_community(&self.community_repo, &self.user_repo, id, principal)
                .await?;

        if community.is_member(user.id) {
            return Err(CommunityError::AlreadyMember);
        }

        if community.is_private {
            return Err(CommunityError::PermissionDenied);
        }

        let community = self.community_repo.add_member(community.id, user.id).await?;

        dispatch(CommunityEvent::MemberJoined {
            community_id: community.id,
            user_id: user.id,
            via_invite: false,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "townhall",
            "msg=\"member joined\", community_id={}, user_id={}",
            community.id,
            user.id
        );

        Ok(community)
    }
}
