use chrono::Utc;

use crate::communities::visibility::resolve_visible_community;
use crate::communities::{CommunityRepository, EntityStatus};
use crate::events::{CommunityEvent, dispatch};
use crate::{CommunityError, UserRepository};

/// How a community was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// The record, its memberships and its tokens were removed.
    Hard,
    /// The record was kept and marked deleted.
    Soft,
}

/// Deletes a community.
///
/// Administrators remove the record outright. The creator marks it deleted,
/// which keeps it counting toward their creation quota.
pub struct DeleteCommunityAction<C: CommunityRepository, U: UserRepository> {
    community_repo: C,
    user_repo: U,
}

impl<C: CommunityRepository, U: UserRepository> DeleteCommunityAction<C, U> {
    pub fn new(community_repo: C, user_repo: U) -> Self {
        Self {
            community_repo,
            user_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "delete_community", skip_all, err)
    )]
    pub async fn execute(&self, id: i64, principal: &str) -> Result<Deletion, CommunityError> {
        let (community, user) =
            resolve_visible_community(&self.community_repo, &self.user_repo, id, principal)
                .await?;

        let deletion = if user.role.is_administrator() {
            self.community_repo.delete(community.id).await?;
            Deletion::Hard
        } else if community.is_created_by(user.id) {
            self.community_repo
                .set_status(community.id, EntityStatus::Deleted)
                .await?;
            Deletion::Soft
        } else {
            log::warn!(
                target: "townhall",
                "msg=\"delete denied\", community_id={}, user_id={}",
                community.id,
                user.id
            );
            return Err(CommunityError::PermissionDenied);
        };

        dispatch(CommunityEvent::CommunityDeleted {
            community_id: community.id,
            user_id: user.id,
            hard: deletion == Deletion::Hard,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "townhall",
            "msg=\"community deleted\", community_id={}, user_id={}, mode={:?}",
            community.id,
            user.id,
            deletion
        );

        Ok(deletion)
    }
}
