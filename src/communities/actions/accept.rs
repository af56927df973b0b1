use chrono::Utc;

use crate::communities::visibility::resolve_principal;
use crate::communities::{Community, CommunityRepository, InviteToken, InviteTokenRepository};
use crate::events::{CommunityEvent, InvalidationReason, dispatch};
use crate::{CommunityError, UserRepository};

/// Joins a community through an invite code.
///
/// Works for private communities too. Missing, deleted and expired codes all
/// fail with the same `CommunityError::NotFound`.
pub struct JoinByInviteAction<I, C, U>
where
    I: InviteTokenRepository,
    C: CommunityRepository,
    U: UserRepository,
{
    invite_repo: I,
    community_repo: C,
    user_repo: U,
}

impl<I, C, U> JoinByInviteAction<I, C, U>
where
    I: InviteTokenRepository,
    C: CommunityRepository,
    U: UserRepository,
{
    pub fn new(invite_repo: I, community_repo: C, user_repo: U) -> Self {
        Self {
            invite_repo,
            community_repo,
            user_repo,
        }
    }

    /// An expired code is marked deleted on the way out. A one-time code is
    /// marked deleted before the member is added; if that fails the join
    /// fails with it.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "join_by_invite", skip_all, err)
    )]
    pub async fn execute(&self, code: &str, principal: &str) -> Result<Community, CommunityError> {
        let token = self
            .invite_repo
            .find_by_code(code)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or(CommunityError::NotFound)?;

        if token.is_expired() {
            self.invalidate(&token, InvalidationReason::Expired).await?;
            return Err(CommunityError::NotFound);
        }

        let user = resolve_principal(&self.user_repo, principal).await?;

        let community = self
            .community_repo
            .find_by_id(token.community_id)
            .await?
            .filter(|c| !c.is_deleted())
            .ok_or(CommunityError::NotFound)?;

        if community.is_member(user.id) {
            return Err(CommunityError::AlreadyMember);
        }

        // consumed before the membership write, so a code that cannot be
        // retired never admits anyone
        if token.one_time_use {
            self.invalidate(&token, InvalidationReason::Consumed).await?;
        }

        let community = self.community_repo.add_member(community.id, user.id).await?;

        dispatch(CommunityEvent::MemberJoined {
            community_id: community.id,
            user_id: user.id,
            via_invite: true,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "townhall",
            "msg=\"member joined by invite\", community_id={}, user_id={}, token_id={}",
            community.id,
            user.id,
            token.id
        );

        Ok(community)
    }

    async fn invalidate(
        &self,
        token: &InviteToken,
        reason: InvalidationReason,
    ) -> Result<(), CommunityError> {
        self.invite_repo.mark_deleted(token.id).await?;

        dispatch(CommunityEvent::InviteInvalidated {
            token_id: token.id,
            community_id: token.community_id,
            reason,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "townhall",
            "msg=\"invite invalidated\", token_id={}, reason=\"{}\"",
            token.id,
            reason.as_str()
        );

        Ok(())
    }
}
