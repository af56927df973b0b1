use chrono::Utc;

use crate::communities::quota::QuotaEnforcer;
use crate::communities::visibility::resolve_principal;
use crate::communities::{Community, CommunityRepository, CreateCommunity};
use crate::config::QuotaConfig;
use crate::events::{CommunityEvent, dispatch};
use crate::{CommunityError, UserRepository};

/// Creates a community with the principal as creator and first member.
pub struct CreateCommunityAction<C: CommunityRepository, U: UserRepository> {
    community_repo: C,
    user_repo: U,
    quota: QuotaEnforcer,
}

impl<C: CommunityRepository, U: UserRepository> CreateCommunityAction<C, U> {
    /// Creates a new `CreateCommunityAction` with the default quota.
    pub fn new(community_repo: C, user_repo: U) -> Self {
        Self::with_config(community_repo, user_repo, QuotaConfig::default())
    }

    pub fn with_config(community_repo: C, user_repo: U, quota: QuotaConfig) -> Self {
        Self {
            community_repo,
            user_repo,
            quota: QuotaEnforcer::new(quota),
        }
    }

    /// # Returns
    ///
    /// - `Ok(community)` - created, active, with the principal as sole member
    /// - `Err(CommunityError::UserNotFound)` - principal does not resolve
    /// - `Err(CommunityError::PermissionDenied)` - creation quota exhausted
    /// - `Err(CommunityError::AlreadyExists)` - an active community has this name
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_community", skip_all, err)
    )]
    pub async fn execute(
        &self,
        name: &str,
        is_private: bool,
        principal: &str,
    ) -> Result<Community, CommunityError> {
        let user = resolve_principal(&self.user_repo, principal).await?;

        if !self.quota.allows(&self.community_repo, &user).await? {
            log::warn!(
                target: "townhall",
                "msg=\"community quota exhausted\", user_id={}, role=\"{}\"",
                user.id,
                user.role.as_str()
            );
            return Err(CommunityError::PermissionDenied);
        }

        if self
            .community_repo
            .find_active_by_name(name)
            .await?
            .is_some()
        {
            return Err(CommunityError::AlreadyExists);
        }

        let community = self
            .community_repo
            .create(CreateCommunity {
                name: name.to_owned(),
                is_private,
                creator_id: user.id,
            })
            .await?;

        dispatch(CommunityEvent::CommunityCreated {
            community_id: community.id,
            creator_id: user.id,
            name: community.name.clone(),
            is_private,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "townhall",
            "msg=\"community created\", community_id={}, creator_id={}, private={}",
            community.id,
            user.id,
            is_private
        );

        Ok(community)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communities::{EntityStatus, MockCommunityRepository};
    use crate::{MockUserRepository, Role};

    fn setup() -> (MockCommunityRepository, MockUserRepository) {
        let users = MockUserRepository::new();
        users.insert("alice", Role::Ordinary);
        users.insert("carol", Role::Privileged);
        (MockCommunityRepository::new(), users)
    }

    #[tokio::test]
    async fn test_create_community_success() {
        let (communities, users) = setup();
        let action = CreateCommunityAction::new(communities, users);

        let community = action.execute("Runners", false, "alice").await.unwrap();

        assert_eq!(community.name, "Runners");
        assert!(!community.is_private);
        assert_eq!(community.status, EntityStatus::Active);
        assert_eq!(community.member_ids.len(), 1);
        assert!(community.is_member(community.creator_id));
    }

    #[tokio::test]
    async fn test_ordinary_user_limited_to_one() {
        let (communities, users) = setup();
        let action = CreateCommunityAction::new(communities, users);

        action.execute("Runners", false, "alice").await.unwrap();
        let result = action.execute("Cyclists", false, "alice").await;

        assert_eq!(result.unwrap_err(), CommunityError::PermissionDenied);
    }

    #[tokio::test]
    async fn test_soft_deleted_community_still_counts() {
        let (communities, users) = setup();
        let action = CreateCommunityAction::new(communities.clone(), users);

        let first = action.execute("Runners", false, "alice").await.unwrap();
        communities
            .set_status(first.id, EntityStatus::Deleted)
            .await
            .unwrap();

        let result = action.execute("Cyclists", false, "alice").await;
        assert_eq!(result.unwrap_err(), CommunityError::PermissionDenied);
    }

    #[tokio::test]
    async fn test_privileged_user_up_to_max() {
        let (communities, users) = setup();
        let action =
            CreateCommunityAction::with_config(communities, users, QuotaConfig { max_communities: 2 });

        action.execute("One", false, "carol").await.unwrap();
        action.execute("Two", false, "carol").await.unwrap();
        let result = action.execute("Three", false, "carol").await;

        assert_eq!(result.unwrap_err(), CommunityError::PermissionDenied);
    }

    #[tokio::test]
    async fn test_duplicate_active_name() {
        let (communities, users) = setup();
        let action = CreateCommunityAction::new(communities, users);

        action.execute("Runners", false, "alice").await.unwrap();
        let result = action.execute("Runners", true, "carol").await;

        assert_eq!(result.unwrap_err(), CommunityError::AlreadyExists);
    }

    #[tokio::test]
    async fn test_name_of_deleted_community_is_reusable() {
        let (communities, users) = setup();
        let action = CreateCommunityAction::new(communities.clone(), users);

        let first = action.execute("Runners", false, "alice").await.unwrap();
        communities
            .set_status(first.id, EntityStatus::Deleted)
            .await
            .unwrap();

        let second = action.execute("Runners", false, "carol").await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_unknown_principal() {
        let (communities, users) = setup();
        let action = CreateCommunityAction::new(communities, users);

        let result = action.execute("Runners", false, "mallory").await;
        assert_eq!(result.unwrap_err(), CommunityError::UserNotFound);
    }
}
