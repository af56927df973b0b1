use crate::communities::visibility::resolve_visible_community;
use crate::communities::{Community, CommunityRepository};
use crate::{CommunityError, UserRepository};

pub struct GetCommunityAction<C: CommunityRepository, U: UserRepository> {
    community_repo: C,
    user_repo: U,
}

impl<C: CommunityRepository, U: UserRepository> GetCommunityAction<C, U> {
    pub fn new(community_repo: C, user_repo: U) -> Self {
        Self {
            community_repo,
            user_repo,
        }
    }

    /// Fetches a community visible to `principal`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "get_community", skip_all, err)
    )]
    pub async fn execute(&self, id: i64, principal: &str) -> Result<Community, CommunityError> {
        let (community, _) =
            resolve_visible_community(&self.community_repo, &self.user_repo, id, principal)
                .await?;
        Ok(community)
    }
}
