use std::collections::HashMap;

use crate::communities::visibility::resolve_principal;
use crate::communities::{Community, CommunityCategory, CommunityRepository, CommunitySummary};
use crate::{CommunityError, UserRepository};

/// Lists active communities by category.
///
/// | Category | Result |
/// |----------|--------|
/// | `PUBLIC` (default) | active, not private |
/// | `JOINED` | active, principal is a member |
/// | `CREATED` | active, principal is the creator |
/// | `ALL` | every active community |
///
/// Results are ordered by id.
pub struct ListCommunitiesAction<C: CommunityRepository, U: UserRepository> {
    community_repo: C,
    user_repo: U,
}

impl<C: CommunityRepository, U: UserRepository> ListCommunitiesAction<C, U> {
    pub fn new(community_repo: C, user_repo: U) -> Self {
        Self {
            community_repo,
            user_repo,
        }
    }

    /// `category` is parsed case-insensitively; `None` means `PUBLIC`.
    ///
    /// The principal is only resolved for `JOINED` and `CREATED`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_communities", skip_all, err)
    )]
    pub async fn execute(
        &self,
        category: Option<&str>,
        principal: &str,
    ) -> Result<Vec<CommunitySummary>, CommunityError> {
        let category = category
            .map(str::parse::<CommunityCategory>)
            .transpose()?
            .unwrap_or_default();

        let mut communities = self.fetch(category, principal).await?;
        communities.retain(|c| !c.is_deleted());
        communities.sort_by_key(|c| c.id);

        self.summarize(communities).await
    }

    async fn fetch(
        &self,
        category: CommunityCategory,
        principal: &str,
    ) -> Result<Vec<Community>, CommunityError> {
        match category {
            CommunityCategory::Public => {
                let mut all = self.community_repo.find_all().await?;
                all.retain(|c| !c.is_private);
                Ok(all)
            }
            CommunityCategory::All => self.community_repo.find_all().await,
            CommunityCategory::Joined => {
                let user = resolve_principal(&self.user_repo, principal).await?;
                self.community_repo.find_by_member(user.id).await
            }
            CommunityCategory::Created => {
                let user = resolve_principal(&self.user_repo, principal).await?;
                self.community_repo.find_by_creator(user.id).await
            }
        }
    }

    async fn summarize(
        &self,
        communities: Vec<Community>,
    ) -> Result<Vec<CommunitySummary>, CommunityError> {
        let mut logins: HashMap<i64, Option<String>> = HashMap::new();
        let mut summaries = Vec::with_capacity(communities.len());

        for community in communities {
            let creator_login = match logins.get(&community.creator_id) {
                Some(login) => login.clone(),
                None => {
                    let login = self
                        .user_repo
                        .find_user_by_id(community.creator_id)
                        .await?
                        .map(|u| u.login);
                    logins.insert(community.creator_id, login.clone());
                    login
                }
            };

            summaries.push(CommunitySummary {
                id: community.id,
                member_count: community.member_count(),
                name: community.name,
                creator_login,
                is_private: community.is_private,
            });
        }

        Ok(summaries)
    }
}
