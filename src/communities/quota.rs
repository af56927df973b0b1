//! Community creation quota.

use super::repository::CommunityRepository;
use crate::config::QuotaConfig;
use crate::{CommunityError, Role, User};

/// Decides whether a user may create another community.
///
/// Every user may create their first community. Beyond that, only users
/// satisfying [`Role::QUOTA_TIER`] may create more, up to
/// [`QuotaConfig::max_communities`].
#[derive(Debug, Clone, Default)]
pub struct QuotaEnforcer {
    config: QuotaConfig,
}

impl QuotaEnforcer {
    pub fn new(config: QuotaConfig) -> Self {
        Self { config }
    }

    /// Pure decision given how many communities `principal` has created.
    pub fn can_create(&self, principal: &User, created_count: usize) -> bool {
        if created_count == 0 {
            return true;
        }

        Role::QUOTA_TIER.is_satisfied_by(principal.role)
            && created_count < self.config.max_communities
    }

    /// Counts the principal's communities, soft-deleted ones included, and
    /// applies [`Self::can_create`].
    pub async fn allows<C>(&self, communities: &C, principal: &User) -> Result<bool, CommunityError>
    where
        C: CommunityRepository + ?Sized,
    {
        let created = communities.find_by_creator(principal.id).await?.len();
        Ok(self.can_create(principal, created))
    }
}
