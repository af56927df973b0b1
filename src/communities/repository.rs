use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::{Community, EntityStatus, InviteToken};
use crate::CommunityError;

#[derive(Debug, Clone)]
pub struct CreateCommunity {
    pub name: String,
    pub is_private: bool,
    pub creator_id: i64,
}

#[derive(Debug, Clone)]
pub struct CreateInviteToken {
    pub community_id: i64,
    pub code: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub one_time_use: bool,
    pub created_by: i64,
}

/// Storage for communities and their member sets.
///
/// `create` must store the creator as the first member in the same write.
/// Mutating methods return `CommunityError::NotFound` for an unknown id.
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    async fn create(&self, data: CreateCommunity) -> Result<Community, CommunityError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Community>, CommunityError>;
    async fn find_active_by_name(&self, name: &str) -> Result<Option<Community>, CommunityError>;
    async fn find_all(&self) -> Result<Vec<Community>, CommunityError>;
    /// Includes soft-deleted communities.
    async fn find_by_creator(&self, creator_id: i64) -> Result<Vec<Community>, CommunityError>;
    async fn find_by_member(&self, user_id: i64) -> Result<Vec<Community>, CommunityError>;
    async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        is_private: Option<bool>,
    ) -> Result<Community, CommunityError>;
    /// Adding an existing member is a no-op.
    async fn add_member(&self, id: i64, user_id: i64) -> Result<Community, CommunityError>;
    async fn set_status(&self, id: i64, status: EntityStatus)
    -> Result<Community, CommunityError>;
    /// Removes the community, its memberships and its invite tokens.
    async fn delete(&self, id: i64) -> Result<(), CommunityError>;
}

#[async_trait]
pub trait InviteTokenRepository: Send + Sync {
    async fn create(&self, data: CreateInviteToken) -> Result<InviteToken, CommunityError>;
    /// Returns deleted tokens too.
    async fn find_by_code(&self, code: &str) -> Result<Option<InviteToken>, CommunityError>;
    async fn find_by_community(
        &self,
        community_id: i64,
    ) -> Result<Vec<InviteToken>, CommunityError>;
    async fn mark_deleted(&self, id: i64) -> Result<InviteToken, CommunityError>;
}
