#![allow(clippy::significant_drop_tightening)]

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use super::repository::{
    CommunityRepository, CreateCommunity, CreateInviteToken, InviteTokenRepository,
};
use super::types::{Community, EntityStatus, InviteToken};
use crate::CommunityError;

fn poisoned<T>(_: T) -> CommunityError {
    CommunityError::Internal("lock poisoned".into())
}

/// In-memory [`CommunityRepository`]. Clones share the same storage.
#[derive(Clone)]
pub struct MockCommunityRepository {
    communities: Arc<RwLock<HashMap<i64, Community>>>,
    next_id: Arc<AtomicI64>,
    tokens: Option<MockInviteTokenRepository>,
}

impl MockCommunityRepository {
    pub fn new() -> Self {
        Self {
            communities: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            tokens: None,
        }
    }

    /// Cascades hard deletes to `tokens`, like the foreign key in SQL stores.
    pub fn with_tokens(tokens: MockInviteTokenRepository) -> Self {
        Self {
            tokens: Some(tokens),
            ..Self::new()
        }
    }

    fn collect<F>(&self, filter: F) -> Result<Vec<Community>, CommunityError>
    where
        F: Fn(&Community) -> bool,
    {
        let communities = self.communities.read().map_err(poisoned)?;
        let mut found: Vec<Community> = communities.values().filter(|c| filter(c)).cloned().collect();
        found.sort_by_key(|c| c.id);
        Ok(found)
    }

    fn modify<F>(&self, id: i64, change: F) -> Result<Community, CommunityError>
    where
        F: FnOnce(&mut Community),
    {
        let mut communities = self.communities.write().map_err(poisoned)?;
        let community = communities.get_mut(&id).ok_or(CommunityError::NotFound)?;
        change(community);
        community.updated_at = Utc::now();
        Ok(community.clone())
    }
}

impl Default for MockCommunityRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommunityRepository for MockCommunityRepository {
    async fn create(&self, data: CreateCommunity) -> Result<Community, CommunityError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let community = Community {
            id,
            name: data.name,
            is_private: data.is_private,
            creator_id: data.creator_id,
            member_ids: BTreeSet::from([data.creator_id]),
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let mut communities = self.communities.write().map_err(poisoned)?;
        communities.insert(id, community.clone());

        Ok(community)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Community>, CommunityError> {
        let communities = self.communities.read().map_err(poisoned)?;
        Ok(communities.get(&id).cloned())
    }

    async fn find_active_by_name(&self, name: &str) -> Result<Option<Community>, CommunityError> {
        let communities = self.communities.read().map_err(poisoned)?;
        Ok(communities
            .values()
            .find(|c| c.name == name && !c.is_deleted())
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Community>, CommunityError> {
        self.collect(|_| true)
    }

    async fn find_by_creator(&self, creator_id: i64) -> Result<Vec<Community>, CommunityError> {
        self.collect(|c| c.creator_id == creator_id)
    }

    async fn find_by_member(&self, user_id: i64) -> Result<Vec<Community>, CommunityError> {
        self.collect(|c| c.is_member(user_id))
    }

    async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        is_private: Option<bool>,
    ) -> Result<Community, CommunityError> {
        self.modify(id, |community| {
            if let Some(n) = name {
                n.clone_into(&mut community.name);
            }
            if let Some(p) = is_private {
                community.is_private = p;
            }
        })
    }

    async fn add_member(&self, id: i64, user_id: i64) -> Result<Community, CommunityError> {
        self.modify(id, |community| {
            community.member_ids.insert(user_id);
        })
    }

    async fn set_status(
        &self,
        id: i64,
        status: EntityStatus,
    ) -> Result<Community, CommunityError> {
        self.modify(id, |community| community.status = status)
    }

    async fn delete(&self, id: i64) -> Result<(), CommunityError> {
        let mut communities = self.communities.write().map_err(poisoned)?;
        communities.remove(&id);
        drop(communities);

        if let Some(tokens) = &self.tokens {
            tokens.remove_for_community(id)?;
        }
        Ok(())
    }
}

/// In-memory [`InviteTokenRepository`]. Rejects duplicate codes.
#[derive(Clone)]
pub struct MockInviteTokenRepository {
    tokens: Arc<RwLock<HashMap<i64, InviteToken>>>,
    next_id: Arc<AtomicI64>,
}

impl MockInviteTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Stores `token` as-is, keeping its id. Used to seed fixtures.
    pub fn insert(&self, token: InviteToken) -> Result<(), CommunityError> {
        let mut tokens = self.tokens.write().map_err(poisoned)?;
        self.next_id.fetch_max(token.id + 1, Ordering::SeqCst);
        tokens.insert(token.id, token);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tokens.read().map(|t| t.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove_for_community(&self, community_id: i64) -> Result<(), CommunityError> {
        let mut tokens = self.tokens.write().map_err(poisoned)?;
        tokens.retain(|_, t| t.community_id != community_id);
        Ok(())
    }
}

impl Default for MockInviteTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InviteTokenRepository for MockInviteTokenRepository {
    async fn create(&self, data: CreateInviteToken) -> Result<InviteToken, CommunityError> {
        let mut tokens = self.tokens.write().map_err(poisoned)?;
        if tokens.values().any(|t| t.code == data.code) {
            return Err(CommunityError::DatabaseError(
                "UNIQUE constraint failed: invite_tokens.code".into(),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let token = InviteToken {
            id,
            community_id: data.community_id,
            code: data.code,
            expires_at: data.expires_at,
            one_time_use: data.one_time_use,
            status: EntityStatus::Active,
            created_by: data.created_by,
            created_at: Utc::now(),
        };
        tokens.insert(id, token.clone());

        Ok(token)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<InviteToken>, CommunityError> {
        let tokens = self.tokens.read().map_err(poisoned)?;
        Ok(tokens.values().find(|t| t.code == code).cloned())
    }

    async fn find_by_community(
        &self,
        community_id: i64,
    ) -> Result<Vec<InviteToken>, CommunityError> {
        let tokens = self.tokens.read().map_err(poisoned)?;
        let mut found: Vec<InviteToken> = tokens
            .values()
            .filter(|t| t.community_id == community_id)
            .cloned()
            .collect();
        found.sort_by_key(|t| t.id);
        Ok(found)
    }

    async fn mark_deleted(&self, id: i64) -> Result<InviteToken, CommunityError> {
        let mut tokens = self.tokens.write().map_err(poisoned)?;
        let token = tokens.get_mut(&id).ok_or(CommunityError::NotFound)?;
        token.status = EntityStatus::Deleted;
        Ok(token.clone())
    }
}
