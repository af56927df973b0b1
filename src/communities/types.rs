//! Core types for communities and invite links.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CommunityError;

/// Lifecycle state shared by communities and invite tokens.
///
/// `Deleted` is terminal: nothing moves an entity back to `Active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    #[default]
    Active,
    Deleted,
}

impl EntityStatus {
    /// Convert to string for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Deleted => "DELETED",
        }
    }

    /// Parse from database string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "DELETED" => Some(Self::Deleted),
            _ => None,
        }
    }

    pub fn is_deleted(self) -> bool {
        self == Self::Deleted
    }
}

/// A named group of users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// Unique identifier.
    pub id: i64,
    /// Display name, unique among active communities.
    pub name: String,
    /// Private communities are visible to members only.
    pub is_private: bool,
    /// User who created the community.
    pub creator_id: i64,
    /// Member user ids. Always contains `creator_id`.
    pub member_ids: BTreeSet<i64>,
    /// Soft-delete marker.
    pub status: EntityStatus,
    /// When the community was created.
    pub created_at: DateTime<Utc>,
    /// When the community was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Community {
    pub fn is_deleted(&self) -> bool {
        self.status.is_deleted()
    }

    pub fn is_member(&self, user_id: i64) -> bool {
        self.member_ids.contains(&user_id)
    }

    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }

    /// Returns true if `user_id` created this community.
    pub fn is_created_by(&self, user_id: i64) -> bool {
        self.creator_id == user_id
    }
}

/// A shareable code granting membership in one community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteToken {
    /// Unique identifier.
    pub id: i64,
    /// Community the token grants access to.
    pub community_id: i64,
    /// The shareable code. Unique across all tokens, deleted ones included.
    pub code: String,
    /// Absent means the token never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Token is invalidated after its first successful use.
    pub one_time_use: bool,
    /// Soft-delete marker.
    pub status: EntityStatus,
    /// User who issued the token.
    pub created_by: i64,
    /// When the token was created.
    pub created_at: DateTime<Utc>,
}

impl InviteToken {
    pub fn is_deleted(&self) -> bool {
        self.status.is_deleted()
    }

    /// Returns true if the token expired strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Counts every stored token toward the per-community cap.
pub fn count_all_tokens(_token: &InviteToken) -> bool {
    true
}

/// Counts only tokens that are still usable.
pub fn count_active_tokens(token: &InviteToken) -> bool {
    !token.is_deleted() && !token.is_expired()
}

/// What a caller sees after issuing an invite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteTokenView {
    pub code: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub one_time_use: bool,
    pub community_id: i64,
}

impl From<&InviteToken> for InviteTokenView {
    fn from(token: &InviteToken) -> Self {
        Self {
            code: token.code.clone(),
            expires_at: token.expires_at,
            one_time_use: token.one_time_use,
            community_id: token.community_id,
        }
    }
}

/// One row of a community listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunitySummary {
    pub id: i64,
    pub name: String,
    /// Login of the creator, if the creator can still be resolved.
    pub creator_login: Option<String>,
    pub is_private: bool,
    pub member_count: usize,
}

/// Filter applied by the community listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommunityCategory {
    /// Every active community that is not private.
    #[default]
    Public,
    /// Active communities the principal belongs to.
    Joined,
    /// Active communities the principal created.
    Created,
    /// Every active community, private ones included.
    All,
}

impl CommunityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Joined => "JOINED",
            Self::Created => "CREATED",
            Self::All => "ALL",
        }
    }

    /// Returns true if listing this category needs a resolved principal.
    pub fn needs_principal(self) -> bool {
        matches!(self, Self::Joined | Self::Created)
    }
}

impl FromStr for CommunityCategory {
    type Err = CommunityError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(Self::Public),
            "JOINED" => Ok(Self::Joined),
            "CREATED" => Ok(Self::Created),
            "ALL" => Ok(Self::All),
            _ => Err(CommunityError::InvalidCategory(s.to_owned())),
        }
    }
}

/// Partial update applied to a community.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityPatch {
    pub name: Option<String>,
    pub is_private: Option<bool>,
}

impl CommunityPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_private.is_none()
    }
}
