use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CommunityError;
use crate::communities::{Community, CommunityPatch, CreateInviteInput};

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct CreateCommunityRequest {
    pub name: String,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCommunityRequest {
    pub name: Option<String>,
    pub is_private: Option<bool>,
}

impl From<UpdateCommunityRequest> for CommunityPatch {
    fn from(body: UpdateCommunityRequest) -> Self {
        CommunityPatch {
            name: body.name,
            is_private: body.is_private,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateInviteRequest {
    /// e.g. `2018-05-05T11:50:55.1234`; blank or absent never expires.
    pub expires_at: Option<String>,
    pub one_time_use: Option<bool>,
}

impl CreateInviteRequest {
    pub fn into_input(self, community_id: i64) -> CreateInviteInput {
        CreateInviteInput {
            community_id,
            expires_at: self.expires_at,
            one_time_use: self.one_time_use,
        }
    }
}

/// Query string of `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct ListCommunitiesQuery {
    #[serde(rename = "type")]
    pub category: Option<String>,
}

// Response DTOs

#[derive(Debug, Serialize)]
pub struct CommunityResponse {
    pub id: i64,
    pub name: String,
    pub is_private: bool,
    pub creator_id: i64,
    pub member_ids: Vec<i64>,
    pub member_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Community> for CommunityResponse {
    fn from(community: Community) -> Self {
        CommunityResponse {
            id: community.id,
            member_count: community.member_count(),
            name: community.name,
            is_private: community.is_private,
            creator_id: community.creator_id,
            member_ids: community.member_ids.into_iter().collect(),
            created_at: community.created_at,
            updated_at: community.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<CommunityError> for ErrorResponse {
    fn from(err: CommunityError) -> Self {
        let code = match &err {
            CommunityError::NotFound => "NOT_FOUND",
            CommunityError::PermissionDenied => "PERMISSION_DENIED",
            CommunityError::AlreadyExists => "ALREADY_EXISTS",
            CommunityError::AlreadyMember => "ALREADY_MEMBER",
            CommunityError::InvalidCategory(_) => "INVALID_CATEGORY",
            CommunityError::TooManyTokens => "TOO_MANY_TOKENS",
            CommunityError::InvalidTimestamp(_) => "INVALID_TIMESTAMP",
            CommunityError::EmptyDatabase => "EMPTY_DATABASE",
            CommunityError::UserNotFound => "USER_NOT_FOUND",
            CommunityError::DatabaseError(_) => "DATABASE_ERROR",
            CommunityError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            CommunityError::Internal(_) => "INTERNAL_ERROR",
        };

        ErrorResponse {
            error: err.to_string(),
            code: code.to_owned(),
        }
    }
}
