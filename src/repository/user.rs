use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;
use crate::CommunityError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[cfg(any(test, feature = "mocks"))]
impl User {
    pub fn mock(id: i64, login: &str, role: Role) -> Self {
        User {
            id,
            login: login.to_owned(),
            role,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, CommunityError>;
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, CommunityError>;
}
