#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::CommunityError;

use super::role::Role;
use super::user::{User, UserRepository};

#[derive(Clone)]
pub struct MockUserRepository {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Adds a user with the next free id and returns it.
    pub fn insert(&self, login: &str, role: Role) -> User {
        let mut users = self.users.lock().unwrap();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User::mock(id, login, role);
        users.push(user.clone());
        drop(users);

        user
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, CommunityError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.login == login).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, CommunityError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}
