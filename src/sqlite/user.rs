use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use super::{corrupt_row, database_error};
use crate::{CommunityError, Role, User, UserRepository};

/// `SQLite`-backed user lookup.
///
/// The engine only reads users. [`Self::create_user`] exists for seeding and
/// for applications that keep their accounts in the same database.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn create_user(&self, login: &str, role: Role) -> Result<User, CommunityError> {
        let row: UserRecord = sqlx::query_as(
            "INSERT INTO users (login, role) VALUES (?, ?) RETURNING id, login, role, created_at",
        )
        .bind(login)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error("create_user", e))?;

        row.try_into()
    }
}

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    login: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = CommunityError;

    fn try_from(row: UserRecord) -> Result<Self, Self::Error> {
        let role =
            Role::from_str(&row.role).ok_or_else(|| corrupt_row("load_user", "role", &row.role))?;

        Ok(User {
            id: row.id,
            login: row.login,
            role,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, CommunityError> {
        let row: Option<UserRecord> =
            sqlx::query_as("SELECT id, login, role, created_at FROM users WHERE login = ?")
                .bind(login)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| database_error("find_user_by_login", e))?;

        row.map(TryInto::try_into).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, CommunityError> {
        let row: Option<UserRecord> =
            sqlx::query_as("SELECT id, login, role, created_at FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| database_error("find_user_by_id", e))?;

        row.map(TryInto::try_into).transpose()
    }
}
