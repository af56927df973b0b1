//! `SQLite` implementation of [`InviteTokenRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use super::{corrupt_row, database_error};
use crate::CommunityError;
use crate::communities::{CreateInviteToken, EntityStatus, InviteToken, InviteTokenRepository};

/// `SQLite`-backed invite token repository.
///
/// Codes are stored as issued; the `code` column is `UNIQUE`, so a race
/// between two issuers drawing the same code surfaces as a `DatabaseError`.
#[derive(Clone)]
pub struct SqliteInviteTokenRepository {
    pool: SqlitePool,
}

impl SqliteInviteTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct InviteTokenRecord {
    id: i64,
    community_id: i64,
    code: String,
    expires_at: Option<DateTime<Utc>>,
    one_time_use: bool,
    status: String,
    created_by: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<InviteTokenRecord> for InviteToken {
    type Error = CommunityError;

    fn try_from(row: InviteTokenRecord) -> Result<Self, Self::Error> {
        let status = EntityStatus::from_str(&row.status)
            .ok_or_else(|| corrupt_row("load_invite_token", "status", &row.status))?;

        Ok(InviteToken {
            id: row.id,
            community_id: row.community_id,
            code: row.code,
            expires_at: row.expires_at,
            one_time_use: row.one_time_use,
            status,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl InviteTokenRepository for SqliteInviteTokenRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, data), err))]
    async fn create(&self, data: CreateInviteToken) -> Result<InviteToken, CommunityError> {
        let row: InviteTokenRecord = sqlx::query_as(
            r"
            INSERT INTO invite_tokens (community_id, code, expires_at, one_time_use, status, created_by)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, community_id, code, expires_at, one_time_use, status, created_by, created_at
            ",
        )
        .bind(data.community_id)
        .bind(&data.code)
        .bind(data.expires_at)
        .bind(data.one_time_use)
        .bind(EntityStatus::Active.as_str())
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error("create_invite_token", e))?;

        row.try_into()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, code), err))]
    async fn find_by_code(&self, code: &str) -> Result<Option<InviteToken>, CommunityError> {
        let row: Option<InviteTokenRecord> = sqlx::query_as(
            "SELECT id, community_id, code, expires_at, one_time_use, status, created_by, created_at FROM invite_tokens WHERE code = ?",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("find_invite_token_by_code", e))?;

        row.map(TryInto::try_into).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_community(
        &self,
        community_id: i64,
    ) -> Result<Vec<InviteToken>, CommunityError> {
        let rows: Vec<InviteTokenRecord> = sqlx::query_as(
            r"
            SELECT id, community_id, code, expires_at, one_time_use, status, created_by, created_at
            FROM invite_tokens
            WHERE community_id = ?
            ORDER BY id
            ",
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("find_invite_tokens_by_community", e))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn mark_deleted(&self, id: i64) -> Result<InviteToken, CommunityError> {
        let row: Option<InviteTokenRecord> = sqlx::query_as(
            r"
            UPDATE invite_tokens SET status = ?
            WHERE id = ?
            RETURNING id, community_id, code, expires_at, one_time_use, status, created_by, created_at
            ",
        )
        .bind(EntityStatus::Deleted.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("mark_invite_token_deleted", e))?;

        row.ok_or(CommunityError::NotFound)?.try_into()
    }
}
