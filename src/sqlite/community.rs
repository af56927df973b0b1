//! `SQLite` implementation of [`CommunityRepository`].

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use super::{corrupt_row, database_error};
use crate::CommunityError;
use crate::communities::{Community, CommunityRepository, CreateCommunity, EntityStatus};

const COLUMNS: &str = "id, name, is_private, creator_id, status, created_at, updated_at";

/// `SQLite`-backed community repository.
///
/// Members live in `community_members`; every returned [`Community`] carries
/// its full member set.
#[derive(Clone)]
pub struct SqliteCommunityRepository {
    pool: SqlitePool,
}

impl SqliteCommunityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn members(&self, community_id: i64) -> Result<BTreeSet<i64>, CommunityError> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT user_id FROM community_members WHERE community_id = ?")
                .bind(community_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| database_error("find_community_members", e))?;

        Ok(ids.into_iter().collect())
    }

    async fn hydrate(&self, row: CommunityRecord) -> Result<Community, CommunityError> {
        let members = self.members(row.id).await?;
        row.into_community(members)
    }

    async fn hydrate_all(&self, rows: Vec<CommunityRecord>) -> Result<Vec<Community>, CommunityError> {
        let mut communities = Vec::with_capacity(rows.len());
        for row in rows {
            communities.push(self.hydrate(row).await?);
        }
        Ok(communities)
    }

    async fn fetch_many(
        &self,
        operation: &str,
        sql: &str,
        bind: Option<i64>,
    ) -> Result<Vec<Community>, CommunityError> {
        let mut query = sqlx::query_as::<_, CommunityRecord>(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error(operation, e))?;

        self.hydrate_all(rows).await
    }
}

#[derive(FromRow)]
struct CommunityRecord {
    id: i64,
    name: String,
    is_private: bool,
    creator_id: i64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CommunityRecord {
    fn into_community(self, member_ids: BTreeSet<i64>) -> Result<Community, CommunityError> {
        let status = EntityStatus::from_str(&self.status)
            .ok_or_else(|| corrupt_row("load_community", "status", &self.status))?;

        Ok(Community {
            id: self.id,
            name: self.name,
            is_private: self.is_private,
            creator_id: self.creator_id,
            member_ids,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl CommunityRepository for SqliteCommunityRepository {
    /// Inserts the community and its creator membership in one transaction.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn create(&self, data: CreateCommunity) -> Result<Community, CommunityError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("create_community", e))?;

        let row: CommunityRecord = sqlx::query_as(&format!(
            "INSERT INTO communities (name, is_private, creator_id, status) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&data.name)
        .bind(data.is_private)
        .bind(data.creator_id)
        .bind(EntityStatus::Active.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| database_error("create_community", e))?;

        sqlx::query("INSERT INTO community_members (community_id, user_id) VALUES (?, ?)")
            .bind(row.id)
            .bind(data.creator_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| database_error("create_community_membership", e))?;

        tx.commit()
            .await
            .map_err(|e| database_error("create_community", e))?;

        row.into_community(BTreeSet::from([data.creator_id]))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Community>, CommunityError> {
        let row: Option<CommunityRecord> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM communities WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| database_error("find_community_by_id", e))?;

        match row {
            Some(row) => self.hydrate(row).await.map(Some),
            None => Ok(None),
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_active_by_name(&self, name: &str) -> Result<Option<Community>, CommunityError> {
        let row: Option<CommunityRecord> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM communities WHERE name = ? AND status = ? ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .bind(EntityStatus::Active.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("find_active_community_by_name", e))?;

        match row {
            Some(row) => self.hydrate(row).await.map(Some),
            None => Ok(None),
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_all(&self) -> Result<Vec<Community>, CommunityError> {
        self.fetch_many(
            "find_all_communities",
            &format!("SELECT {COLUMNS} FROM communities ORDER BY id"),
            None,
        )
        .await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_creator(&self, creator_id: i64) -> Result<Vec<Community>, CommunityError> {
        self.fetch_many(
            "find_communities_by_creator",
            &format!("SELECT {COLUMNS} FROM communities WHERE creator_id = ? ORDER BY id"),
            Some(creator_id),
        )
        .await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_member(&self, user_id: i64) -> Result<Vec<Community>, CommunityError> {
        self.fetch_many(
            "find_communities_by_member",
            r"
            SELECT c.id, c.name, c.is_private, c.creator_id, c.status, c.created_at, c.updated_at
            FROM communities c
            INNER JOIN community_members m ON m.community_id = c.id
            WHERE m.user_id = ?
            ORDER BY c.id
            ",
            Some(user_id),
        )
        .await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        is_private: Option<bool>,
    ) -> Result<Community, CommunityError> {
        let row: Option<CommunityRecord> = sqlx::query_as(&format!(
            r"
            UPDATE communities
            SET name = COALESCE(?, name), is_private = COALESCE(?, is_private), updated_at = ?
            WHERE id = ?
            RETURNING {COLUMNS}
            "
        ))
        .bind(name)
        .bind(is_private)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("update_community", e))?;

        let row = row.ok_or(CommunityError::NotFound)?;
        self.hydrate(row).await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn add_member(&self, id: i64, user_id: i64) -> Result<Community, CommunityError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("add_community_member", e))?;

        let touched = sqlx::query("UPDATE communities SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| database_error("add_community_member", e))?
            .rows_affected();

        if touched == 0 {
            return Err(CommunityError::NotFound);
        }

        sqlx::query("INSERT OR IGNORE INTO community_members (community_id, user_id) VALUES (?, ?)")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| database_error("add_community_member", e))?;

        tx.commit()
            .await
            .map_err(|e| database_error("add_community_member", e))?;

        self.find_by_id(id).await?.ok_or(CommunityError::NotFound)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn set_status(
        &self,
        id: i64,
        status: EntityStatus,
    ) -> Result<Community, CommunityError> {
        let row: Option<CommunityRecord> = sqlx::query_as(&format!(
            "UPDATE communities SET status = ?, updated_at = ? WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("set_community_status", e))?;

        let row = row.ok_or(CommunityError::NotFound)?;
        self.hydrate(row).await
    }

    /// Removes tokens and memberships explicitly so the delete does not
    /// depend on `PRAGMA foreign_keys`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete(&self, id: i64) -> Result<(), CommunityError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("delete_community", e))?;

        for sql in [
            "DELETE FROM invite_tokens WHERE community_id = ?",
            "DELETE FROM community_members WHERE community_id = ?",
            "DELETE FROM communities WHERE id = ?",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| database_error("delete_community", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| database_error("delete_community", e))?;

        Ok(())
    }
}
