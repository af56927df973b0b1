//! Embedded database migrations for `SQLite`.
//!
//! Migrations are embedded at compile time, run in order and recorded in the
//! `_townhall_migrations` table, so [`run`] is safe to call on every startup.
//!
//! # Example
//!
//! ```rust,ignore
//! use townhall::sqlite::migrations;
//! use sqlx::SqlitePool;
//!
//! async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
//!     migrations::run(pool).await?;
//!     Ok(())
//! }
//! ```

use sqlx::{Executor, SqlitePool};

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "20250301000001_create_users_table",
        include_str!("../../migrations_sqlite/20250301000001_create_users_table.sql"),
    ),
    (
        "20250301000002_create_communities_table",
        include_str!("../../migrations_sqlite/20250301000002_create_communities_table.sql"),
    ),
    (
        "20250301000003_create_community_members_table",
        include_str!("../../migrations_sqlite/20250301000003_create_community_members_table.sql"),
    ),
    (
        "20250301000004_create_invite_tokens_table",
        include_str!("../../migrations_sqlite/20250301000004_create_invite_tokens_table.sql"),
    ),
];

/// Applies every pending migration.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    pool.execute(
        r"
        CREATE TABLE IF NOT EXISTS _townhall_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        ",
    )
    .await?;

    for (name, sql) in MIGRATIONS {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _townhall_migrations WHERE name = ?)")
                .bind(*name)
                .fetch_one(pool)
                .await?;

        if applied {
            continue;
        }

        // one statement per execute; split naively since no bundled migration
        // has a semicolon inside a literal
        for statement in sql.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                pool.execute(trimmed).await?;
            }
        }

        sqlx::query("INSERT INTO _townhall_migrations (name) VALUES (?)")
            .bind(*name)
            .execute(pool)
            .await?;

        log::info!(target: "townhall", "msg=\"migration applied\", name=\"{name}\"");
    }

    Ok(())
}
