#![allow(clippy::print_stdout, clippy::unwrap_used, clippy::expect_used)]

//! Community server on SQLite.
//!
//! Run with: `cargo run --example axum_sqlite_server --features "axum_api sqlx_sqlite"`
//!
//! Environment variables:
//!   DATABASE_URL=sqlite:./townhall.db (optional, defaults to in-memory)
//!   TOWNHALL_MAX_COMMUNITIES, TOWNHALL_MAX_INVITES_PER_COMMUNITY (optional)
//!
//! Callers identify themselves with the `x-townhall-login` header. The
//! server seeds `alice` (ordinary) and `root` (administrator).
//!
//!   curl -X POST http://localhost:8080/communities \
//!     -H "x-townhall-login: alice" -H "Content-Type: application/json" \
//!     -d '{"name": "Runners", "is_private": true}'
//!   curl -X POST http://localhost:8080/communities/1/invites \
//!     -H "x-townhall-login: alice" -H "Content-Type: application/json" \
//!     -d '{"expires_at": "2030-01-01T00:00", "one_time_use": true}'

use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::net::TcpListener;
use townhall::api::axum::{CommunityState, community_routes, trusted_principal_header};
use townhall::config::TownhallConfig;
use townhall::events::listeners::LoggingListener;
use townhall::sqlite::{
    SqliteCommunityRepository, SqliteInviteTokenRepository, SqliteUserRepository,
    create_repositories, migrations,
};
use townhall::{Role, register_event_listeners};

#[tokio::main]
async fn main() {
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_owned());
    let config = TownhallConfig::from_env().expect("Invalid configuration");

    // one connection keeps an in-memory database shared
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to create pool");

    migrations::run(&pool)
        .await
        .expect("Failed to run migrations");

    let (user_repo, community_repo, invite_repo) = create_repositories(pool);
    for (login, role) in [("alice", Role::Ordinary), ("root", Role::Administrator)] {
        if let Err(e) = user_repo.create_user(login, role).await {
            println!("Skipping seed user {login}: {e}");
        }
    }

    register_event_listeners(|registry| {
        registry.listen(LoggingListener::new());
    });

    let state = CommunityState::new(user_repo, community_repo, invite_repo).with_config(config);

    let app = Router::new()
        .nest(
            "/communities",
            community_routes::<
                SqliteUserRepository,
                SqliteCommunityRepository,
                SqliteInviteTokenRepository,
            >(),
        )
        .layer(axum::middleware::from_fn(trusted_principal_header))
        .with_state(state);

    println!("Starting community server on http://localhost:8080");
    println!("Database: {database_url}");
    println!("Endpoints:");
    println!("  POST   /communities              - Create community");
    println!("  GET    /communities?type=ALL     - List communities");
    println!("  GET    /communities/{{id}}         - Get community");
    println!("  PUT    /communities/{{id}}         - Update community");
    println!("  DELETE /communities/{{id}}         - Delete community");
    println!("  POST   /communities/{{id}}/join    - Join public community");
    println!("  POST   /communities/{{id}}/invites - Create invite code");
    println!("  POST   /communities/join/{{code}}  - Join by invite code");

    let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
