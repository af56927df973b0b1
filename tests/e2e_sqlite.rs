//! End-to-end tests for the `SQLite` repositories.
//!
//! Each test gets its own in-memory database.
//! Run with: `cargo test --features sqlx_sqlite --test e2e_sqlite`

#![cfg(feature = "sqlx_sqlite")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use townhall::communities::{
    CommunityRepository, CreateCommunity, CreateCommunityAction, CreateInviteInput,
    CreateInviteToken, CreateInviteTokenAction, DeleteCommunityAction, Deletion, EntityStatus,
    InviteTokenRepository, JoinByInviteAction, ListCommunitiesAction,
};
use townhall::sqlite::{
    SqliteCommunityRepository, SqliteInviteTokenRepository, SqliteUserRepository,
    create_repositories, migrations,
};
use townhall::{CommunityError, Role, User, UserRepository};

async fn setup_db() -> SqlitePool {
    // a second connection would open a second, empty in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory SQLite database");

    migrations::run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

async fn setup() -> (
    SqliteUserRepository,
    SqliteCommunityRepository,
    SqliteInviteTokenRepository,
    User,
    User,
) {
    let (users, communities, tokens) = create_repositories(setup_db().await);
    let alice = users.create_user("alice", Role::Ordinary).await.unwrap();
    let bob = users.create_user("bob", Role::Administrator).await.unwrap();
    (users, communities, tokens, alice, bob)
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let pool = setup_db().await;
    migrations::run(&pool).await.expect("second run");

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _townhall_migrations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(applied, 4);
}

#[tokio::test]
async fn test_user_lookup() {
    let (users, _, _, alice, _) = setup().await;

    let found = users.find_user_by_login("alice").await.unwrap().unwrap();
    assert_eq!(found.id, alice.id);
    assert_eq!(found.role, Role::Ordinary);

    let by_id = users.find_user_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(by_id.login, "alice");

    assert!(users.find_user_by_login("nobody").await.unwrap().is_none());

    let duplicate = users.create_user("alice", Role::Ordinary).await;
    assert!(matches!(duplicate, Err(CommunityError::DatabaseError(_))));
}

#[tokio::test]
async fn test_community_crud() {
    let (_, communities, _, alice, bob) = setup().await;

    let created = communities
        .create(CreateCommunity {
            name: "Runners".to_owned(),
            is_private: true,
            creator_id: alice.id,
        })
        .await
        .unwrap();
    assert!(created.is_private);
    assert!(created.is_member(alice.id));
    assert_eq!(created.status, EntityStatus::Active);

    let found = communities.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.member_ids, created.member_ids);

    let joined = communities.add_member(created.id, bob.id).await.unwrap();
    assert_eq!(joined.member_count(), 2);

    // idempotent
    let joined = communities.add_member(created.id, bob.id).await.unwrap();
    assert_eq!(joined.member_count(), 2);

    let updated = communities
        .update(created.id, Some("Trail Runners"), None)
        .await
        .unwrap();
    assert_eq!(updated.name, "Trail Runners");
    assert!(updated.is_private);

    let by_member = communities.find_by_member(bob.id).await.unwrap();
    assert_eq!(by_member.len(), 1);

    let archived = communities
        .set_status(created.id, EntityStatus::Deleted)
        .await
        .unwrap();
    assert!(archived.is_deleted());
    assert!(communities
        .find_active_by_name("Trail Runners")
        .await
        .unwrap()
        .is_none());
    assert_eq!(communities.find_by_creator(alice.id).await.unwrap().len(), 1);

    assert_eq!(
        communities.add_member(999, bob.id).await.unwrap_err(),
        CommunityError::NotFound
    );
    assert_eq!(
        communities.update(999, Some("x"), None).await.unwrap_err(),
        CommunityError::NotFound
    );
}

#[tokio::test]
async fn test_invite_token_storage() {
    let (_, communities, tokens, alice, _) = setup().await;
    let community = communities
        .create(CreateCommunity {
            name: "Runners".to_owned(),
            is_private: false,
            creator_id: alice.id,
        })
        .await
        .unwrap();

    let expires_at = Utc::now() + Duration::days(3);
    let token = tokens
        .create(CreateInviteToken {
            community_id: community.id,
            code: "abc123".to_owned(),
            expires_at: Some(expires_at),
            one_time_use: true,
            created_by: alice.id,
        })
        .await
        .unwrap();
    assert!(token.one_time_use);
    assert_eq!(token.expires_at.unwrap().timestamp(), expires_at.timestamp());

    let duplicate = tokens
        .create(CreateInviteToken {
            community_id: community.id,
            code: "abc123".to_owned(),
            expires_at: None,
            one_time_use: false,
            created_by: alice.id,
        })
        .await;
    assert!(matches!(duplicate, Err(CommunityError::DatabaseError(_))));

    let deleted = tokens.mark_deleted(token.id).await.unwrap();
    assert!(deleted.is_deleted());

    let found = tokens.find_by_code("abc123").await.unwrap().unwrap();
    assert_eq!(found.status, EntityStatus::Deleted);
    assert_eq!(tokens.find_by_community(community.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_full_invite_workflow() {
    let (users, communities, tokens, _, _) = setup().await;
    users.create_user("carol", Role::Ordinary).await.unwrap();

    let secret = CreateCommunityAction::new(communities.clone(), users.clone())
        .execute("Secret", true, "alice")
        .await
        .unwrap();

    let view = CreateInviteTokenAction::new(tokens.clone(), communities.clone(), users.clone())
        .execute(
            CreateInviteInput {
                community_id: secret.id,
                expires_at: Some("2099-12-31T23:59:59.5".to_owned()),
                one_time_use: Some(true),
            },
            "alice",
        )
        .await
        .unwrap();

    let accept = JoinByInviteAction::new(tokens.clone(), communities.clone(), users.clone());
    let joined = accept.execute(&view.code, "carol").await.unwrap();
    assert!(joined.is_member(joined.creator_id));
    assert_eq!(joined.member_count(), 2);

    let reuse = accept.execute(&view.code, "bob").await;
    assert_eq!(reuse.unwrap_err(), CommunityError::NotFound);

    let list = ListCommunitiesAction::new(communities.clone(), users.clone());
    let mine = list.execute(Some("joined"), "carol").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].creator_login.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_expired_invite_is_marked_deleted() {
    let (users, communities, tokens, _, _) = setup().await;

    let runners = CreateCommunityAction::new(communities.clone(), users.clone())
        .execute("Runners", false, "alice")
        .await
        .unwrap();

    let view = CreateInviteTokenAction::new(tokens.clone(), communities.clone(), users.clone())
        .execute(
            CreateInviteInput {
                community_id: runners.id,
                expires_at: Some("2020-01-01T00:00:00".to_owned()),
                one_time_use: None,
            },
            "alice",
        )
        .await
        .unwrap();

    let result = JoinByInviteAction::new(tokens.clone(), communities, users)
        .execute(&view.code, "bob")
        .await;
    assert_eq!(result.unwrap_err(), CommunityError::NotFound);

    let stored = tokens.find_by_code(&view.code).await.unwrap().unwrap();
    assert_eq!(stored.status, EntityStatus::Deleted);
}

#[tokio::test]
async fn test_hard_delete_cascades() {
    let (users, communities, tokens, alice, _) = setup().await;

    let runners = CreateCommunityAction::new(communities.clone(), users.clone())
        .execute("Runners", false, "alice")
        .await
        .unwrap();
    let view = CreateInviteTokenAction::new(tokens.clone(), communities.clone(), users.clone())
        .execute(
            CreateInviteInput {
                community_id: runners.id,
                ..Default::default()
            },
            "alice",
        )
        .await
        .unwrap();

    let deletion = DeleteCommunityAction::new(communities.clone(), users)
        .execute(runners.id, "bob")
        .await
        .unwrap();
    assert_eq!(deletion, Deletion::Hard);

    assert!(communities.find_by_id(runners.id).await.unwrap().is_none());
    assert!(communities.find_by_member(alice.id).await.unwrap().is_empty());
    assert!(tokens.find_by_code(&view.code).await.unwrap().is_none());
}
