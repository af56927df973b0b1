//! End-to-end tests for the Axum community router.
//!
//! These tests use mock repositories - no database required.
//! Run with: `cargo test --features "axum_api mocks" --test e2e_axum`

#![cfg(all(feature = "axum_api", feature = "mocks"))]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::from_fn;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use townhall::api::axum::{CommunityState, PRINCIPAL_HEADER, community_routes, trusted_principal_header};
use townhall::communities::{MockCommunityRepository, MockInviteTokenRepository};
use townhall::{MockUserRepository, Role};

fn create_app() -> Router {
    let users = MockUserRepository::new();
    users.insert("alice", Role::Ordinary);
    users.insert("bob", Role::Ordinary);
    users.insert("root", Role::Administrator);

    let invites = MockInviteTokenRepository::new();
    let communities = MockCommunityRepository::with_tokens(invites.clone());

    community_routes::<MockUserRepository, MockCommunityRepository, MockInviteTokenRepository>()
        .layer(from_fn(trusted_principal_header))
        .with_state(CommunityState::new(users, communities, invites))
}

fn request(method: &str, uri: &str, login: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(login) = login {
        builder = builder.header(PRINCIPAL_HEADER, login);
    }

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create(app: &Router, login: &str, name: &str, is_private: bool) -> i64 {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/",
            Some(login),
            Some(json!({ "name": name, "is_private": is_private })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_missing_principal_is_unauthorized() {
    let app = create_app();

    let (status, body) = send(&app, request("GET", "/", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "USER_NOT_FOUND");

    let (status, _) = send(&app, request("GET", "/", Some("mallory"), None)).await;
    assert_eq!(status, StatusCode::OK);

    // a principal only has to resolve once the action needs a user
    let (status, _) = send(&app, request("GET", "/?type=JOINED", Some("mallory"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_get() {
    let app = create_app();

    let (status, body) = send(
        &app,
        request("POST", "/", Some("alice"), Some(json!({ "name": "Runners" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Runners");
    assert_eq!(body["is_private"], false);
    assert_eq!(body["member_count"], 1);
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, request("GET", &format!("/{id}"), Some("bob"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member_ids"], json!([body["creator_id"]]));

    let (status, body) = send(
        &app,
        request("POST", "/", Some("bob"), Some(json!({ "name": "Runners" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ALREADY_EXISTS");

    let (status, _) = send(&app, request("GET", "/999", Some("bob"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ordinary_quota() {
    let app = create_app();
    create(&app, "alice", "First", false).await;

    let (status, body) = send(
        &app,
        request("POST", "/", Some("alice"), Some(json!({ "name": "Second" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_list_categories() {
    let app = create_app();
    create(&app, "alice", "Open", false).await;
    create(&app, "root", "Hidden", true).await;

    let (status, body) = send(&app, request("GET", "/", Some("bob"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Open"]);
    assert_eq!(body[0]["creator_login"], "alice");

    let (_, body) = send(&app, request("GET", "/?type=created", Some("root"), None)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Hidden");

    let (_, body) = send(&app, request("GET", "/?type=ALL", Some("bob"), None)).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(&app, request("GET", "/?type=friends", Some("bob"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_CATEGORY");
}

#[tokio::test]
async fn test_join_public_and_private() {
    let app = create_app();
    let open = create(&app, "alice", "Open", false).await;
    let hidden = create(&app, "root", "Hidden", true).await;

    let (status, body) = send(&app, request("POST", &format!("/{open}/join"), Some("bob"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member_count"], 2);

    let (status, body) = send(&app, request("POST", &format!("/{open}/join"), Some("bob"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ALREADY_MEMBER");

    let (status, _) = send(&app, request("POST", &format!("/{hidden}/join"), Some("bob"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, request("GET", &format!("/{hidden}"), Some("bob"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invite_flow() {
    let app = create_app();
    let hidden = create(&app, "alice", "Hidden", true).await;
    let uri = format!("/{hidden}/invites");

    let (status, _) = send(&app, request("POST", &uri, Some("bob"), Some(json!({})))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request("POST", &uri, Some("alice"), Some(json!({ "expires_at": "soon" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TIMESTAMP");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &uri,
            Some("alice"),
            Some(json!({ "expires_at": "2099-01-01T00:00", "one_time_use": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["community_id"], hidden);
    assert_eq!(body["one_time_use"], true);
    let code = body["code"].as_str().unwrap().to_owned();

    let (status, body) = send(&app, request("POST", &format!("/join/{code}"), Some("bob"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member_count"], 2);

    let (status, body) = send(&app, request("POST", &format!("/join/{code}"), Some("root"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = create_app();
    let id = create(&app, "alice", "Runners", false).await;

    let (status, _) = send(
        &app,
        request("PUT", &format!("/{id}"), Some("bob"), Some(json!({ "name": "Mine" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        request("PUT", &format!("/{id}"), Some("alice"), Some(json!({ "is_private": true }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Runners");
    assert_eq!(body["is_private"], true);

    let (status, body) = send(&app, request("DELETE", &format!("/{id}"), Some("alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "community deleted");

    let (status, _) = send(&app, request("GET", &format!("/{id}"), Some("alice"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let other = create(&app, "root", "Other", false).await;
    let (status, body) = send(&app, request("DELETE", &format!("/{other}"), Some("root"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "community removed");
}

#[tokio::test]
async fn test_undecodable_requests_use_error_envelope() {
    let app = create_app();

    let malformed = Request::builder()
        .method("POST")
        .uri("/")
        .header(PRINCIPAL_HEADER, "alice")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
    assert!(body["error"].is_string());

    let (status, body) = send(&app, request("GET", "/runners", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");

    let (status, body) = send(
        &app,
        request("PUT", "/abc", Some("alice"), Some(json!({ "name": "x" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
}
