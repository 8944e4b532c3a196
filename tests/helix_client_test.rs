// ABOUTME: Integration tests for the Helix REST client against a mock API
// ABOUTME: Covers authentication headers, empty data and subscription acceptance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stream_notifier::database::{Credential, MemoryCredentialStore};
use stream_notifier::helix::{HelixClient, StreamPlatform, SubscriptionRequest};

#[derive(Default)]
struct MockHelix {
    live: bool,
    accept_subscriptions: bool,
    requests: AtomicUsize,
    subscription_body: Mutex<Option<Value>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    let client_id = headers.get("client-id").and_then(|v| v.to_str().ok());
    bearer == Some("Bearer good-token") && client_id == Some("client123")
}

async fn users(
    State(mock): State<Arc<MockHelix>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    mock.requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Unauthorized", "status": 401, "message": "Invalid OAuth token"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"data": [{
            "id": "999",
            "login": "somestreamer",
            "display_name": "SomeStreamer",
            "type": "",
            "broadcaster_type": "affiliate"
        }]})),
    )
}

async fn streams(
    State(mock): State<Arc<MockHelix>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    mock.requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"status": 401})));
    }
    if !mock.live || query.get("user_id").map(String::as_str) != Some("999") {
        return (StatusCode::OK, Json(json!({"data": [], "pagination": {}})));
    }
    (
        StatusCode::OK,
        Json(json!({"data": [{
            "user_id": "999",
            "user_login": "somestreamer",
            "game_name": "Celeste",
            "type": "live",
            "title": "Speedrunning all day",
            "thumbnail_url": "https://static-cdn.jtvnw.net/previews-ttv/live_user_somestreamer-{width}x{height}.jpg"
        }]})),
    )
}

async fn subscriptions(
    State(mock): State<Arc<MockHelix>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    mock.requests.fetch_add(1, Ordering::SeqCst);
    *mock.subscription_body.lock().unwrap() = Some(body);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    if mock.accept_subscriptions {
        StatusCode::ACCEPTED
    } else {
        StatusCode::BAD_REQUEST
    }
}

async fn setup(
    mock: &Arc<MockHelix>,
    access: Option<&str>,
) -> HelixClient<MemoryCredentialStore> {
    common::init_test_logging();
    let router = Router::new()
        .route("/helix/users", get(users))
        .route("/helix/streams", get(streams))
        .route("/helix/eventsub/subscriptions", post(subscriptions))
        .with_state(Arc::clone(mock));
    let base = common::spawn_router(router).await;

    let store = access.map_or_else(MemoryCredentialStore::new, |token| {
        MemoryCredentialStore::with_credential(Credential::bearer(token, None, 0))
    });
    HelixClient::new(
        Arc::new(store),
        "client123",
        format!("{base}/helix"),
        format!("{base}/helix"),
    )
}

#[tokio::test]
async fn test_current_user_is_resolved() {
    let mock = Arc::new(MockHelix::default());
    let client = setup(&mock, Some("good-token")).await;

    let user = client.current_user().await.unwrap().unwrap();
    assert_eq!(user.id, "999");
    assert_eq!(user.login, "somestreamer");
    assert_eq!(user.display_name, "SomeStreamer");
}

#[tokio::test]
async fn test_rejected_token_yields_no_user() {
    let mock = Arc::new(MockHelix::default());
    let client = setup(&mock, Some("expired-token")).await;

    assert!(client.current_user().await.unwrap().is_none());
    assert_eq!(mock.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_logged_out_makes_no_request() {
    let mock = Arc::new(MockHelix::default());
    let client = setup(&mock, None).await;

    assert!(client.current_user().await.unwrap().is_none());
    assert!(client.stream("999").await.unwrap().is_none());
    let request = SubscriptionRequest::stream_online("abc123", "999");
    assert!(!client.create_subscription(&request).await.unwrap());
    assert_eq!(mock.requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_live_stream_details() {
    let mock = Arc::new(MockHelix {
        live: true,
        ..MockHelix::default()
    });
    let client = setup(&mock, Some("good-token")).await;

    let stream = client.stream("999").await.unwrap().unwrap();
    assert_eq!(stream.title, "Speedrunning all day");
    assert_eq!(stream.game_name, "Celeste");
    assert_eq!(stream.user_login.as_deref(), Some("somestreamer"));
    assert!(stream.thumbnail_url.contains("{width}x{height}"));
}

#[tokio::test]
async fn test_stream_not_yet_visible_is_none() {
    let mock = Arc::new(MockHelix::default());
    let client = setup(&mock, Some("good-token")).await;

    assert!(client.stream("999").await.unwrap().is_none());
}

#[tokio::test]
async fn test_accepted_subscription() {
    let mock = Arc::new(MockHelix {
        accept_subscriptions: true,
        ..MockHelix::default()
    });
    let client = setup(&mock, Some("good-token")).await;

    let request = SubscriptionRequest::stream_online("abc123", "999");
    assert!(client.create_subscription(&request).await.unwrap());

    let body = mock.subscription_body.lock().unwrap().clone().unwrap();
    assert_eq!(
        body,
        json!({
            "type": "stream.online",
            "version": "1",
            "condition": {"broadcaster_user_id": "999"},
            "transport": {"method": "websocket", "session_id": "abc123"}
        })
    );
}

#[tokio::test]
async fn test_refused_subscription_is_false() {
    let mock = Arc::new(MockHelix::default());
    let client = setup(&mock, Some("good-token")).await;

    let request = SubscriptionRequest::stream_online("abc123", "999");
    assert!(!client.create_subscription(&request).await.unwrap());
}
