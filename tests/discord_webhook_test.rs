// ABOUTME: Integration tests for the Discord webhook client against a mock endpoint
// ABOUTME: Covers send, update, delete, failures and status notifications
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use stream_notifier::discord::{
    DiscordEmbed, DiscordMessage, DiscordWebhook, MentionFlags, Notifier, Severity,
    StatusNotifier,
};
use stream_notifier::errors::ErrorCode;

#[derive(Default)]
struct MockDiscord {
    fail: bool,
    posted: Mutex<Vec<(HashMap<String, String>, Value)>>,
    patched: Mutex<Vec<(String, Value)>>,
    deleted: Mutex<Vec<String>>,
}

async fn execute(
    State(mock): State<Arc<MockDiscord>>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.posted.lock().unwrap().push((query, body.clone()));
    if mock.fail {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Unknown Webhook", "code": 10015})),
        );
    }
    let mut echoed = body;
    echoed["id"] = json!("1130934720596545576");
    (StatusCode::OK, Json(echoed))
}

async fn edit(
    State(mock): State<Arc<MockDiscord>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut patched = mock.patched.lock().unwrap();
    patched.push((id.clone(), body.clone()));
    drop(patched);
    let mut echoed = body;
    echoed["id"] = json!(id);
    Json(echoed)
}

async fn remove(State(mock): State<Arc<MockDiscord>>, Path(id): Path<String>) -> StatusCode {
    mock.deleted.lock().unwrap().push(id);
    StatusCode::NO_CONTENT
}

async fn setup(mock: &Arc<MockDiscord>) -> String {
    common::init_test_logging();
    let router = Router::new()
        .route("/api/webhooks/1/token", post(execute))
        .route(
            "/api/webhooks/1/token/messages/:id",
            patch(edit).delete(remove),
        )
        .with_state(Arc::clone(mock));
    let base = common::spawn_router(router).await;
    format!("{base}/api/webhooks/1/token")
}

fn announcement() -> DiscordMessage {
    DiscordMessage {
        content: "**SomeStreamer** is now live on Twitch!".to_owned(),
        embeds: vec![DiscordEmbed {
            title: "Speedrunning all day".to_owned(),
            description: "Playing: Celeste".to_owned(),
            url: Some("https://twitch.tv/somestreamer".to_owned()),
            ..DiscordEmbed::default()
        }],
        flags: MentionFlags::empty(),
    }
}

#[tokio::test]
async fn test_send_rich_returns_message_id() {
    let mock = Arc::new(MockDiscord::default());
    let url = setup(&mock).await;
    let webhook = DiscordWebhook::branded(url, true).unwrap();

    let id = webhook.send_rich(&announcement()).await.unwrap();
    assert_eq!(id, "1130934720596545576");

    let posted = mock.posted.lock().unwrap();
    let (query, body) = &posted[0];
    assert_eq!(query.get("wait").map(String::as_str), Some("true"));
    assert_eq!(body["username"], "Twitch Notifier");
    assert!(body["avatar_url"].as_str().unwrap().starts_with("https://"));
    assert_eq!(body["content"], "**SomeStreamer** is now live on Twitch!");
    assert_eq!(body["embeds"][0]["url"], "https://twitch.tv/somestreamer");
}

#[tokio::test]
async fn test_mentions_are_restricted_when_flagged() {
    let mock = Arc::new(MockDiscord::default());
    let url = setup(&mock).await;
    let webhook = DiscordWebhook::branded(url, true).unwrap();

    let mut message = DiscordMessage::plain("@everyone hello");
    message.flags = MentionFlags::SILENT;
    webhook.send_rich(&message).await.unwrap();

    let posted = mock.posted.lock().unwrap();
    assert_eq!(posted[0].1["allowed_mentions"], json!({"parse": []}));
}

#[tokio::test]
async fn test_empty_message_is_refused_without_request() {
    let mock = Arc::new(MockDiscord::default());
    let url = setup(&mock).await;
    let webhook = DiscordWebhook::branded(url, true).unwrap();

    let error = webhook
        .send_rich(&DiscordMessage::default())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert!(mock.posted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_delivery_is_reported() {
    let mock = Arc::new(MockDiscord {
        fail: true,
        ..MockDiscord::default()
    });
    let url = setup(&mock).await;
    let webhook = DiscordWebhook::branded(url, true).unwrap();

    let error = webhook.deliver(&announcement()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);
}

#[tokio::test]
async fn test_update_and_delete_posted_message() {
    let mock = Arc::new(MockDiscord::default());
    let url = setup(&mock).await;
    let webhook = DiscordWebhook::branded(url, true).unwrap();

    let id = webhook.send_plain("going live soon").await.unwrap();
    let updated = webhook
        .update(&id, &DiscordMessage::plain("live now"))
        .await
        .unwrap();
    assert_eq!(updated["content"], "live now");
    webhook.delete(&id).await.unwrap();

    assert_eq!(mock.patched.lock().unwrap()[0].0, id);
    assert_eq!(mock.deleted.lock().unwrap().as_slice(), [id]);
}

#[tokio::test]
async fn test_status_notification_embed() {
    let mock = Arc::new(MockDiscord::default());
    let url = setup(&mock).await;
    let status = StatusNotifier::new(&url, true);
    assert!(status.is_enabled());

    status.send_status("Starting up!", Severity::Success).await;

    let posted = mock.posted.lock().unwrap();
    let embed = &posted[0].1["embeds"][0];
    assert_eq!(embed["title"], "System Notification");
    assert_eq!(embed["description"], "Starting up!");
}

#[tokio::test]
async fn test_status_failures_are_swallowed() {
    let mock = Arc::new(MockDiscord {
        fail: true,
        ..MockDiscord::default()
    });
    let url = setup(&mock).await;

    StatusNotifier::new(&url, true)
        .send_status("Bot has been killed!", Severity::Error)
        .await;
    StatusNotifier::new("", true)
        .send_status("never sent", Severity::Warning)
        .await;

    assert_eq!(mock.posted.lock().unwrap().len(), 1);
}
