// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Logging setup, local mock servers and recording collaborators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::new_ret_no_self,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `stream_notifier`

use async_trait::async_trait;
use axum::Router;
use std::sync::{Arc, Mutex, Once};
use stream_notifier::config::{
    DiscordConfig, ServerConfig, TwitchConfig, TwitchEndpoints,
};
use stream_notifier::discord::{DiscordMessage, Notifier};
use stream_notifier::errors::{AppError, AppResult};
use stream_notifier::helix::{StreamPlatform, SubscriptionRequest, TwitchStream, TwitchUser};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_router(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{address}")
}

/// Configuration pointing every Twitch endpoint at `base`
pub fn test_config(base: &str, debug: bool) -> ServerConfig {
    ServerConfig {
        hostname: "http://localhost:5000".to_owned(),
        http_port: 0,
        database_url: "sqlite::memory:".to_owned(),
        debug,
        discord: DiscordConfig {
            webhook: format!("{base}/api/webhooks/1/token"),
            status_webhook: String::new(),
        },
        twitch: TwitchConfig {
            client_id: "client123".to_owned(),
            client_secret: "secret456".to_owned(),
            endpoints: TwitchEndpoints {
                websocket: format!("{}/ws", base.replace("http://", "ws://")),
                helix: format!("{base}/helix"),
                auth: format!("{base}/auth"),
                eventsub: format!("{base}/helix"),
            },
        },
    }
}

pub fn streamer() -> TwitchUser {
    TwitchUser {
        id: "999".to_owned(),
        login: "somestreamer".to_owned(),
        display_name: "SomeStreamer".to_owned(),
    }
}

pub fn live_stream() -> TwitchStream {
    TwitchStream {
        title: "Speedrunning all day".to_owned(),
        game_name: "Celeste".to_owned(),
        thumbnail_url: "https://static-cdn.jtvnw.net/previews-ttv/live_user_somestreamer-{width}x{height}.jpg"
            .to_owned(),
        user_login: Some("somestreamer".to_owned()),
    }
}

/// In-process stand-in for Helix with a settable user
pub struct FakePlatform {
    pub user: Mutex<Option<TwitchUser>>,
    pub stream: Mutex<Option<TwitchStream>>,
    pub accept_subscriptions: bool,
    pub subscriptions: Mutex<Vec<SubscriptionRequest>>,
}

impl FakePlatform {
    pub fn new(user: Option<TwitchUser>) -> Self {
        Self {
            user: Mutex::new(user),
            stream: Mutex::new(Some(live_stream())),
            accept_subscriptions: true,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_subscriptions(user: Option<TwitchUser>) -> Self {
        Self {
            accept_subscriptions: false,
            ..Self::new(user)
        }
    }

    pub fn subscriptions(&self) -> Vec<SubscriptionRequest> {
        self.subscriptions.lock().unwrap().clone()
    }
}

#[async_trait]
impl StreamPlatform for FakePlatform {
    async fn current_user(&self) -> AppResult<Option<TwitchUser>> {
        Ok(self.user.lock().unwrap().clone())
    }

    async fn stream(&self, _user_id: &str) -> AppResult<Option<TwitchStream>> {
        Ok(self.stream.lock().unwrap().clone())
    }

    async fn create_subscription(&self, request: &SubscriptionRequest) -> AppResult<bool> {
        self.subscriptions.lock().unwrap().push(request.clone());
        Ok(self.accept_subscriptions)
    }
}

/// Notifier recording every delivered message
pub struct RecordingNotifier {
    delivered: Mutex<Vec<DiscordMessage>>,
    events: mpsc::UnboundedSender<DiscordMessage>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<DiscordMessage>) {
        Self::build(false)
    }

    pub fn failing() -> (Arc<Self>, mpsc::UnboundedReceiver<DiscordMessage>) {
        Self::build(true)
    }

    fn build(fail: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<DiscordMessage>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let notifier = Arc::new(Self {
            delivered: Mutex::new(Vec::new()),
            events,
            fail,
        });
        (notifier, receiver)
    }

    pub fn delivered(&self) -> Vec<DiscordMessage> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, message: &DiscordMessage) -> AppResult<()> {
        self.delivered.lock().unwrap().push(message.clone());
        let _ = self.events.send(message.clone());
        if self.fail {
            return Err(AppError::external_service("discord", "webhook unavailable"));
        }
        Ok(())
    }
}
