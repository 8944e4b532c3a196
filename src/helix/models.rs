// ABOUTME: Helix response and EventSub subscription request models
// ABOUTME: Serde types for users, streams and stream.online subscriptions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use notifier_core::constants::eventsub;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Authenticated Twitch user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitchUser {
    /// Numeric user id (as a string)
    pub id: String,
    /// Lower-case login used in channel URLs
    pub login: String,
    /// Display name shown in announcements
    pub display_name: String,
}

/// Live stream details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitchStream {
    /// Stream title
    pub title: String,
    /// Category being streamed
    pub game_name: String,
    /// Thumbnail template containing `{width}x{height}`
    pub thumbnail_url: String,
    /// Broadcaster login
    #[serde(default)]
    pub user_login: Option<String>,
}

/// Helix list envelope
#[derive(Debug, Deserialize)]
pub(super) struct DataEnvelope<T> {
    pub data: Vec<T>,
}

/// `EventSub` transport binding a subscription to a WebSocket session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionTransport {
    /// Always `websocket`
    pub method: String,
    /// Session id from the welcome message
    pub session_id: String,
}

/// `POST /eventsub/subscriptions` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    /// Subscription type, e.g. `stream.online`
    #[serde(rename = "type")]
    pub event_type: String,
    /// Subscription version
    pub version: String,
    /// Condition map scoping the subscription
    pub condition: BTreeMap<String, String>,
    /// Delivery transport
    pub transport: SubscriptionTransport,
}

impl SubscriptionRequest {
    /// `stream.online` for `broadcaster_user_id`, delivered to `session_id`
    #[must_use]
    pub fn stream_online(session_id: &str, broadcaster_user_id: &str) -> Self {
        let mut condition = BTreeMap::new();
        condition.insert(
            "broadcaster_user_id".to_owned(),
            broadcaster_user_id.to_owned(),
        );

        Self {
            event_type: eventsub::STREAM_ONLINE.to_owned(),
            version: eventsub::STREAM_ONLINE_VERSION.to_owned(),
            condition,
            transport: SubscriptionTransport {
                method: eventsub::TRANSPORT_WEBSOCKET.to_owned(),
                session_id: session_id.to_owned(),
            },
        }
    }
}
