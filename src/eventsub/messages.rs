// ABOUTME: Inbound EventSub WebSocket message envelope
// ABOUTME: Classifies messages and extracts the welcome session id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use notifier_core::constants::eventsub::{
    MESSAGE_KEEPALIVE, MESSAGE_NOTIFICATION, MESSAGE_RECONNECT, MESSAGE_REVOCATION,
    MESSAGE_WELCOME, STREAM_ONLINE,
};
use notifier_core::errors::AppResult;
use serde::Deserialize;
use serde_json::Value;

/// Envelope metadata shared by every `EventSub` message
#[derive(Debug, Clone, Deserialize)]
pub struct MessageMetadata {
    /// `session_welcome`, `notification`, `session_keepalive`, ...
    pub message_type: String,
    /// Present on notifications and revocations
    #[serde(default)]
    pub subscription_type: Option<String>,
    /// Unique per message, repeated on redelivery
    #[serde(default)]
    pub message_id: Option<String>,
}

/// One inbound text frame
#[derive(Debug, Clone, Deserialize)]
pub struct EventSubMessage {
    /// Envelope metadata
    pub metadata: MessageMetadata,
    /// Type-specific body, kept as raw JSON
    #[serde(default)]
    pub payload: Value,
}

/// Message categories the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// First frame of a session, carries the session id
    Welcome,
    /// A subscribed event fired
    Notification,
    /// Sent when the socket has been idle
    Keepalive,
    /// The server asks the client to move to a new URL
    Reconnect,
    /// A subscription was revoked
    Revocation,
    /// Anything else
    Other,
}

impl EventSubMessage {
    /// Parse a text frame
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the frame is not a message envelope
    pub fn parse(text: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Category of this message from its `message_type`
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self.metadata.message_type.as_str() {
            MESSAGE_WELCOME => MessageKind::Welcome,
            MESSAGE_NOTIFICATION => MessageKind::Notification,
            MESSAGE_KEEPALIVE => MessageKind::Keepalive,
            MESSAGE_RECONNECT => MessageKind::Reconnect,
            MESSAGE_REVOCATION => MessageKind::Revocation,
            _ => MessageKind::Other,
        }
    }

    /// `payload.session.id` of a welcome message
    #[must_use]
    pub fn welcome_session_id(&self) -> Option<&str> {
        if self.kind() != MessageKind::Welcome {
            return None;
        }
        self.payload
            .pointer("/session/id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Whether this is a `stream.online` notification
    #[must_use]
    pub fn is_stream_online(&self) -> bool {
        self.kind() == MessageKind::Notification
            && self.metadata.subscription_type.as_deref() == Some(STREAM_ONLINE)
    }
}
