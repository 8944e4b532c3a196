// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Timing, EventSub, Twitch endpoint and Discord styling constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Timing constants shared by the job queue and the event session
pub mod timing {
    use std::time::Duration;

    /// Polling interval for `JobQueue::pop` and the `EventSub` receive loop.
    ///
    /// Both waits share this bound: it is the longest a consumer stays
    /// unresponsive to a stop request when nothing else is happening.
    pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

    /// Upper bound on the `EventSub` TCP, TLS and WebSocket handshake
    pub const WEBSOCKET_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Request timeout for identity provider calls
    pub const OAUTH_REQUEST_TIMEOUT_SECS: u64 = 15;
    /// Connect timeout for identity provider calls
    pub const OAUTH_CONNECT_TIMEOUT_SECS: u64 = 5;
    /// Request timeout for Helix and webhook calls
    pub const API_REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Connect timeout for Helix and webhook calls
    pub const API_CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// `EventSub` protocol names
pub mod eventsub {
    /// Subscription type fired when a broadcaster goes live
    pub const STREAM_ONLINE: &str = "stream.online";
    /// Subscription version requested for `stream.online`
    pub const STREAM_ONLINE_VERSION: &str = "1";
    /// Transport method for WebSocket subscriptions
    pub const TRANSPORT_WEBSOCKET: &str = "websocket";

    /// Message type of the first frame on a new session
    pub const MESSAGE_WELCOME: &str = "session_welcome";
    /// Message type carrying an event
    pub const MESSAGE_NOTIFICATION: &str = "notification";
    /// Keepalive frame
    pub const MESSAGE_KEEPALIVE: &str = "session_keepalive";
    /// Server-initiated reconnect request
    pub const MESSAGE_RECONNECT: &str = "session_reconnect";
    /// Subscription revoked by Twitch
    pub const MESSAGE_REVOCATION: &str = "revocation";
}

/// Twitch endpoint bases
pub mod twitch {
    /// Production `EventSub` WebSocket
    pub const WEBSOCKET_URL: &str = "wss://eventsub.wss.twitch.tv/ws";
    /// Production Helix REST base
    pub const HELIX_URL: &str = "https://api.twitch.tv/helix";
    /// Production identity provider base
    pub const AUTH_URL: &str = "https://id.twitch.tv/oauth2";

    /// Debug (twitch-cli mock) `EventSub` WebSocket
    pub const DEBUG_WEBSOCKET_URL: &str = "ws://127.0.0.1:8081/ws";
    /// Debug Helix mock base
    pub const DEBUG_HELIX_URL: &str = "http://localhost:8080/mock";
    /// Debug identity provider mock base
    pub const DEBUG_AUTH_URL: &str = "http://localhost:8080/auth";
    /// Debug `EventSub` subscription endpoint base
    pub const DEBUG_EVENTSUB_URL: &str = "http://127.0.0.1:8081";

    /// User the mock identity provider issues debug tokens for
    pub const DEBUG_USER_ID: &str = "40764486";

    /// Canonical channel URL prefix
    pub const CHANNEL_URL_PREFIX: &str = "https://twitch.tv/";

    /// Thumbnail template placeholder
    pub const THUMBNAIL_PLACEHOLDER: &str = "{width}x{height}";
    /// Fixed thumbnail resolution substituted into the template
    pub const THUMBNAIL_RESOLUTION: &str = "853x480";
}

/// Discord webhook constants
pub mod discord {
    /// Every webhook URL must start with this base
    pub const WEBHOOK_BASE: &str = "https://discord.com/api/webhooks";
    /// Display name the webhook posts as
    pub const WEBHOOK_NAME: &str = "Twitch Notifier";
    /// Avatar the webhook posts with
    pub const WEBHOOK_AVATAR: &str = "https://static-cdn.jtvnw.net/jtv_user_pictures/8a6381c7-d0c0-4576-b179-38bd5ce1d6af-profile_image-300x300.png";
    /// Footer attached to every embed
    pub const EMBED_FOOTER: &str = "This message is from Azure's Twitchbot!";
    /// Title of status channel embeds
    pub const STATUS_TITLE: &str = "System Notification";
    /// Twitch brand purple used for go-live embeds
    pub const TWITCH_PURPLE: u32 = 0x0064_41a5;
}

/// Configuration defaults
pub mod defaults {
    /// Public hostname used for the OAuth redirect
    pub const HOSTNAME: &str = "http://localhost:5000";
    /// HTTP port for the trigger surface
    pub const HTTP_PORT: u16 = 5000;
    /// Credential database location
    pub const DATABASE_URL: &str = "sqlite:data/twitch.db";
    /// Configuration file location
    pub const CONFIG_PATH: &str = "data/config.json";
    /// Prefix for environment overrides of configuration keys
    pub const CONFIG_ENV_PREFIX: &str = "CONFIG_";
    /// Name of the single background worker
    pub const WORKER_NAME: &str = "Worker-1";
}
