// ABOUTME: Twitch Helix REST client used by the event session
// ABOUTME: Resolves the current user and stream and creates EventSub subscriptions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Helix
//!
//! The event session only needs three platform calls, captured by the
//! [`StreamPlatform`] trait so the session can be driven by a fake in tests.

mod client;
mod models;

pub use client::HelixClient;
pub use models::{SubscriptionRequest, SubscriptionTransport, TwitchStream, TwitchUser};

use async_trait::async_trait;
use notifier_core::errors::AppResult;

/// Platform calls the event session depends on
#[async_trait]
pub trait StreamPlatform: Send + Sync {
    /// The user the stored credential belongs to; `None` when logged out or
    /// when the platform refuses the request
    async fn current_user(&self) -> AppResult<Option<TwitchUser>>;

    /// The live stream of `user_id`; `None` when not (yet) visible
    async fn stream(&self, user_id: &str) -> AppResult<Option<TwitchStream>>;

    /// Create an `EventSub` subscription; `true` when the platform accepted it
    async fn create_subscription(&self, request: &SubscriptionRequest) -> AppResult<bool>;
}
