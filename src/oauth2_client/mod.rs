// ABOUTME: OAuth 2.0 client for the Twitch identity provider
// ABOUTME: Provides the raw provider calls and the validate/refresh/invalidate lifecycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # OAuth 2.0 Client Module
//!
//! The notifier acts as an OAuth 2.0 client of the Twitch identity provider.
//! This module handles:
//! - Authorization URL construction and code exchange
//! - The debug-mode direct user token grant
//! - Token refresh and validation, including credential invalidation

/// Raw identity provider requests
pub mod client;
/// Credential lifecycle built on top of the raw client
pub mod lifecycle;

pub use client::{OAuthSettings, ProviderResponse, TwitchOAuthClient};
pub use lifecycle::{RefreshOutcome, TokenLifecycle, ValidationOutcome, MAX_REFRESH_ATTEMPTS};
