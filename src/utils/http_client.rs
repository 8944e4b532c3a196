// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: Every outbound call gets an explicit request and connect timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use notifier_core::constants::timing;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Create a new HTTP client with custom timeout settings
///
/// Falls back to a default client if the builder fails (only possible when
/// the TLS backend cannot initialize).
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Create a new HTTP client optimized for OAuth flows
///
/// Token exchanges and validation should be fast, so timeouts are short.
#[must_use]
pub fn oauth_client() -> Client {
    create_client_with_timeout(
        timing::OAUTH_REQUEST_TIMEOUT_SECS,
        timing::OAUTH_CONNECT_TIMEOUT_SECS,
    )
}

/// Create a new HTTP client for Helix and Discord webhook calls
#[must_use]
pub fn api_client() -> Client {
    create_client_with_timeout(
        timing::API_REQUEST_TIMEOUT_SECS,
        timing::API_CONNECT_TIMEOUT_SECS,
    )
}
