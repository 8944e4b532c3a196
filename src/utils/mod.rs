// ABOUTME: Utility module with shared helpers
// ABOUTME: Houses the HTTP client factory used by the Twitch and Discord clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// HTTP client construction with explicit timeouts
pub mod http_client;
