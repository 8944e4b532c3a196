// ABOUTME: Library entry point for the Twitch go-live notifier
// ABOUTME: EventSub WebSocket session bridged to Discord webhook announcements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Stream Notifier
//!
//! Announces on Discord when a Twitch broadcaster goes live.
//!
//! The broadcaster logs in once through Twitch OAuth. The resulting
//! credential is stored in `SQLite` and gates an `EventSub` WebSocket session
//! that subscribes to `stream.online`. Every matching notification is turned
//! into a rich webhook message.
//!
//! ## Architecture
//!
//! - **Jobs**: FIFO queue with a single background worker; session runs are
//!   queued jobs
//! - **`EventSub`**: the session state machine and announcement rendering
//! - **`OAuth2` client**: code exchange, refresh and validation of the credential
//! - **Helix**: user, stream and subscription REST calls
//! - **Discord**: webhook client, announcement and status messages
//! - **Routes**: login, callback, logout and health endpoints
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use stream_notifier::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load("data/config.json")?;
//!     println!("Serving on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Configuration from the JSON file and environment overrides
pub mod config;

/// Credential model and stores
pub mod database;

/// Discord webhook notifier
pub mod discord;

/// `EventSub` WebSocket session
pub mod eventsub;

/// Helix REST client
pub mod helix;

/// Deferred job queue and worker
pub mod jobs;

/// Structured logging setup
pub mod logging;

/// Twitch identity provider client and token lifecycle
pub mod oauth2_client;

/// HTTP trigger surface
pub mod routes;

/// HTTP client construction
pub mod utils;

pub use notifier_core::{constants, errors};
