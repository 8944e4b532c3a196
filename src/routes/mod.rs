// ABOUTME: HTTP trigger surface for logging in and out of Twitch
// ABOUTME: Starts and stops the event session through the job queue
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Routes
//!
//! Logging in enqueues a session run; logging out clears the credential and
//! stops the running session. These are the only two ways the web surface
//! touches the session.

mod health;
mod session;

pub use health::HealthRoutes;
pub use session::SessionRoutes;

use crate::config::ServerConfig;
use crate::database::CredentialStore;
use crate::eventsub::EventSession;
use crate::helix::StreamPlatform;
use crate::jobs::JobQueue;
use crate::oauth2_client::TokenLifecycle;
use axum::Router;
use std::sync::Arc;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Credential lifecycle used by login and logout
    pub lifecycle: Arc<TokenLifecycle<dyn CredentialStore>>,
    /// Helix access for the current user lookup
    pub platform: Arc<dyn StreamPlatform>,
    /// Queue session runs are pushed onto
    pub queue: Arc<JobQueue>,
    /// The event session
    pub session: Arc<EventSession>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Queue one event session run
    pub fn start_session(&self) {
        self.queue.push(self.session.start_job());
    }
}

/// Complete router for the HTTP server
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(SessionRoutes::routes(state.clone()))
        .merge(HealthRoutes::routes(state))
}
