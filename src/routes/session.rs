// ABOUTME: Login, OAuth callback and logout handlers
// ABOUTME: Renders the minimal landing page and drives the token lifecycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::AppState;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use http::StatusCode;
use serde::Deserialize;
use tracing::{error, info, warn};

const SERVER_ERROR: &str = "Server-side error. Check Logs.";

/// Query string of the OAuth redirect
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Login and logout routes
pub struct SessionRoutes;

impl SessionRoutes {
    /// Create the session routes
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/", get(Self::handle_index))
            .route("/callback", get(Self::handle_callback))
            .route("/logout", get(Self::handle_logout))
            .route("/debug-get-token", get(Self::handle_debug_token))
            .with_state(state)
    }

    /// Handle GET / - who is logged in, or where to log in
    async fn handle_index(State(state): State<AppState>) -> Response {
        let user = match state.platform.current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!("Could not resolve the current user: {e}");
                None
            }
        };

        if let Some(user) = user {
            let name = html_escape::encode_text(&user.display_name);
            return Html(page(&format!(
                "<p>Logged in as <b>{name}</b>.</p><p><a href=\"/logout\">Log out</a></p>"
            )))
            .into_response();
        }

        let login_url = if state.config.debug {
            "/debug-get-token".to_owned()
        } else {
            match state.lifecycle.client().authorization_url() {
                Ok(url) => url,
                Err(e) => {
                    error!("Could not build the authorization URL: {e}");
                    return (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR).into_response();
                }
            }
        };
        let href = html_escape::encode_double_quoted_attribute(&login_url);
        Html(page(&format!(
            "<p>Not logged in.</p><p><a href=\"{href}\">Log in with Twitch</a></p>"
        )))
        .into_response()
    }

    /// Handle GET /callback - exchange the authorization code and start the session
    async fn handle_callback(
        State(state): State<AppState>,
        Query(query): Query<CallbackQuery>,
    ) -> Response {
        if let Some(reason) = query.error {
            let detail = query.error_description.as_deref();
            warn!(
                "Twitch authorization refused: {reason} ({})",
                detail.unwrap_or("no description")
            );
            return (StatusCode::BAD_REQUEST, "Authorization was refused.").into_response();
        }

        let Some(code) = query.code.filter(|code| !code.is_empty()) else {
            return (StatusCode::BAD_REQUEST, "Missing authorization code.").into_response();
        };

        Self::login(&state, &code).await
    }

    /// Handle GET /debug-get-token - direct grant against the mock provider
    async fn handle_debug_token(State(state): State<AppState>) -> Response {
        if !state.config.debug {
            return StatusCode::NOT_FOUND.into_response();
        }
        Self::login(&state, "").await
    }

    async fn login(state: &AppState, code: &str) -> Response {
        if let Err(e) = state.lifecycle.exchange_for_token(code).await {
            error!("Login failed: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR).into_response();
        }

        info!("Login succeeded, starting event session");
        state.start_session();
        Redirect::to("/").into_response()
    }

    /// Handle GET /logout - forget the credential and stop the session
    async fn handle_logout(State(state): State<AppState>) -> Response {
        match state.platform.current_user().await {
            Ok(Some(user)) => info!("Logging out {}", user.login),
            Ok(None) => {
                return (StatusCode::BAD_REQUEST, "Already logged out.").into_response();
            }
            Err(e) => {
                error!("Could not resolve the current user: {e}");
                return (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR).into_response();
            }
        }

        if let Err(e) = state.lifecycle.logout().await {
            error!("Could not clear the stored credential: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR).into_response();
        }
        state.session.request_stop();
        Redirect::to("/").into_response()
    }
}

fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Twitch Notifier</title></head><body>{body}</body></html>"
    )
}
