// ABOUTME: Health check route reporting the event session state
// ABOUTME: Used by process supervisors and the integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::AppState;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes(state: AppState) -> axum::Router {
        use axum::{extract::State, routing::get, Json, Router};

        async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "ok",
                "session": state.session.current_state().as_str(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new()
            .route("/health", get(health_handler))
            .with_state(state)
    }
}
