// ABOUTME: HTTP implementation of the StreamPlatform trait against Helix
// ABOUTME: Reads the bearer token from the credential store on every call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::models::{DataEnvelope, SubscriptionRequest, TwitchStream, TwitchUser};
use super::StreamPlatform;
use crate::config::ServerConfig;
use crate::database::CredentialStore;
use crate::utils::http_client::api_client;
use async_trait::async_trait;
use notifier_core::errors::AppResult;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Helix client authenticated with the stored credential
pub struct HelixClient<S: CredentialStore + ?Sized> {
    client: reqwest::Client,
    store: Arc<S>,
    client_id: String,
    helix_base: String,
    eventsub_base: String,
}

impl<S: CredentialStore + ?Sized> HelixClient<S> {
    /// Create a client for the given bases
    pub fn new(
        store: Arc<S>,
        client_id: impl Into<String>,
        helix_base: impl Into<String>,
        eventsub_base: impl Into<String>,
    ) -> Self {
        Self {
            client: api_client(),
            store,
            client_id: client_id.into(),
            helix_base: helix_base.into(),
            eventsub_base: eventsub_base.into(),
        }
    }

    /// Create a client from the server configuration
    pub fn from_config(store: Arc<S>, config: &ServerConfig) -> Self {
        Self::new(
            store,
            config.twitch.client_id.clone(),
            config.twitch.endpoints.helix.clone(),
            config.twitch.endpoints.eventsub.clone(),
        )
    }

    /// Attach bearer and client-id headers, or `None` when logged out
    async fn authorized(&self, request: RequestBuilder) -> AppResult<Option<RequestBuilder>> {
        let Some(credential) = self.store.get().await? else {
            return Ok(None);
        };
        Ok(Some(
            request
                .bearer_auth(&credential.access)
                .header("Client-Id", &self.client_id),
        ))
    }

    /// First element of a Helix `data` array from a 200 response
    async fn first_item<T: DeserializeOwned>(
        response: Response,
        what: &str,
    ) -> AppResult<Option<T>> {
        let status = response.status();
        if status != StatusCode::OK {
            error!("{what} failed with code {}!", status.as_u16());
            error!("{}", response.text().await.unwrap_or_default());
            return Ok(None);
        }

        let envelope: DataEnvelope<T> = response.json().await?;
        let item = envelope.data.into_iter().next();
        if item.is_none() {
            warn!("{what} returned no data");
        }
        Ok(item)
    }
}

#[async_trait]
impl<S: CredentialStore + ?Sized> StreamPlatform for HelixClient<S> {
    async fn current_user(&self) -> AppResult<Option<TwitchUser>> {
        let request = self.client.get(format!("{}/users", self.helix_base));
        let Some(request) = self.authorized(request).await? else {
            return Ok(None);
        };

        let response = request.send().await?;
        Self::first_item(response, "User data").await
    }

    async fn stream(&self, user_id: &str) -> AppResult<Option<TwitchStream>> {
        let request = self
            .client
            .get(format!("{}/streams", self.helix_base))
            .query(&[("user_id", user_id)]);
        let Some(request) = self.authorized(request).await? else {
            return Ok(None);
        };

        let response = request.send().await?;
        let stream = Self::first_item(response, "Stream data").await?;
        if stream.is_some() {
            info!("Successfully fetched stream info for {user_id} via REST!");
        }
        Ok(stream)
    }

    async fn create_subscription(&self, request_body: &SubscriptionRequest) -> AppResult<bool> {
        let request = self
            .client
            .post(format!("{}/eventsub/subscriptions", self.eventsub_base))
            .json(request_body);
        let Some(request) = self.authorized(request).await? else {
            return Ok(false);
        };

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::ACCEPTED {
            error!(
                "EventSub add subscription failed with code {}!",
                status.as_u16()
            );
            error!("{}", response.text().await.unwrap_or_default());
            return Ok(false);
        }

        info!(
            "Successfully subscribed WebSocket {} to '{}' via REST!",
            request_body.transport.session_id, request_body.event_type
        );
        Ok(true)
    }
}
