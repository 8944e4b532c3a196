// ABOUTME: Raw HTTP calls against the Twitch identity provider
// ABOUTME: Builds authorization URLs and performs token, refresh and validate requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::ServerConfig;
use crate::utils::http_client::oauth_client;
use anyhow::Result;
use notifier_core::constants::twitch;
use notifier_core::errors::AppResult;
use reqwest::{Response, StatusCode};
use serde_json::Value;
use url::Url;

/// Application credentials and identity provider location
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    /// OAuth client ID from Twitch
    pub client_id: String,
    /// OAuth client secret from Twitch
    pub client_secret: String,
    /// Redirect URI registered for the callback route
    pub redirect_uri: String,
    /// Identity provider base URL (`/authorize`, `/token`, `/validate`)
    pub auth_base: String,
}

impl OAuthSettings {
    /// Derive OAuth settings from the server configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured hostname is not a valid URL
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            client_id: config.twitch.client_id.clone(),
            client_secret: config.twitch.client_secret.clone(),
            redirect_uri: config.redirect_uri()?,
            auth_base: config.twitch.endpoints.auth.clone(),
        })
    }
}

/// Status and decoded body of an identity provider response
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// HTTP status
    pub status: StatusCode,
    /// JSON body, or the raw text wrapped in a JSON string when not JSON
    pub body: Value,
}

impl ProviderResponse {
    /// Read status and body from a `reqwest` response
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be read
    pub async fn read(response: Response) -> AppResult<Self> {
        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(Self { status, body })
    }

    /// Whether the status is 2xx
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// OAuth 2.0 client for the Twitch identity provider
pub struct TwitchOAuthClient {
    settings: OAuthSettings,
    client: reqwest::Client,
}

impl TwitchOAuthClient {
    /// Create a new client with the shared OAuth timeouts
    #[must_use]
    pub fn new(settings: OAuthSettings) -> Self {
        Self {
            settings,
            client: oauth_client(),
        }
    }

    /// Get the OAuth settings
    #[must_use]
    pub const fn settings(&self) -> &OAuthSettings {
        &self.settings
    }

    /// Authorization URL the login link points at
    ///
    /// # Errors
    ///
    /// Returns an error if the configured identity provider base is malformed
    pub fn authorization_url(&self) -> Result<String> {
        let mut url = Url::parse(&format!("{}/authorize", self.settings.auth_base))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("redirect_uri", &self.settings.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", "");
        Ok(url.to_string())
    }

    /// Exchange an authorization code for tokens
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the body cannot be read
    pub async fn request_code_token(&self, code: &str) -> AppResult<ProviderResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(format!("{}/token", self.settings.auth_base))
            .form(&params)
            .send()
            .await?;

        ProviderResponse::read(response).await
    }

    /// Request a user token directly from the mock identity provider (debug mode)
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the body cannot be read
    pub async fn request_debug_token(&self) -> AppResult<ProviderResponse> {
        let params = [
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("grant_type", "user_token"),
            ("user_id", twitch::DEBUG_USER_ID),
            ("scope", ""),
        ];

        let response = self
            .client
            .post(format!("{}/authorize", self.settings.auth_base))
            .query(&params)
            .send()
            .await?;

        ProviderResponse::read(response).await
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the body cannot be read
    pub async fn request_refresh(&self, refresh_token: &str) -> AppResult<ProviderResponse> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(format!("{}/token", self.settings.auth_base))
            .form(&params)
            .send()
            .await?;

        ProviderResponse::read(response).await
    }

    /// Ask the identity provider whether an access token is still valid
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the body cannot be read
    pub async fn request_validate(&self, access_token: &str) -> AppResult<ProviderResponse> {
        let response = self
            .client
            .get(format!("{}/validate", self.settings.auth_base))
            .bearer_auth(access_token)
            .send()
            .await?;

        ProviderResponse::read(response).await
    }
}
