// ABOUTME: Credential lifecycle against the Twitch identity provider
// ABOUTME: Exchanges codes, refreshes, validates and invalidates the stored credential
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Token Lifecycle
//!
//! Validation gates the event session: a session only starts once `validate`
//! reports a usable credential. Two provider answers mutate durable state as
//! a side effect of failure:
//!
//! - `400` on refresh: the refresh token is permanently invalid, the
//!   credential is cleared and the user must log in again
//! - `401` on validate after the single allowed refresh: the credential is
//!   cleared
//!
//! Every other non-success answer is transient: it is logged, the stored
//! credential is left alone and the caller gets a failure outcome.

use super::client::{ProviderResponse, TwitchOAuthClient};
use crate::database::{Credential, CredentialStore};
use notifier_core::errors::{AppError, AppResult};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Refresh attempts a single `validate` call may make before giving up
pub const MAX_REFRESH_ATTEMPTS: u32 = 1;

/// Result of a refresh attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new credential was stored
    Refreshed,
    /// Nothing to refresh: no credential is stored
    NoCredential,
    /// The credential was cleared (no refresh token, or the provider rejected it)
    Invalidated,
    /// The provider failed; the stored credential is unchanged
    TransientFailure,
}

impl RefreshOutcome {
    /// Whether a new credential is now stored
    #[must_use]
    pub const fn is_refreshed(self) -> bool {
        matches!(self, Self::Refreshed)
    }
}

/// Result of a validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The stored credential is accepted by the identity provider
    Valid,
    /// No credential is stored
    NoCredential,
    /// The access token was rejected and refreshing it failed
    RefreshFailed(RefreshOutcome),
    /// The provider kept rejecting the credential after the allowed refreshes
    Rejected,
    /// The provider answered with an unexpected status
    ProviderError(u16),
}

impl ValidationOutcome {
    /// Whether the stored credential can be used
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Validate, refresh and invalidate the single stored credential
pub struct TokenLifecycle<S: CredentialStore + ?Sized> {
    client: TwitchOAuthClient,
    store: Arc<S>,
    debug: bool,
}

impl<S: CredentialStore + ?Sized> TokenLifecycle<S> {
    /// Create a lifecycle over `store`. In `debug` mode `exchange_for_token`
    /// uses the mock provider's direct user-token grant instead of the code.
    pub fn new(client: TwitchOAuthClient, store: Arc<S>, debug: bool) -> Self {
        Self {
            client,
            store,
            debug,
        }
    }

    /// The raw identity provider client
    #[must_use]
    pub const fn client(&self) -> &TwitchOAuthClient {
        &self.client
    }

    /// The credential store this lifecycle writes to
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Whether the debug token grant is in use
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// Exchange an authorization code (or, in debug mode, perform the direct
    /// grant) and store the resulting credential.
    ///
    /// # Errors
    ///
    /// Returns an external service error on any non-success status, without
    /// touching the stored credential. Transport, malformed body and store
    /// failures are returned as-is.
    pub async fn exchange_for_token(&self, code: &str) -> AppResult<()> {
        let response = if self.debug {
            self.client.request_debug_token().await?
        } else {
            self.client.request_code_token(code).await?
        };

        if !response.is_success() {
            error!(
                "Twitch token retrieval failed with code {}!",
                response.status.as_u16()
            );
            error!("{}", response.body);
            return Err(provider_error("token exchange", &response));
        }

        let credential = Credential::from_token_response(&response.body)?;
        self.store.set(&credential).await?;
        info!("Stored new Twitch credential");
        Ok(())
    }

    /// Exchange the stored refresh token for a new credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails, the request cannot be sent, or a
    /// success response is missing `access_token`
    pub async fn refresh(&self) -> AppResult<RefreshOutcome> {
        let Some(credential) = self.store.get().await? else {
            return Ok(RefreshOutcome::NoCredential);
        };

        let Some(refresh_token) = credential.refresh.as_deref() else {
            // Left behind by a debug grant; nothing can be refreshed
            warn!("Stored credential has no refresh token, clearing it");
            self.store.clear().await?;
            return Ok(RefreshOutcome::Invalidated);
        };

        let response = self.client.request_refresh(refresh_token).await?;

        if response.status == StatusCode::BAD_REQUEST {
            error!("Bad refresh token! User must log in again!");
            self.store.clear().await?;
            return Ok(RefreshOutcome::Invalidated);
        }

        if !response.is_success() {
            error!(
                "Twitch token refresh failed with code {}!",
                response.status.as_u16()
            );
            error!("{}", response.body);
            return Ok(RefreshOutcome::TransientFailure);
        }

        let credential = Credential::from_token_response(&response.body)?;
        self.store.set(&credential).await?;
        info!("Twitch token refreshed");
        Ok(RefreshOutcome::Refreshed)
    }

    /// Validate the stored credential, refreshing it at most
    /// [`MAX_REFRESH_ATTEMPTS`] times when the provider answers 401.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or a request cannot be sent
    pub async fn validate(&self) -> AppResult<ValidationOutcome> {
        info!("Validating Twitch token...");
        let mut refreshes = 0;

        loop {
            let Some(credential) = self.store.get().await? else {
                return Ok(ValidationOutcome::NoCredential);
            };

            let response = self.client.request_validate(&credential.access).await?;

            if response.status == StatusCode::UNAUTHORIZED {
                if refreshes >= MAX_REFRESH_ATTEMPTS {
                    error!("Twitch token still rejected after refresh, clearing it");
                    self.store.clear().await?;
                    return Ok(ValidationOutcome::Rejected);
                }
                refreshes += 1;

                info!("Refreshing token...");
                let outcome = self.refresh().await?;
                if !outcome.is_refreshed() {
                    return Ok(ValidationOutcome::RefreshFailed(outcome));
                }
                continue;
            }

            if !response.is_success() {
                error!(
                    "Twitch token validation failed with code {}!",
                    response.status.as_u16()
                );
                error!("{}", response.body);
                return Ok(ValidationOutcome::ProviderError(response.status.as_u16()));
            }

            return Ok(ValidationOutcome::Valid);
        }
    }

    /// Forget the stored credential
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn logout(&self) -> AppResult<()> {
        self.store.clear().await
    }
}

fn provider_error(operation: &str, response: &ProviderResponse) -> AppError {
    AppError::external_service(
        "twitch",
        format!(
            "{operation} failed with status {}: {}",
            response.status.as_u16(),
            response.body
        ),
    )
}
