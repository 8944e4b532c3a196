// ABOUTME: Bearer credential model persisted by the credential store
// ABOUTME: Parses identity provider token responses into a storable credential
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use notifier_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token type recorded for every stored credential
const BEARER: &str = "bearer";

/// Bearer access/refresh token pair plus lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Token type, always `bearer`
    pub token_type: String,
    /// Access token sent as `Authorization: Bearer`
    pub access: String,
    /// Refresh token; `None` when recovering from a debug grant that issued none
    pub refresh: Option<String>,
    /// Lifetime in seconds as reported by the identity provider
    pub expires: i64,
}

impl Credential {
    /// Build a bearer credential
    pub fn bearer(access: impl Into<String>, refresh: Option<String>, expires: i64) -> Self {
        Self {
            token_type: BEARER.to_owned(),
            access: access.into(),
            refresh,
            expires,
        }
    }

    /// Build a credential from an identity provider token response.
    ///
    /// # Errors
    ///
    /// Returns a missing-field error when `access_token` is absent or not a
    /// string. `expires_in` defaults to 0 and `refresh_token` is optional so
    /// that debug grants without a refresh token are still accepted.
    pub fn from_token_response(body: &Value) -> AppResult<Self> {
        let access = body
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::missing_field("access_token"))?;

        let expires = body.get("expires_in").and_then(Value::as_i64).unwrap_or(0);

        let refresh = body
            .get("refresh_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(ToOwned::to_owned);

        Ok(Self::bearer(access, refresh, expires))
    }
}
