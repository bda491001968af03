// ABOUTME: Google ID token verification through the tokeninfo endpoint
// ABOUTME: Checks the audience against the configured client id and requires a verified email
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{FederatedIdentity, FederatedIdentityProvider};
use crate::errors::{AppError, AppResult};

const SERVICE: &str = "Google";

/// `tokeninfo` response fields used for login
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    // Reported as the string "true" by tokeninfo, as a bool by some proxies
    #[serde(default)]
    email_verified: Value,
    given_name: Option<String>,
    family_name: Option<String>,
}

impl TokenInfo {
    fn email_verified(&self) -> bool {
        match &self.email_verified {
            Value::Bool(verified) => *verified,
            Value::String(s) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn into_identity(self, client_id: &str) -> AppResult<FederatedIdentity> {
        if self.aud != client_id {
            warn!(audience = %self.aud, "Google token issued for another client");
            return Err(AppError::auth_invalid("Google token audience mismatch"));
        }
        if !self.email_verified() {
            return Err(AppError::auth_invalid("Google account email is not verified"));
        }
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::auth_invalid("Google token carries no email"))?
            .to_lowercase();

        Ok(FederatedIdentity {
            subject: self.sub,
            email,
            first_name: self.given_name.filter(|n| !n.is_empty()),
            last_name: self.family_name.filter(|n| !n.is_empty()),
        })
    }
}

/// Google identity provider
pub struct GoogleIdentityProvider {
    client: Client,
    client_id: String,
    tokeninfo_url: String,
}

impl GoogleIdentityProvider {
    /// Create a provider for one `OAuth` client id
    #[must_use]
    pub fn new(client_id: String, tokeninfo_url: String) -> Self {
        Self {
            client: Client::new(),
            client_id,
            tokeninfo_url,
        }
    }
}

#[async_trait]
impl FederatedIdentityProvider for GoogleIdentityProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn verify(&self, id_token: &str) -> AppResult<FederatedIdentity> {
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AppError::external_unavailable(SERVICE, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            return Err(AppError::auth_invalid("Google rejected the ID token"));
        }
        if !status.is_success() {
            return Err(AppError::external_service(
                SERVICE,
                format!("tokeninfo returned {status}"),
            ));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("Invalid tokeninfo response: {e}")))?;

        debug!(subject = %info.sub, "Google token verified");
        info.into_identity(&self.client_id)
    }
}
