// ABOUTME: Federated identity abstraction for resolving external ID tokens to verified emails
// ABOUTME: Google implementation plus a disabled provider used when no client id is configured
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

/// Google `tokeninfo` verification
pub mod google;

use std::sync::Arc;

use async_trait::async_trait;

pub use google::GoogleIdentityProvider;

use crate::config::GoogleConfig;
use crate::errors::{AppError, AppResult};

/// A verified external identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedIdentity {
    /// Provider-scoped subject id
    pub subject: String,
    /// Verified email address, lowercased
    pub email: String,
    /// Given name, when the provider shares it
    pub first_name: Option<String>,
    /// Family name, when the provider shares it
    pub last_name: Option<String>,
}

/// Resolves an external ID token to a verified identity
#[async_trait]
pub trait FederatedIdentityProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Verify the token and return the identity it asserts
    ///
    /// # Errors
    ///
    /// Returns `AUTH_INVALID` for a rejected token, or an external service
    /// error when the provider cannot be reached
    async fn verify(&self, id_token: &str) -> AppResult<FederatedIdentity>;
}

/// Provider used when federated login is not configured
pub struct DisabledIdentityProvider;

#[async_trait]
impl FederatedIdentityProvider for DisabledIdentityProvider {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn verify(&self, _id_token: &str) -> AppResult<FederatedIdentity> {
        Err(AppError::config("Federated login is not configured"))
    }
}

/// Build the provider described by configuration
#[must_use]
pub fn provider_from_config(config: &GoogleConfig) -> Arc<dyn FederatedIdentityProvider> {
    match &config.client_id {
        Some(client_id) => Arc::new(GoogleIdentityProvider::new(
            client_id.clone(),
            config.tokeninfo_url.clone(),
        )),
        None => Arc::new(DisabledIdentityProvider),
    }
}
