// ABOUTME: Bearer token authentication for protected API routes
// ABOUTME: Validates access tokens and confirms the account still exists and is active
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::sync::Arc;

use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

use crate::auth::{AuthManager, TokenType};
use crate::database::Database;
use crate::errors::{AppError, AppResult};

/// An authenticated principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// Authenticated user `ID`
    pub user_id: Uuid,
    /// Email claimed by the token
    pub email: String,
}

/// Middleware for bearer token authentication
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: AuthManager,
    database: Arc<Database>,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub const fn new(auth_manager: AuthManager, database: Arc<Database>) -> Self {
        Self {
            auth_manager,
            database,
        }
    }

    /// Authenticate a request from its `Authorization` header value
    ///
    /// # Errors
    ///
    /// Returns `AUTH_REQUIRED` without a header, `AUTH_INVALID` for a non-bearer
    /// header, an unknown or inactive account, or a refresh token, and
    /// `AUTH_EXPIRED` / `AUTH_MALFORMED` from token validation
    #[instrument(
        skip(self, auth_header),
        fields(user_id = tracing::field::Empty, success = tracing::field::Empty)
    )]
    pub async fn authenticate_request(&self, auth_header: Option<&str>) -> AppResult<AuthResult> {
        let result = self.authenticate(auth_header).await;
        match &result {
            Ok(auth) => {
                Span::current()
                    .record("user_id", auth.user_id.to_string())
                    .record("success", true);
                debug!(user_id = %auth.user_id, "Bearer authentication successful");
            }
            Err(e) => {
                Span::current().record("success", false);
                warn!(error = %e, "Bearer authentication failed");
            }
        }
        result
    }

    async fn authenticate(&self, auth_header: Option<&str>) -> AppResult<AuthResult> {
        let header = auth_header.ok_or_else(AppError::auth_required)?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::auth_invalid("Authorization header must be 'Bearer <token>'")
            })?;

        let claims = self.auth_manager.validate_token(token, TokenType::Access)?;
        let user_id = claims.user_id()?;

        let user = self
            .database
            .users()
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Account no longer exists"))?;
        if !user.is_active {
            return Err(AppError::auth_invalid("Account is disabled"));
        }

        Ok(AuthResult {
            user_id,
            email: user.email,
        })
    }

    /// Get reference to the auth manager
    #[must_use]
    pub const fn auth_manager(&self) -> &AuthManager {
        &self.auth_manager
    }
}
