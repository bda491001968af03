// ABOUTME: Authentication routes for registration, login, federated login, and token refresh
// ABOUTME: AuthService holds the account rules; AuthRoutes maps them onto /api/auth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use super::parse_body;
use crate::auth::{TokenPair, TokenType};
use crate::constants::limits::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::identity::FederatedIdentity;
use crate::logging::AppLogger;
use crate::models::User;
use crate::onboarding::fields::user_view;
use crate::resources::ServerResources;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const USERNAME_FALLBACK: &str = "user";
const MAX_USERNAME_SUFFIX: u32 = 1000;

/// Registration payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    /// Email address
    pub email: Option<String>,
    /// Display handle
    pub username: Option<String>,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Plain-text password
    pub password: Option<String>,
    /// Must equal `password`
    #[serde(alias = "password2")]
    pub confirm_password: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    /// Email address
    pub email: Option<String>,
    /// Plain-text password
    pub password: Option<String>,
}

/// Token refresh payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RefreshRequest {
    /// Refresh token issued at login
    #[serde(alias = "refresh_token")]
    pub refresh: Option<String>,
}

/// Federated login payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FederatedLoginRequest {
    /// ID token issued by the identity provider
    #[serde(alias = "token", alias = "credential")]
    pub id_token: Option<String>,
}

/// Account plus a fresh token pair
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Principal with frontend field names
    pub user: Value,
    /// Access and refresh tokens
    pub tokens: TokenPair,
    /// Human readable outcome
    pub message: String,
    /// Whether federated login created the account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
}

impl AuthResponse {
    fn new(user: &User, tokens: TokenPair, message: &str) -> Self {
        Self {
            user: user_view(user),
            tokens,
            message: message.to_owned(),
            created: None,
        }
    }
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::missing_field(field))
}

fn optional_name(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Username candidate from an email local part
fn username_base(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let base: String = local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    if base.is_empty() {
        USERNAME_FALLBACK.to_owned()
    } else {
        base
    }
}

/// Account rules behind the authentication routes
pub struct AuthService<'a> {
    resources: &'a ServerResources,
}

impl<'a> AuthService<'a> {
    /// Create a service over the shared resources
    #[must_use]
    pub const fn new(resources: &'a ServerResources) -> Self {
        Self { resources }
    }

    /// Create a password account and log it in
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing or malformed field, a short
    /// password, or mismatched passwords, and `RESOURCE_ALREADY_EXISTS` for a
    /// taken email or username
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let email = required(request.email, "email")?.to_lowercase();
        if !Self::is_valid_email(&email) {
            return Err(AppError::invalid_format("email", "Enter a valid email address"));
        }
        let username = required(request.username, "username")?;
        let password = request
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::missing_field("password"))?;
        if !Self::is_valid_password(&password) {
            return Err(AppError::out_of_range(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }
        if request.confirm_password.as_deref() != Some(password.as_str()) {
            return Err(AppError::invalid_input("Passwords don't match")
                .with_detail("field", "confirm_password"));
        }

        info!(email = %email, "User registration attempt");
        let users = self.resources.database.users();
        if users.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::already_exists("A user with this email already exists")
                .with_detail("field", "email"));
        }
        if users.username_exists(&username).await? {
            return Err(AppError::already_exists("A user with this username already exists")
                .with_detail("field", "username"));
        }

        let password_hash = self.resources.auth_manager.hash_password(&password).await?;
        let user = User::new(email, username, Some(password_hash))
            .with_names(optional_name(request.first_name), optional_name(request.last_name));
        users.create_user(&user).await?;

        let tokens = self.resources.auth_manager.issue_token_pair(&user)?;
        AppLogger::log_auth_event(&user.id.to_string(), "register", true, None);
        Ok(AuthResponse::new(&user, tokens, "User registered successfully"))
    }

    /// Log in with email and password
    ///
    /// # Errors
    ///
    /// Returns `AUTH_INVALID` with one message for an unknown email, a wrong
    /// password, a federated-only account, or an inactive account
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = required(request.email, "email")?.to_lowercase();
        let password = request
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::missing_field("password"))?;

        let Some(user) = self.resources.database.users().get_user_by_email(&email).await? else {
            AppLogger::log_security_event("login_failed", "unknown email", None);
            return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
        };
        let user_id = user.id.to_string();

        let verified = match user.password_hash.as_deref() {
            Some(hash) => {
                self.resources
                    .auth_manager
                    .verify_password(&password, hash)
                    .await?
            }
            None => false,
        };
        if !verified {
            AppLogger::log_security_event("login_failed", "bad credentials", Some(&user_id));
            return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
        }
        if !user.is_active {
            AppLogger::log_security_event("login_failed", "inactive account", Some(&user_id));
            return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
        }

        let tokens = self.resources.auth_manager.issue_token_pair(&user)?;
        AppLogger::log_auth_event(&user_id, "login", true, None);
        Ok(AuthResponse::new(&user, tokens, "Login successful"))
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// # Errors
    ///
    /// Returns an authentication error for an invalid, expired, or access
    /// token, or for an account that is gone or inactive
    pub async fn refresh_token(&self, request: RefreshRequest) -> AppResult<TokenPair> {
        let token = required(request.refresh, "refresh")?;
        let claims = self
            .resources
            .auth_manager
            .validate_token(&token, TokenType::Refresh)?;
        let user_id = claims.user_id()?;

        let user = self
            .resources
            .database
            .users()
            .get_user(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::auth_invalid("Account no longer exists or is disabled"))?;

        let tokens = self.resources.auth_manager.issue_token_pair(&user)?;
        AppLogger::log_auth_event(&user.id.to_string(), "refresh", true, None);
        Ok(tokens)
    }

    /// Log in with a federated ID token, creating the account on first use
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_ERROR` when federated login is disabled, an
    /// authentication error for a rejected token or inactive account, or an
    /// external service error when the provider cannot be reached
    pub async fn federated_login(&self, request: FederatedLoginRequest) -> AppResult<AuthResponse> {
        let id_token = required(request.id_token, "id_token")?;
        let provider = &self.resources.identity_provider;
        let identity = provider.verify(&id_token).await.inspect_err(|e| {
            AppLogger::log_security_event("federated_login_failed", &e.message, None);
        })?;

        let (user, created) = self.find_or_create(identity).await?;
        if !user.is_active {
            AppLogger::log_security_event(
                "federated_login_failed",
                "inactive account",
                Some(&user.id.to_string()),
            );
            return Err(AppError::auth_invalid("Account is disabled"));
        }

        let tokens = self.resources.auth_manager.issue_token_pair(&user)?;
        AppLogger::log_auth_event(
            &user.id.to_string(),
            "federated_login",
            true,
            Some(provider.name()),
        );
        let message = if created {
            "User created and logged in successfully"
        } else {
            "Login successful"
        };
        let mut response = AuthResponse::new(&user, tokens, message);
        response.created = Some(created);
        Ok(response)
    }

    async fn find_or_create(&self, identity: FederatedIdentity) -> AppResult<(User, bool)> {
        let users = self.resources.database.users();
        if let Some(user) = users.get_user_by_email(&identity.email).await? {
            return Ok((user, false));
        }

        let username = self.unique_username(&identity.email).await?;
        let user = User::new(identity.email.clone(), username, None)
            .with_names(identity.first_name, identity.last_name);

        match users.create_user(&user).await {
            Ok(_) => {
                info!(user_id = %user.id, "Account created through federated login");
                Ok((user, true))
            }
            // A concurrent login created the account first
            Err(e) if e.code == ErrorCode::ResourceAlreadyExists => {
                warn!("Federated account creation raced, reloading by email");
                let user = users
                    .get_user_by_email(&identity.email)
                    .await?
                    .ok_or(e)?;
                Ok((user, false))
            }
            Err(e) => Err(e),
        }
    }

    async fn unique_username(&self, email: &str) -> AppResult<String> {
        let users = self.resources.database.users();
        let base = username_base(email);
        if !users.username_exists(&base).await? {
            return Ok(base);
        }
        for suffix in 1..=MAX_USERNAME_SUFFIX {
            let candidate = format!("{base}{suffix}");
            if !users.username_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        let tail = Uuid::new_v4().simple().to_string();
        Ok(format!("{base}{}", &tail[..8]))
    }

    /// Validate email format
    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        if email.len() <= 5 {
            return false;
        }
        let Some(at_pos) = email.find('@') else {
            return false;
        };
        if at_pos == 0 || at_pos == email.len() - 1 {
            return false;
        }
        email[at_pos + 1..].contains('.')
    }

    /// Validate password length
    #[must_use]
    pub fn is_valid_password(password: &str) -> bool {
        password.chars().count() >= MIN_PASSWORD_LENGTH
    }
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/google-login", post(Self::handle_federated_login))
            .route("/api/auth/token/refresh", post(Self::handle_refresh))
            .with_state(resources)
    }

    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let request: RegisterRequest = parse_body(body)?;
        let response = AuthService::new(&resources).register(request).await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let request: LoginRequest = parse_body(body)?;
        let response = AuthService::new(&resources).login(request).await?;
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    async fn handle_federated_login(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let request: FederatedLoginRequest = parse_body(body)?;
        let response = AuthService::new(&resources).federated_login(request).await?;
        let status = if response.created == Some(true) {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };
        Ok((status, Json(response)).into_response())
    }

    async fn handle_refresh(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let request: RefreshRequest = parse_body(body)?;
        let tokens = AuthService::new(&resources).refresh_token(request).await?;
        Ok((StatusCode::OK, Json(tokens)).into_response())
    }
}
