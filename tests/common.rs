// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory databases, server resources, users with tokens, and a fake identity provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `fittransform_server`

use std::env;
use std::path::Path;
use std::sync::{Arc, Once};

use async_trait::async_trait;
use chrono::Duration;
use fittransform_server::auth::AuthManager;
use fittransform_server::config::{AuthConfig, DatabaseUrl, ServerConfig};
use fittransform_server::constants::limits::MIN_BCRYPT_COST;
use fittransform_server::database::Database;
use fittransform_server::errors::{AppError, AppResult};
use fittransform_server::identity::{FederatedIdentity, FederatedIdentityProvider};
use fittransform_server::models::User;
use fittransform_server::resources::ServerResources;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Password given to every user created by [`create_test_user`]
pub const TEST_PASSWORD: &str = "password123";

const TEST_JWT_SECRET: &str = "fittransform-test-secret-with-enough-entropy";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Configuration for tests: in-memory database and the cheapest bcrypt cost
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: DatabaseUrl::Memory,
        auth: AuthConfig {
            jwt_secret: Some(TEST_JWT_SECRET.to_owned()),
            bcrypt_cost: MIN_BCRYPT_COST,
            ..AuthConfig::default()
        },
        ..ServerConfig::default()
    }
}

/// Standard test database setup
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new(&DatabaseUrl::Memory)
        .await
        .expect("Failed to create in-memory database")
}

/// Token manager matching [`test_config`]
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(
        TEST_JWT_SECRET.as_bytes(),
        Duration::minutes(15),
        Duration::days(7),
        MIN_BCRYPT_COST,
    )
}

/// Server resources over a fresh in-memory database
pub async fn create_test_resources() -> Arc<ServerResources> {
    create_test_resources_with_provider(Arc::new(FakeIdentityProvider)).await
}

/// Server resources with an explicit identity provider
pub async fn create_test_resources_with_provider(
    provider: Arc<dyn FederatedIdentityProvider>,
) -> Arc<ServerResources> {
    let database = create_test_database().await;
    Arc::new(ServerResources::with_identity_provider(
        database,
        create_test_auth_manager(),
        Arc::new(test_config()),
        provider,
    ))
}

/// Server resources over a file database at `path`, with WAL and a multi-connection pool
pub async fn create_file_test_resources(path: &Path) -> Arc<ServerResources> {
    init_test_logging();
    let database_url = DatabaseUrl::SQLite {
        path: path.to_path_buf(),
    };
    let database = Database::new(&database_url)
        .await
        .expect("Failed to create file database");
    Arc::new(ServerResources::with_identity_provider(
        database,
        create_test_auth_manager(),
        Arc::new(ServerConfig {
            database_url,
            ..test_config()
        }),
        Arc::new(FakeIdentityProvider),
    ))
}

/// Create an active password user and return it with an access token
pub async fn create_test_user(resources: &ServerResources, email: &str) -> (User, String) {
    let username = email.split('@').next().unwrap().to_owned();
    let hash = resources
        .auth_manager
        .hash_password(TEST_PASSWORD)
        .await
        .unwrap();
    let user = User::new(email.to_owned(), username, Some(hash));
    resources.database.users().create_user(&user).await.unwrap();
    let tokens = resources.auth_manager.issue_token_pair(&user).unwrap();
    (user, tokens.access)
}

/// Identity provider that accepts `valid:<email>:<first>:<last>` tokens
pub struct FakeIdentityProvider;

#[async_trait]
impl FederatedIdentityProvider for FakeIdentityProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn verify(&self, id_token: &str) -> AppResult<FederatedIdentity> {
        let mut parts = id_token.split(':');
        if parts.next() != Some("valid") {
            return Err(AppError::auth_invalid("Token rejected by provider"));
        }
        let email = parts
            .next()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::auth_invalid("Token carries no email"))?;
        Ok(FederatedIdentity {
            subject: format!("sub-{email}"),
            email: email.to_lowercase(),
            first_name: parts.next().map(str::to_owned),
            last_name: parts.next().map(str::to_owned),
        })
    }
}
