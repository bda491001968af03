// ABOUTME: Route module organization for FitTransform HTTP endpoints
// ABOUTME: Domain route sets plus the shared bearer, pagination, and path-id helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! Route module for the FitTransform server
//!
//! Each domain module holds its route table and thin handlers that delegate
//! to the engines in [`ServerResources`]. Every route except health,
//! registration, login, federated login, and token refresh requires an
//! access token.

/// Registration, login, federated login, and token refresh
pub mod auth;
/// Goal and plan-run routes
pub mod goals;
/// Health check and readiness routes
pub mod health;
/// Workout plan, day, and prescription routes
pub mod plans;
/// Profile, onboarding, and body entity routes
pub mod profile;
/// Progress snapshot and analytics routes
pub mod progress;
/// Workout session, catalog, and completed-workout routes
pub mod workouts;

use std::sync::Arc;

use axum::Router;
use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::middleware::AuthResult;
use crate::pagination::{PageQuery, PageRequest};
use crate::resources::ServerResources;

/// Authentication route handlers
pub use auth::AuthRoutes;
/// Authentication service
pub use auth::AuthService;
/// Goal and plan-run route handlers
pub use goals::GoalRoutes;
/// Health route handlers
pub use health::HealthRoutes;
/// Workout plan route handlers
pub use plans::PlanRoutes;
/// Profile and onboarding route handlers
pub use profile::ProfileRoutes;
/// Progress route handlers
pub use progress::ProgressRoutes;
/// Workout route handlers
pub use workouts::WorkoutRoutes;

/// All API routes merged into one router
#[must_use]
pub fn api_router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(Arc::clone(resources)))
        .merge(ProfileRoutes::routes(Arc::clone(resources)))
        .merge(ProgressRoutes::routes(Arc::clone(resources)))
        .merge(WorkoutRoutes::routes(Arc::clone(resources)))
        .merge(PlanRoutes::routes(Arc::clone(resources)))
        .merge(GoalRoutes::routes(Arc::clone(resources)))
}

/// Authenticate the bearer token in the request headers
pub(crate) async fn authenticate(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> AppResult<AuthResult> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok());
    resources
        .auth_middleware
        .authenticate_request(auth_header)
        .await
}

/// Validate pagination parameters against the configured defaults
pub(crate) fn page_request(query: &PageQuery, resources: &ServerResources) -> AppResult<PageRequest> {
    let limits = &resources.config.pagination;
    PageRequest::parse(
        query.page.as_deref(),
        query.page_size.as_deref(),
        limits.default_page_size,
        limits.max_page_size,
    )
}

/// Parse a numeric path id
pub(crate) fn parse_id(raw: &str, field: &str) -> AppResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::invalid_format(field, format!("{field} must be an integer, got '{raw}'")))
}

/// Deserialize a typed request body, reporting failures as validation errors
pub(crate) fn parse_body<T: DeserializeOwned>(body: Value) -> AppResult<T> {
    serde_json::from_value(body).map_err(|e| AppError::invalid_input(format!("Invalid request body: {e}")))
}
