// ABOUTME: Shared server resources handed to every route as axum state
// ABOUTME: Database, token manager, auth middleware, configuration, and identity provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::goals::GoalTracker;
use crate::identity::{provider_from_config, FederatedIdentityProvider};
use crate::middleware::AuthMiddleware;
use crate::onboarding::ProfileMergeEngine;
use crate::plans::PlanCatalog;
use crate::progress::ProgressAggregator;
use crate::workouts::WorkoutAggregator;

/// Resources shared by all request handlers
///
/// Built once at startup and wrapped in an `Arc`; engines are cheap handles
/// over the same database.
pub struct ServerResources {
    /// Database handle
    pub database: Arc<Database>,
    /// Token issuance and password hashing
    pub auth_manager: AuthManager,
    /// Bearer authentication for protected routes
    pub auth_middleware: AuthMiddleware,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Federated login verifier
    pub identity_provider: Arc<dyn FederatedIdentityProvider>,
    /// Onboarding and profile merges
    pub onboarding: ProfileMergeEngine,
    /// Progress snapshots
    pub progress: ProgressAggregator,
    /// Workout sessions and catalog
    pub workouts: WorkoutAggregator,
    /// Workout plans and their schedules
    pub plans: PlanCatalog,
    /// Goals and plan runs
    pub goals: GoalTracker,
}

impl ServerResources {
    /// Assemble resources with the identity provider described by configuration
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: Arc<ServerConfig>) -> Self {
        let identity_provider = provider_from_config(&config.google);
        Self::with_identity_provider(database, auth_manager, config, identity_provider)
    }

    /// Assemble resources with an explicit identity provider
    #[must_use]
    pub fn with_identity_provider(
        database: Database,
        auth_manager: AuthManager,
        config: Arc<ServerConfig>,
        identity_provider: Arc<dyn FederatedIdentityProvider>,
    ) -> Self {
        let database = Arc::new(database);
        Self {
            auth_middleware: AuthMiddleware::new(auth_manager.clone(), Arc::clone(&database)),
            onboarding: ProfileMergeEngine::new(Arc::clone(&database)),
            progress: ProgressAggregator::new(Arc::clone(&database)),
            workouts: WorkoutAggregator::new(Arc::clone(&database)),
            plans: PlanCatalog::new(Arc::clone(&database)),
            goals: GoalTracker::new(Arc::clone(&database)),
            database,
            auth_manager,
            config,
            identity_provider,
        }
    }
}
