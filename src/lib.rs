// ABOUTME: Main library entry point for the FitTransform fitness tracking backend
// ABOUTME: Onboarding merges, progress analytics, workouts, plans, and goals over a REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

#![deny(unsafe_code)]

//! # `FitTransform` Server
//!
//! Backend for a fitness tracking application. Users register (or sign in
//! through Google), walk through a five-step onboarding flow that fills in
//! their profile and body state, log dated progress snapshots and workout
//! sessions, and read back derived statistics.
//!
//! ## Architecture
//!
//! - **onboarding**: step-keyed partial merges onto the user and its one-to-one
//!   body entities, driven by static field-name tables
//! - **progress**: dated snapshot upserts, longitudinal deltas, paginated history
//! - **workouts**: idempotent session and exercise-set merges, rollup statistics
//! - **plans / goals**: authored workout plans with scheduled days, goals and
//!   plan runs with derived progress
//! - **auth / identity**: `JWT` access and refresh tokens, bcrypt passwords,
//!   federated Google login
//! - **database**: `SQLite` persistence with schema-level uniqueness and upserts
//! - **routes / server**: axum HTTP surface with tracing, request ids, and CORS
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fittransform_server::config::environment::ServerConfig;
//! use fittransform_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("FitTransform configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Token issuance, validation, and password hashing
pub mod auth;

/// Environment-driven server configuration
pub mod config;

/// Application constants (re-exported from `fittransform-core`)
pub mod constants {
    pub use fittransform_core::constants::*;
}

/// `SQLite` persistence: connection pool, schema, and entity managers
pub mod database;

/// Unified error handling (re-exported from `fittransform-core`)
pub mod errors;

/// Goal tracker: goals and runs through workout plans
pub mod goals;

/// Federated identity verification (Google)
pub mod identity;

/// Structured logging setup
pub mod logging;

/// HTTP middleware: bearer authentication and CORS
pub mod middleware;

/// Domain models (re-exported from `fittransform-core`)
pub mod models {
    pub use fittransform_core::models::*;
}

/// Profile merge engine for onboarding steps and profile edits
pub mod onboarding;

/// Workout plan catalog: plans, days, and prescribed exercises
pub mod plans;

/// Offset pagination (re-exported from `fittransform-core`)
pub mod pagination {
    pub use fittransform_core::pagination::*;
}

/// Progress aggregator: dated snapshots and longitudinal deltas
pub mod progress;

/// Shared server resources handed to every route
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// HTTP server assembly and lifecycle
pub mod server;

/// Lenient JSON payload readers
pub mod utils;

/// Workout aggregator: session merges and rollup statistics
pub mod workouts;
