// ABOUTME: HTTP middleware for bearer authentication and cross-origin access
// ABOUTME: Request ids and tracing layers are assembled in the server module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

/// Bearer token authentication
pub mod auth;
/// CORS layer configuration
pub mod cors;

// Authentication middleware
pub use auth::{AuthMiddleware, AuthResult};

// CORS configuration
pub use cors::setup_cors;
