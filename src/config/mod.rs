// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven ServerConfig and its sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform
//! Configuration module for the `FitTransform` server
//!
//! All settings come from environment variables. Tests build a
//! [`ServerConfig`] with [`Default`] and override individual fields.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    AuthConfig, CorsConfig, DatabaseUrl, Environment, GoogleConfig, LogLevel, PaginationConfig,
    ServerConfig,
};
