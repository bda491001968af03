// ABOUTME: Core types and constants for the FitTransform fitness tracking backend
// ABOUTME: Foundation crate with error handling, pagination, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

#![deny(unsafe_code)]

//! # `FitTransform` Core
//!
//! Foundation crate providing shared types and constants for the `FitTransform`
//! backend. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Application-wide constants organized by domain
//! - **pagination**: Offset pagination with page/page-size requests
//! - **models**: Principal, body-state, progress, and workout entities

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants and configuration values organized by domain
pub mod constants;

/// Offset pagination shared by every history view
pub mod pagination;

/// Core data models (User, body entities, progress entries, workouts)
pub mod models;
