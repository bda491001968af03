// ABOUTME: Unified error handling re-exported from fittransform-core
// ABOUTME: Keeps `crate::errors::AppError` paths stable for every module in the server crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! # Unified Error Handling System
//!
//! The error types live in `fittransform-core` so the foundation crate and
//! the server share one taxonomy. `AppError` converts into an axum response
//! with the `{"error": {"code", "message", "details"}}` body, and `sqlx`
//! errors convert into `AppError` with unique violations reported as
//! `RESOURCE_ALREADY_EXISTS`.

pub use fittransform_core::errors::*;
