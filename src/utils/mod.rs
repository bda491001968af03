// ABOUTME: Utility modules shared across the engines and routes
// ABOUTME: Currently the lenient JSON payload readers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

/// Lenient JSON payload field readers
pub mod payload;
