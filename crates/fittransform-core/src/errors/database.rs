// ABOUTME: Conversion from sqlx errors into AppError
// ABOUTME: Unique-constraint violations become conflicts, everything else a database error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use super::{AppError, ErrorCode};

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => Self::not_found("Record"),
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
                Self::new(ErrorCode::ResourceAlreadyExists, db_error.message().to_owned())
            }
            _ => Self::database(error.to_string()),
        }
    }
}
