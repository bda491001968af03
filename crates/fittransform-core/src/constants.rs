// ABOUTME: Application-wide constants organized by domain
// ABOUTME: Pagination defaults, validation limits, token lifetimes, and service names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

/// Service identifiers used in logs and token audiences
pub mod service_names {
    /// Service name reported at startup and in structured logs
    pub const FITTRANSFORM_SERVER: &str = "fittransform-server";
    /// `JWT` issuer claim
    pub const TOKEN_ISSUER: &str = "fittransform";
}

/// Defaults for history views
pub mod pagination {
    /// First page, 1-indexed
    pub const DEFAULT_PAGE: u32 = 1;
    /// Page size when the client sends none
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Upper clamp for client-supplied page sizes
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// Validation and aggregation limits
pub mod limits {
    /// Minimum password length at registration
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Most recent sessions included in workout stats
    pub const RECENT_SESSIONS_LIMIT: i64 = 5;
    /// Lowest accepted workout rating
    pub const MIN_RATING: i32 = 1;
    /// Highest accepted workout rating
    pub const MAX_RATING: i32 = 5;
    /// Attempts made by `retry_transaction` before giving up
    pub const TRANSACTION_MAX_RETRIES: u32 = 3;
    /// Lowest bcrypt cost accepted by configuration validation
    pub const MIN_BCRYPT_COST: u32 = 4;
    /// Highest bcrypt cost accepted by configuration validation
    pub const MAX_BCRYPT_COST: u32 = 31;
}

/// Token lifetimes
pub mod tokens {
    /// Access token lifetime in minutes
    pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 60;
    /// Refresh token lifetime in days
    pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;
}

/// Placeholder values for exercises provisioned on demand
pub mod exercises {
    /// Description stored on auto-created exercises
    pub const AUTO_CREATED_DESCRIPTION: &str = "Auto-created exercise";
    /// Prefix of the generated exercise name; the client identifier follows
    pub const AUTO_CREATED_NAME_PREFIX: &str = "Exercise";
}

/// Default values for configuration
pub mod defaults {
    /// HTTP port
    pub const HTTP_PORT: u16 = 8000;
    /// Bind address
    pub const HOST: &str = "0.0.0.0";
    /// `SQLite` file used when `DATABASE_URL` is unset
    pub const DATABASE_URL: &str = "sqlite:./data/fittransform.db";
    /// Google token verification endpoint
    pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
    /// Production bcrypt cost
    pub const BCRYPT_COST: u32 = 12;
    /// Request timeout applied by the HTTP layer
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Maximum accepted request body
    pub const MAX_BODY_BYTES: usize = 1024 * 1024;
}
