// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, database URL, token lifetimes, federated login, CORS, and paging limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! Environment-based configuration management for production deployment

use std::env;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn, Level};

use crate::constants::{defaults, limits, pagination, tokens};
use crate::errors::{AppError, AppResult};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (tests)
    Memory,
}

impl DatabaseUrl {
    /// Parse a `DATABASE_URL` value
    ///
    /// `sqlite::memory:` selects the in-memory database, `sqlite:<path>` a file,
    /// and a bare path is treated as a file.
    ///
    /// # Errors
    ///
    /// Returns a config error for empty values and non-SQLite schemes
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AppError::config("DATABASE_URL must not be empty"));
        }

        if let Some(path_str) = trimmed.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            if path_str == ":memory:" {
                return Ok(Self::Memory);
            }
            return Ok(Self::SQLite {
                path: PathBuf::from(path_str),
            });
        }

        if trimmed.contains("://") {
            return Err(AppError::config(format!(
                "Unsupported database URL scheme: {trimmed}"
            )));
        }

        Ok(Self::SQLite {
            path: PathBuf::from(trimmed),
        })
    }

    /// Convert to an `sqlx` connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/fittransform.db"),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Token and password settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for `JWT` signing; a random secret is generated when absent
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    /// Access token lifetime in minutes
    pub access_ttl_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_ttl_days: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_ttl_minutes: tokens::DEFAULT_ACCESS_TTL_MINUTES,
            refresh_ttl_days: tokens::DEFAULT_REFRESH_TTL_DAYS,
            bcrypt_cost: defaults::BCRYPT_COST,
        }
    }
}

/// Google federated login settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// `OAuth` client id expected in the token audience; login is disabled when absent
    pub client_id: Option<String>,
    /// Token verification endpoint
    pub tokeninfo_url: String,
}

impl GoogleConfig {
    /// Whether federated login can be served
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.client_id.is_some()
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            tokeninfo_url: defaults::GOOGLE_TOKENINFO_URL.to_owned(),
        }
    }
}

/// Allowed browser origins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins, or `*` for any
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_owned()],
        }
    }
}

/// History view paging limits
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size when the client sends none
    pub default_page_size: u32,
    /// Upper clamp for client page sizes
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: pagination::DEFAULT_PAGE_SIZE,
            max_page_size: pagination::MAX_PAGE_SIZE,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Database location
    pub database_url: DatabaseUrl,
    /// Token and password settings
    pub auth: AuthConfig,
    /// Google federated login
    pub google: GoogleConfig,
    /// CORS origins
    pub cors: CorsConfig,
    /// Paging limits
    pub pagination: PaginationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            host: defaults::HOST.to_owned(),
            environment: Environment::Development,
            log_level: LogLevel::Info,
            database_url: DatabaseUrl::default(),
            auth: AuthConfig::default(),
            google: GoogleConfig::default(),
            cors: CorsConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error if a variable cannot be parsed or validation fails
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: parse_env("HTTP_PORT", defaults::HTTP_PORT)?,
            host: env_var_or("HOST", defaults::HOST),
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            log_level: LogLevel::from_str_or_default(&env_var_or("RUST_LOG", "info")),
            database_url: DatabaseUrl::parse_url(&env_var_or(
                "DATABASE_URL",
                defaults::DATABASE_URL,
            ))?,
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
                access_ttl_minutes: parse_env(
                    "JWT_ACCESS_TTL_MINUTES",
                    tokens::DEFAULT_ACCESS_TTL_MINUTES,
                )?,
                refresh_ttl_days: parse_env("JWT_REFRESH_TTL_DAYS", tokens::DEFAULT_REFRESH_TTL_DAYS)?,
                bcrypt_cost: parse_env("BCRYPT_COST", defaults::BCRYPT_COST)?,
            },
            google: GoogleConfig {
                client_id: env::var("GOOGLE_CLIENT_ID").ok().filter(|s| !s.is_empty()),
                tokeninfo_url: env_var_or("GOOGLE_TOKENINFO_URL", defaults::GOOGLE_TOKENINFO_URL),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
            },
            pagination: PaginationConfig {
                default_page_size: parse_env("DEFAULT_PAGE_SIZE", pagination::DEFAULT_PAGE_SIZE)?,
                max_page_size: parse_env("MAX_PAGE_SIZE", pagination::MAX_PAGE_SIZE)?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a config error for settings the server cannot run with
    pub fn validate(&self) -> AppResult<()> {
        if !(limits::MIN_BCRYPT_COST..=limits::MAX_BCRYPT_COST).contains(&self.auth.bcrypt_cost) {
            return Err(AppError::config(format!(
                "BCRYPT_COST must be between {} and {}, got {}",
                limits::MIN_BCRYPT_COST,
                limits::MAX_BCRYPT_COST,
                self.auth.bcrypt_cost
            )));
        }

        if self.auth.access_ttl_minutes <= 0 || self.auth.refresh_ttl_days <= 0 {
            return Err(AppError::config("Token lifetimes must be positive"));
        }

        if self.pagination.default_page_size == 0
            || self.pagination.default_page_size > self.pagination.max_page_size
        {
            return Err(AppError::config(
                "DEFAULT_PAGE_SIZE must be between 1 and MAX_PAGE_SIZE",
            ));
        }

        if self.auth.jwt_secret.is_none() {
            if self.environment.is_production() {
                return Err(AppError::config("JWT_SECRET is required in production"));
            }
            warn!("JWT_SECRET not set; tokens will not survive a restart");
        }

        if !self.google.is_enabled() {
            info!("GOOGLE_CLIENT_ID not set; federated login disabled");
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "FitTransform Server Configuration:\n\
             - Environment: {}\n\
             - HTTP: {}:{}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - Access Token TTL: {} min\n\
             - Refresh Token TTL: {} days\n\
             - Google Login: {}\n\
             - CORS Origins: {}\n\
             - Page Size: {} (max {})",
            self.environment,
            self.host,
            self.http_port,
            self.log_level,
            if self.database_url.is_memory() {
                "SQLite (memory)"
            } else {
                "SQLite"
            },
            self.auth.access_ttl_minutes,
            self.auth.refresh_ttl_days,
            if self.google.is_enabled() {
                "Enabled"
            } else {
                "Disabled"
            },
            self.cors.allowed_origins.join(","),
            self.pagination.default_page_size,
            self.pagination.max_page_size,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, using `default` when unset
fn parse_env<T: FromStr>(key: &str, default: T) -> AppResult<T>
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        _ => Ok(default),
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://app.example.com,"),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("error"), LogLevel::Error);
        assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str_or_default("Debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("invalid"), LogLevel::Info);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("PROD"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str_or_default("test"),
            Environment::Testing
        );
        assert_eq!(
            Environment::from_str_or_default("staging"),
            Environment::Development
        );
    }

    #[test]
    fn test_database_url_parsing() {
        let file = DatabaseUrl::parse_url("sqlite:./test.db").unwrap();
        assert!(!file.is_memory());
        assert_eq!(file.to_connection_string(), "sqlite:./test.db");

        assert!(DatabaseUrl::parse_url("sqlite::memory:").unwrap().is_memory());
        assert!(matches!(
            DatabaseUrl::parse_url("./some/path.db").unwrap(),
            DatabaseUrl::SQLite { .. }
        ));
        assert!(DatabaseUrl::parse_url("postgres://localhost/db").is_err());
        assert!(DatabaseUrl::parse_url("  ").is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.auth.bcrypt_cost = 2;
        assert!(config.validate().is_err());
        config.auth.bcrypt_cost = defaults::BCRYPT_COST;

        config.environment = Environment::Production;
        assert!(config.validate().is_err());
        config.auth.jwt_secret = Some("production-secret".to_owned());
        assert!(config.validate().is_ok());

        config.pagination.default_page_size = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        env::set_var("HTTP_PORT", "9123");
        env::set_var("DATABASE_URL", "sqlite::memory:");
        env::set_var("CORS_ALLOWED_ORIGINS", "http://localhost:5173");
        env::set_var("BCRYPT_COST", "4");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, 9123);
        assert!(config.database_url.is_memory());
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.auth.bcrypt_cost, 4);

        env::remove_var("HTTP_PORT");
        env::remove_var("DATABASE_URL");
        env::remove_var("CORS_ALLOWED_ORIGINS");
        env::remove_var("BCRYPT_COST");
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_port() {
        env::set_var("HTTP_PORT", "not-a-port");
        let result = ServerConfig::from_env();
        env::remove_var("HTTP_PORT");

        let err = result.unwrap_err();
        assert!(err.message.contains("HTTP_PORT"));
    }
}
