// ABOUTME: Database management for accounts, body state, progress, workouts, plans, and goals
// ABOUTME: Owns the SQLite pool, idempotent schema bootstrap, and timestamp encoding helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! # Database Management
//!
//! A single `SQLite` pool shared by every manager. Each manager wraps a pool
//! clone for reads; writes that belong to a larger unit of work take a
//! `&mut SqliteConnection` so callers can run them inside one transaction.
//!
//! Uniqueness lives in the schema (`users.email`, one body row per user,
//! one progress entry per user per date, one set per session, exercise and
//! set number, one plan day per day number) and every upsert is an
//! `INSERT ... ON CONFLICT` statement.

mod body;
mod goals;
mod plan_progress;
mod plans;
mod progress;
/// Transaction guard and retry helper
pub mod transactions;
mod users;
mod workouts;

pub use body::BodyStateManager;
pub use goals::{GoalManager, GoalValues};
pub use plan_progress::{PlanProgressManager, PlanProgressValues};
pub use plans::{PlanExerciseInput, PlanManager, WorkoutDayInput, WorkoutPlanInput};
pub use progress::{ProgressEntryInput, ProgressManager, ProgressUpsert};
pub use transactions::{begin_immediate, retry_transaction, TransactionGuard};
pub use users::UserManager;
pub use workouts::{
    CompletedWorkoutInput, ExerciseInput, ExerciseSetInput, WorkoutManager, WorkoutSessionInput,
};

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

const BUSY_TIMEOUT_SECS: u64 = 5;
const FILE_POOL_MAX_CONNECTIONS: u32 = 8;

/// Database manager for all persisted entities
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database and run schema bootstrap
    ///
    /// In-memory databases are pinned to a single connection that never
    /// expires; every connection to `sqlite::memory:` is otherwise a fresh,
    /// empty database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or a migration fails
    pub async fn new(database_url: &DatabaseUrl) -> AppResult<Self> {
        let pool = if database_url.is_memory() {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| AppError::database(format!("Invalid database URL: {e}")))?
                .foreign_keys(true);
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
        } else {
            let options = SqliteConnectOptions::from_str(&database_url.to_connection_string())
                .map_err(|e| AppError::database(format!("Invalid database URL: {e}")))?
                .create_if_missing(true)
                .foreign_keys(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));
            SqlitePoolOptions::new()
                .max_connections(FILE_POOL_MAX_CONNECTIONS)
                .connect_with(options)
                .await
        }
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        info!(database = %database_url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// User account manager
    #[must_use]
    pub fn users(&self) -> UserManager {
        UserManager::new(self.pool.clone())
    }

    /// Body composition and measurement manager
    #[must_use]
    pub fn body(&self) -> BodyStateManager {
        BodyStateManager::new(self.pool.clone())
    }

    /// Progress entry manager
    #[must_use]
    pub fn progress(&self) -> ProgressManager {
        ProgressManager::new(self.pool.clone())
    }

    /// Workout manager
    #[must_use]
    pub fn workouts(&self) -> WorkoutManager {
        WorkoutManager::new(self.pool.clone())
    }

    /// Workout plan manager
    #[must_use]
    pub fn plans(&self) -> PlanManager {
        PlanManager::new(self.pool.clone())
    }

    /// Goal manager
    #[must_use]
    pub fn goals(&self) -> GoalManager {
        GoalManager::new(self.pool.clone())
    }

    /// Plan progress manager
    #[must_use]
    pub fn plan_progress(&self) -> PlanProgressManager {
        PlanProgressManager::new(self.pool.clone())
    }

    /// Create every table and index if missing
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        users::migrate(&self.pool).await?;
        body::migrate(&self.pool).await?;
        progress::migrate(&self.pool).await?;
        workouts::migrate(&self.pool).await?;
        plans::migrate(&self.pool).await?;
        goals::migrate(&self.pool).await?;
        plan_progress::migrate(&self.pool).await?;
        Ok(())
    }
}

/// Run a list of DDL statements in order
async fn execute_ddl(pool: &SqlitePool, statements: &[&str]) -> AppResult<()> {
    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
    }
    Ok(())
}

/// Map a failed write, reporting unique-key collisions as conflicts
pub(crate) fn write_error(action: &str, error: &sqlx::Error) -> AppError {
    if error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation())
    {
        return AppError::already_exists(format!("Failed to {action}: {error}"));
    }
    AppError::database(format!("Failed to {action}: {error}"))
}

/// Encode a timestamp with fixed precision so stored strings sort chronologically
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Decode a stored RFC 3339 timestamp
///
/// # Errors
///
/// Returns a database error if the value is not valid RFC 3339
pub fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid timestamp '{value}': {e}")))
}

/// Decode an optional stored timestamp
///
/// # Errors
///
/// Returns a database error if a present value is not valid RFC 3339
pub fn parse_optional_timestamp(value: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    value.map(parse_timestamp).transpose()
}

/// Decode a stored `YYYY-MM-DD` date
///
/// # Errors
///
/// Returns a database error if the value is not a calendar date
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::database(format!("Invalid date '{value}': {e}")))
}

/// Decode a stored user id
///
/// # Errors
///
/// Returns a database error if the value is not a UUID
pub fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::database(format!("Invalid UUID: {e}")))
}
