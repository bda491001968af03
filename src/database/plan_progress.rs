// ABOUTME: Plan progress database operations for a user's runs through workout plans
// ABOUTME: Owner-scoped reads and full-row saves of the derived completion fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::{execute_ddl, format_timestamp, parse_date, parse_timestamp, parse_uuid, write_error};
use crate::errors::{AppError, AppResult};
use crate::models::{PlanDuration, PlanProgress};
use crate::pagination::PageRequest;

const PROGRESS_COLUMNS: &str = "id, user_id, plan_id, plan_name, plan_duration, start_date, \
    end_date, current_day, total_days, completion_percentage, workouts_completed, \
    total_workout_time, average_workout_rating, rated_workouts, is_active, is_completed, \
    created_at, updated_at";

pub(super) async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    execute_ddl(
        pool,
        &[
            r"
            CREATE TABLE IF NOT EXISTS workout_progress (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                plan_id INTEGER REFERENCES workout_plans(id) ON DELETE SET NULL,
                plan_name TEXT NOT NULL,
                plan_duration TEXT NOT NULL DEFAULT '1_month',
                start_date TEXT NOT NULL,
                end_date TEXT,
                current_day INTEGER NOT NULL DEFAULT 1 CHECK (current_day >= 1),
                total_days INTEGER NOT NULL CHECK (total_days >= 1),
                completion_percentage REAL NOT NULL DEFAULT 0,
                workouts_completed INTEGER NOT NULL DEFAULT 0,
                total_workout_time INTEGER NOT NULL DEFAULT 0,
                average_workout_rating REAL,
                rated_workouts INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                is_completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_workout_progress_user ON workout_progress(user_id)",
        ],
    )
    .await
}

/// Every stored plan-progress field apart from identity and timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct PlanProgressValues {
    /// Plan being followed
    pub plan_id: Option<i64>,
    /// Plan name at enrollment
    pub plan_name: String,
    /// Plan length at enrollment
    pub plan_duration: PlanDuration,
    /// First day of the run
    pub start_date: NaiveDate,
    /// Last day of the run
    pub end_date: Option<NaiveDate>,
    /// 1-based day reached
    pub current_day: i32,
    /// Days in the run
    pub total_days: i32,
    /// Derived completion, 0 to 100
    pub completion_percentage: f64,
    /// Workouts logged
    pub workouts_completed: i32,
    /// Minutes trained
    pub total_workout_time: i32,
    /// Mean logged rating
    pub average_workout_rating: Option<f64>,
    /// Ratings behind the mean
    pub rated_workouts: i32,
    /// Still being followed
    pub is_active: bool,
    /// Reached the last day
    pub is_completed: bool,
}

impl From<&PlanProgress> for PlanProgressValues {
    fn from(progress: &PlanProgress) -> Self {
        Self {
            plan_id: progress.plan_id,
            plan_name: progress.plan_name.clone(),
            plan_duration: progress.plan_duration,
            start_date: progress.start_date,
            end_date: progress.end_date,
            current_day: progress.current_day,
            total_days: progress.total_days,
            completion_percentage: progress.completion_percentage,
            workouts_completed: progress.workouts_completed,
            total_workout_time: progress.total_workout_time,
            average_workout_rating: progress.average_workout_rating,
            rated_workouts: progress.rated_workouts,
            is_active: progress.is_active,
            is_completed: progress.is_completed,
        }
    }
}

/// Plan progress database operations manager
pub struct PlanProgressManager {
    pool: SqlitePool,
}

impl PlanProgressManager {
    /// Create a new plan progress manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a run for the user
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn insert_progress(
        &self,
        user_id: Uuid,
        values: &PlanProgressValues,
    ) -> AppResult<PlanProgress> {
        let row = sqlx::query(&format!(
            r"
            INSERT INTO workout_progress (
                user_id, plan_id, plan_name, plan_duration, start_date, end_date, current_day,
                total_days, completion_percentage, workouts_completed, total_workout_time,
                average_workout_rating, rated_workouts, is_active, is_completed, created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $16)
            RETURNING {PROGRESS_COLUMNS}
            "
        ))
        .bind(user_id.to_string())
        .bind(values.plan_id)
        .bind(&values.plan_name)
        .bind(values.plan_duration.as_str())
        .bind(values.start_date.format("%Y-%m-%d").to_string())
        .bind(values.end_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(values.current_day)
        .bind(values.total_days)
        .bind(values.completion_percentage)
        .bind(values.workouts_completed)
        .bind(values.total_workout_time)
        .bind(values.average_workout_rating)
        .bind(values.rated_workouts)
        .bind(values.is_active)
        .bind(values.is_completed)
        .bind(format_timestamp(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create plan progress", &e))?;

        row_to_progress(&row)
    }

    /// Get one of the user's runs
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_progress(&self, user_id: Uuid, progress_id: i64) -> AppResult<Option<PlanProgress>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        Self::fetch_progress(&mut conn, user_id, progress_id).await
    }

    /// Get one of the user's runs on an open connection
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn fetch_progress(
        conn: &mut SqliteConnection,
        user_id: Uuid,
        progress_id: i64,
    ) -> AppResult<Option<PlanProgress>> {
        let row = sqlx::query(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM workout_progress WHERE id = $1 AND user_id = $2"
        ))
        .bind(progress_id)
        .bind(user_id.to_string())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to get plan progress: {e}")))?;

        row.map(|r| row_to_progress(&r)).transpose()
    }

    /// Overwrite every stored field of one of the user's runs
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the run is gone, or a database error
    pub async fn save_progress(
        conn: &mut SqliteConnection,
        user_id: Uuid,
        progress_id: i64,
        values: &PlanProgressValues,
    ) -> AppResult<PlanProgress> {
        let row = sqlx::query(&format!(
            r"
            UPDATE workout_progress SET
                plan_id = $3,
                plan_name = $4,
                plan_duration = $5,
                start_date = $6,
                end_date = $7,
                current_day = $8,
                total_days = $9,
                completion_percentage = $10,
                workouts_completed = $11,
                total_workout_time = $12,
                average_workout_rating = $13,
                rated_workouts = $14,
                is_active = $15,
                is_completed = $16,
                updated_at = $17
            WHERE id = $1 AND user_id = $2
            RETURNING {PROGRESS_COLUMNS}
            "
        ))
        .bind(progress_id)
        .bind(user_id.to_string())
        .bind(values.plan_id)
        .bind(&values.plan_name)
        .bind(values.plan_duration.as_str())
        .bind(values.start_date.format("%Y-%m-%d").to_string())
        .bind(values.end_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(values.current_day)
        .bind(values.total_days)
        .bind(values.completion_percentage)
        .bind(values.workouts_completed)
        .bind(values.total_workout_time)
        .bind(values.average_workout_rating)
        .bind(values.rated_workouts)
        .bind(values.is_active)
        .bind(values.is_completed)
        .bind(format_timestamp(Utc::now()))
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| write_error("update plan progress", &e))?;

        match row {
            Some(row) => row_to_progress(&row),
            None => Err(AppError::not_found("Plan progress")
                .with_user_id(user_id)
                .with_resource_id(progress_id.to_string())),
        }
    }

    /// One page of the user's runs, most recently started first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_progress(&self, user_id: Uuid, page: PageRequest) -> AppResult<Vec<PlanProgress>> {
        let rows = sqlx::query(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM workout_progress WHERE user_id = $1 \
             ORDER BY start_date DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id.to_string())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list plan progress: {e}")))?;

        rows.iter().map(row_to_progress).collect()
    }

    /// Number of the user's runs
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_progress(&self, user_id: Uuid) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM workout_progress WHERE user_id = $1")
                .bind(user_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to count plan progress: {e}")))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Delete one of the user's runs
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn delete_progress(&self, user_id: Uuid, progress_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workout_progress WHERE id = $1 AND user_id = $2")
            .bind(progress_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete plan progress: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_progress(row: &SqliteRow) -> AppResult<PlanProgress> {
    let user_id: String = row.get("user_id");
    let plan_duration: String = row.get("plan_duration");
    let start_date: String = row.get("start_date");
    let end_date: Option<String> = row.get("end_date");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(PlanProgress {
        id: row.get("id"),
        user_id: parse_uuid(&user_id)?,
        plan_id: row.get("plan_id"),
        plan_name: row.get("plan_name"),
        plan_duration: plan_duration
            .parse()
            .map_err(|e: AppError| AppError::database(e.to_string()))?,
        start_date: parse_date(&start_date)?,
        end_date: end_date.as_deref().map(parse_date).transpose()?,
        current_day: row.get("current_day"),
        total_days: row.get("total_days"),
        completion_percentage: row.get("completion_percentage"),
        workouts_completed: row.get("workouts_completed"),
        total_workout_time: row.get("total_workout_time"),
        average_workout_rating: row.get("average_workout_rating"),
        rated_workouts: row.get("rated_workouts"),
        is_active: row.get("is_active"),
        is_completed: row.get("is_completed"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
