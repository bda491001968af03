// ABOUTME: Goal database operations with owner-scoped reads and full-row saves
// ABOUTME: Derived progress fields are written as computed by the goal tracker
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::{
    execute_ddl, format_timestamp, parse_date, parse_optional_timestamp, parse_timestamp,
    parse_uuid, write_error,
};
use crate::errors::{AppError, AppResult};
use crate::models::{Goal, GoalStatus, GoalType};
use crate::pagination::PageRequest;

const GOAL_COLUMNS: &str = "id, user_id, title, description, goal_type, start_value, \
    target_value, current_value, target_date, progress_percentage, status, is_achieved, \
    achieved_at, created_at, updated_at";

pub(super) async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    execute_ddl(
        pool,
        &[
            r"
            CREATE TABLE IF NOT EXISTS goals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                goal_type TEXT NOT NULL,
                start_value REAL,
                target_value REAL,
                current_value REAL,
                target_date TEXT NOT NULL,
                progress_percentage REAL NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'active',
                is_achieved INTEGER NOT NULL DEFAULT 0,
                achieved_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_goals_user_status ON goals(user_id, status)",
        ],
    )
    .await
}

/// Every stored goal field apart from identity and timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct GoalValues {
    /// Short title
    pub title: String,
    /// Description
    pub description: String,
    /// What is measured
    pub goal_type: GoalType,
    /// Baseline
    pub start_value: Option<f64>,
    /// Value to reach
    pub target_value: Option<f64>,
    /// Latest recorded value
    pub current_value: Option<f64>,
    /// Deadline
    pub target_date: NaiveDate,
    /// Derived progress, 0 to 100
    pub progress_percentage: f64,
    /// Lifecycle state
    pub status: GoalStatus,
    /// Sticky achievement flag
    pub is_achieved: bool,
    /// First achievement time
    pub achieved_at: Option<DateTime<Utc>>,
}

impl From<&Goal> for GoalValues {
    fn from(goal: &Goal) -> Self {
        Self {
            title: goal.title.clone(),
            description: goal.description.clone(),
            goal_type: goal.goal_type,
            start_value: goal.start_value,
            target_value: goal.target_value,
            current_value: goal.current_value,
            target_date: goal.target_date,
            progress_percentage: goal.progress_percentage,
            status: goal.status,
            is_achieved: goal.is_achieved,
            achieved_at: goal.achieved_at,
        }
    }
}

/// Goal database operations manager
pub struct GoalManager {
    pool: SqlitePool,
}

impl GoalManager {
    /// Create a new goal manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a goal for the user
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn insert_goal(&self, user_id: Uuid, values: &GoalValues) -> AppResult<Goal> {
        let row = sqlx::query(&format!(
            r"
            INSERT INTO goals (
                user_id, title, description, goal_type, start_value, target_value,
                current_value, target_date, progress_percentage, status, is_achieved,
                achieved_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
            RETURNING {GOAL_COLUMNS}
            "
        ))
        .bind(user_id.to_string())
        .bind(&values.title)
        .bind(&values.description)
        .bind(values.goal_type.as_str())
        .bind(values.start_value)
        .bind(values.target_value)
        .bind(values.current_value)
        .bind(values.target_date.format("%Y-%m-%d").to_string())
        .bind(values.progress_percentage)
        .bind(values.status.as_str())
        .bind(values.is_achieved)
        .bind(values.achieved_at.map(format_timestamp))
        .bind(format_timestamp(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create goal", &e))?;

        row_to_goal(&row)
    }

    /// Get one of the user's goals
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_goal(&self, user_id: Uuid, goal_id: i64) -> AppResult<Option<Goal>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        Self::fetch_goal(&mut conn, user_id, goal_id).await
    }

    /// Get one of the user's goals on an open connection
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn fetch_goal(
        conn: &mut SqliteConnection,
        user_id: Uuid,
        goal_id: i64,
    ) -> AppResult<Option<Goal>> {
        let row = sqlx::query(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1 AND user_id = $2"
        ))
        .bind(goal_id)
        .bind(user_id.to_string())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to get goal: {e}")))?;

        row.map(|r| row_to_goal(&r)).transpose()
    }

    /// Overwrite every stored field of one of the user's goals
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the goal is gone, or a database error
    pub async fn save_goal(
        conn: &mut SqliteConnection,
        user_id: Uuid,
        goal_id: i64,
        values: &GoalValues,
    ) -> AppResult<Goal> {
        let row = sqlx::query(&format!(
            r"
            UPDATE goals SET
                title = $3,
                description = $4,
                goal_type = $5,
                start_value = $6,
                target_value = $7,
                current_value = $8,
                target_date = $9,
                progress_percentage = $10,
                status = $11,
                is_achieved = $12,
                achieved_at = $13,
                updated_at = $14
            WHERE id = $1 AND user_id = $2
            RETURNING {GOAL_COLUMNS}
            "
        ))
        .bind(goal_id)
        .bind(user_id.to_string())
        .bind(&values.title)
        .bind(&values.description)
        .bind(values.goal_type.as_str())
        .bind(values.start_value)
        .bind(values.target_value)
        .bind(values.current_value)
        .bind(values.target_date.format("%Y-%m-%d").to_string())
        .bind(values.progress_percentage)
        .bind(values.status.as_str())
        .bind(values.is_achieved)
        .bind(values.achieved_at.map(format_timestamp))
        .bind(format_timestamp(Utc::now()))
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| write_error("update goal", &e))?;

        match row {
            Some(row) => row_to_goal(&row),
            None => Err(AppError::not_found("Goal")
                .with_user_id(user_id)
                .with_resource_id(goal_id.to_string())),
        }
    }

    /// One page of the user's goals, newest first, optionally filtered by status
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_goals(
        &self,
        user_id: Uuid,
        status: Option<GoalStatus>,
        page: PageRequest,
    ) -> AppResult<Vec<Goal>> {
        let rows = sqlx::query(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE user_id = $1 AND ($2 IS NULL OR status = $2) \
             ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4"
        ))
        .bind(user_id.to_string())
        .bind(status.map(|s| s.as_str()))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list goals: {e}")))?;

        rows.iter().map(row_to_goal).collect()
    }

    /// Number of the user's goals, optionally filtered by status
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_goals(&self, user_id: Uuid, status: Option<GoalStatus>) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM goals WHERE user_id = $1 AND ($2 IS NULL OR status = $2)",
        )
        .bind(user_id.to_string())
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count goals: {e}")))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Delete one of the user's goals
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn delete_goal(&self, user_id: Uuid, goal_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(goal_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete goal: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_goal(row: &SqliteRow) -> AppResult<Goal> {
    let user_id: String = row.get("user_id");
    let goal_type: String = row.get("goal_type");
    let target_date: String = row.get("target_date");
    let status: String = row.get("status");
    let achieved_at: Option<String> = row.get("achieved_at");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Goal {
        id: row.get("id"),
        user_id: parse_uuid(&user_id)?,
        title: row.get("title"),
        description: row.get("description"),
        goal_type: goal_type
            .parse()
            .map_err(|e: AppError| AppError::database(e.to_string()))?,
        start_value: row.get("start_value"),
        target_value: row.get("target_value"),
        current_value: row.get("current_value"),
        target_date: parse_date(&target_date)?,
        progress_percentage: row.get("progress_percentage"),
        status: status
            .parse()
            .map_err(|e: AppError| AppError::database(e.to_string()))?,
        is_achieved: row.get("is_achieved"),
        achieved_at: parse_optional_timestamp(achieved_at.as_deref())?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
