// ABOUTME: Progress entry database operations keyed by (user, date)
// ABOUTME: Single-statement upsert plus owner-scoped paginated reads and deletes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::body::row_to_measurements;
use super::{execute_ddl, format_timestamp, parse_date, parse_timestamp, parse_uuid, write_error};
use crate::errors::{AppError, AppResult};
use crate::models::{Measurements, ProgressEntry};
use crate::pagination::PageRequest;

const ENTRY_COLUMNS: &str = "id, user_id, date, weight, chest, neck, waist, left_arm, \
    right_arm, left_thigh, right_thigh, shoulders, hips, calves, body_fat, muscle_mass, bmi, \
    notes, created_at, updated_at";

pub(super) async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    execute_ddl(
        pool,
        &[
            r"
            CREATE TABLE IF NOT EXISTS progress_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                weight REAL,
                chest REAL,
                neck REAL,
                waist REAL,
                left_arm REAL,
                right_arm REAL,
                left_thigh REAL,
                right_thigh REAL,
                shoulders REAL,
                hips REAL,
                calves REAL,
                body_fat REAL,
                muscle_mass REAL,
                bmi REAL,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(user_id, date)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_progress_entries_user_date ON progress_entries(user_id, date)",
        ],
    )
    .await
}

/// Values for one dated snapshot; `None` keeps whatever is stored
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEntryInput {
    /// Calendar date, the upsert key together with the owner
    pub date: NaiveDate,
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// The ten body measurements
    pub measurements: Measurements,
    /// Body fat percentage
    pub body_fat: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass: Option<f64>,
    /// Body mass index
    pub bmi: Option<f64>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Outcome of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpsert {
    /// Row identifier
    pub id: i64,
    /// Whether the row was inserted rather than updated
    pub created: bool,
}

/// Progress entry database operations manager
pub struct ProgressManager {
    pool: SqlitePool,
}

impl ProgressManager {
    /// Create a new progress manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the snapshot for (user, date) or merge it onto the existing row
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn upsert_entry(
        &self,
        user_id: Uuid,
        input: &ProgressEntryInput,
    ) -> AppResult<ProgressUpsert> {
        let now = format_timestamp(Utc::now());
        let m = &input.measurements;

        let row = sqlx::query(
            r"
            INSERT INTO progress_entries (
                user_id, date, weight, chest, neck, waist, left_arm, right_arm,
                left_thigh, right_thigh, shoulders, hips, calves, body_fat, muscle_mass,
                bmi, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $18)
            ON CONFLICT(user_id, date) DO UPDATE SET
                weight = COALESCE(excluded.weight, progress_entries.weight),
                chest = COALESCE(excluded.chest, progress_entries.chest),
                neck = COALESCE(excluded.neck, progress_entries.neck),
                waist = COALESCE(excluded.waist, progress_entries.waist),
                left_arm = COALESCE(excluded.left_arm, progress_entries.left_arm),
                right_arm = COALESCE(excluded.right_arm, progress_entries.right_arm),
                left_thigh = COALESCE(excluded.left_thigh, progress_entries.left_thigh),
                right_thigh = COALESCE(excluded.right_thigh, progress_entries.right_thigh),
                shoulders = COALESCE(excluded.shoulders, progress_entries.shoulders),
                hips = COALESCE(excluded.hips, progress_entries.hips),
                calves = COALESCE(excluded.calves, progress_entries.calves),
                body_fat = COALESCE(excluded.body_fat, progress_entries.body_fat),
                muscle_mass = COALESCE(excluded.muscle_mass, progress_entries.muscle_mass),
                bmi = COALESCE(excluded.bmi, progress_entries.bmi),
                notes = COALESCE(excluded.notes, progress_entries.notes),
                updated_at = excluded.updated_at
            RETURNING id, created_at
            ",
        )
        .bind(user_id.to_string())
        .bind(input.date.format("%Y-%m-%d").to_string())
        .bind(input.weight)
        .bind(m.chest)
        .bind(m.neck)
        .bind(m.waist)
        .bind(m.left_arm)
        .bind(m.right_arm)
        .bind(m.left_thigh)
        .bind(m.right_thigh)
        .bind(m.shoulders)
        .bind(m.hips)
        .bind(m.calves)
        .bind(input.body_fat)
        .bind(input.muscle_mass)
        .bind(input.bmi)
        .bind(&input.notes)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("save progress entry", &e))?;

        let created_at: String = row.get("created_at");
        Ok(ProgressUpsert {
            id: row.get("id"),
            created: created_at == now,
        })
    }

    /// Get one entry owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_entry(&self, user_id: Uuid, entry_id: i64) -> AppResult<Option<ProgressEntry>> {
        let row = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM progress_entries WHERE id = $1 AND user_id = $2"
        ))
        .bind(entry_id)
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get progress entry: {e}")))?;

        row.map(|r| row_to_entry(&r)).transpose()
    }

    /// One page of the user's entries, newest date first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_entries(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Vec<ProgressEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM progress_entries WHERE user_id = $1 \
             ORDER BY date DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id.to_string())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list progress entries: {e}")))?;

        rows.iter().map(row_to_entry).collect()
    }

    /// Every entry for the user, newest date first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn all_entries_desc(&self, user_id: Uuid) -> AppResult<Vec<ProgressEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM progress_entries WHERE user_id = $1 ORDER BY date DESC"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load progress entries: {e}")))?;

        rows.iter().map(row_to_entry).collect()
    }

    /// The user's entries dated within `from..=to`, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn entries_between(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<ProgressEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM progress_entries \
             WHERE user_id = $1 AND date >= $2 AND date <= $3 ORDER BY date ASC"
        ))
        .bind(user_id.to_string())
        .bind(from.format("%Y-%m-%d").to_string())
        .bind(to.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load progress entries: {e}")))?;

        rows.iter().map(row_to_entry).collect()
    }

    /// Number of entries owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_entries(&self, user_id: Uuid) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM progress_entries WHERE user_id = $1")
                .bind(user_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to count progress entries: {e}")))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Delete one entry owned by the user, returning whether it existed
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn delete_entry(&self, user_id: Uuid, entry_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM progress_entries WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete progress entry: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_entry(row: &SqliteRow) -> AppResult<ProgressEntry> {
    let user_id: String = row.get("user_id");
    let date: String = row.get("date");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(ProgressEntry {
        id: row.get("id"),
        user_id: parse_uuid(&user_id)?,
        date: parse_date(&date)?,
        weight: row.get("weight"),
        measurements: row_to_measurements(row),
        body_fat: row.get("body_fat"),
        muscle_mass: row.get("muscle_mass"),
        bmi: row.get("bmi"),
        notes: row.get("notes"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
