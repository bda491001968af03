// ABOUTME: One-to-one body-state database operations for composition and measurements
// ABOUTME: Get-or-create by user id followed by COALESCE partial merges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::{execute_ddl, format_timestamp, parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{
    BodyComposition, BodyCompositionPatch, BodyMeasurements, GoalMeasurements,
    GoalMeasurementsPatch, Measurements,
};

const COMPOSITION_COLUMNS: &str = "user_id, body_fat, muscle_mass, bone_mass, water_weight, \
    bmr, visceral_fat, protein_mass, bmi, muscle_rate, metabolic_age, weight_without_fat, \
    created_at, updated_at";

const MEASUREMENT_COLUMNS: &str = "user_id, chest, neck, waist, left_arm, right_arm, \
    left_thigh, right_thigh, shoulders, hips, calves, created_at, updated_at";

const GOAL_COLUMNS: &str = "user_id, chest, neck, waist, left_arm, right_arm, left_thigh, \
    right_thigh, shoulders, hips, calves, target_weight, created_at, updated_at";

pub(super) async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    execute_ddl(
        pool,
        &[
            r"
            CREATE TABLE IF NOT EXISTS body_compositions (
                user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
                body_fat REAL,
                muscle_mass REAL,
                bone_mass REAL,
                water_weight REAL,
                bmr INTEGER,
                visceral_fat REAL,
                protein_mass REAL,
                bmi REAL,
                muscle_rate REAL,
                metabolic_age INTEGER,
                weight_without_fat REAL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS body_measurements (
                user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
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
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS goal_measurements (
                user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
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
                target_weight REAL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        ],
    )
    .await
}

/// Body composition, current measurements, and goal measurements manager
///
/// Each entity has at most one row per user, keyed by `user_id`. Merges
/// first ensure the row exists with `INSERT ... ON CONFLICT DO NOTHING`, then
/// apply only the fields present in the patch, so concurrent first writes
/// cannot create duplicates.
pub struct BodyStateManager {
    pool: SqlitePool,
}

impl BodyStateManager {
    /// Create a new body-state manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Body Composition
    // ========================================================================

    /// Get the user's body composition, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_body_composition(&self, user_id: Uuid) -> AppResult<Option<BodyComposition>> {
        let mut conn = self.acquire().await?;
        fetch_composition(&mut conn, user_id).await
    }

    /// Get-or-create the composition row and merge the patch onto it
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn merge_body_composition(
        conn: &mut SqliteConnection,
        user_id: Uuid,
        patch: &BodyCompositionPatch,
    ) -> AppResult<BodyComposition> {
        ensure_row(conn, "body_compositions", user_id).await?;

        if !patch.is_empty() {
            sqlx::query(
                r"
                UPDATE body_compositions SET
                    body_fat = COALESCE($2, body_fat),
                    muscle_mass = COALESCE($3, muscle_mass),
                    bone_mass = COALESCE($4, bone_mass),
                    water_weight = COALESCE($5, water_weight),
                    bmr = COALESCE($6, bmr),
                    visceral_fat = COALESCE($7, visceral_fat),
                    protein_mass = COALESCE($8, protein_mass),
                    bmi = COALESCE($9, bmi),
                    muscle_rate = COALESCE($10, muscle_rate),
                    metabolic_age = COALESCE($11, metabolic_age),
                    weight_without_fat = COALESCE($12, weight_without_fat),
                    updated_at = $13
                WHERE user_id = $1
                ",
            )
            .bind(user_id.to_string())
            .bind(patch.body_fat)
            .bind(patch.muscle_mass)
            .bind(patch.bone_mass)
            .bind(patch.water_weight)
            .bind(patch.bmr)
            .bind(patch.visceral_fat)
            .bind(patch.protein_mass)
            .bind(patch.bmi)
            .bind(patch.muscle_rate)
            .bind(patch.metabolic_age)
            .bind(patch.weight_without_fat)
            .bind(format_timestamp(Utc::now()))
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to update body composition: {e}")))?;
        }

        fetch_composition(conn, user_id)
            .await?
            .ok_or_else(|| AppError::internal("Body composition missing after upsert"))
    }

    // ========================================================================
    // Body Measurements
    // ========================================================================

    /// Get the user's current body measurements, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_body_measurements(&self, user_id: Uuid) -> AppResult<Option<BodyMeasurements>> {
        let mut conn = self.acquire().await?;
        fetch_measurements(&mut conn, user_id).await
    }

    /// Get-or-create the measurements row and merge the patch onto it
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn merge_body_measurements(
        conn: &mut SqliteConnection,
        user_id: Uuid,
        patch: &Measurements,
    ) -> AppResult<BodyMeasurements> {
        ensure_row(conn, "body_measurements", user_id).await?;

        if !patch.is_empty() {
            sqlx::query(
                r"
                UPDATE body_measurements SET
                    chest = COALESCE($2, chest),
                    neck = COALESCE($3, neck),
                    waist = COALESCE($4, waist),
                    left_arm = COALESCE($5, left_arm),
                    right_arm = COALESCE($6, right_arm),
                    left_thigh = COALESCE($7, left_thigh),
                    right_thigh = COALESCE($8, right_thigh),
                    shoulders = COALESCE($9, shoulders),
                    hips = COALESCE($10, hips),
                    calves = COALESCE($11, calves),
                    updated_at = $12
                WHERE user_id = $1
                ",
            )
            .bind(user_id.to_string())
            .bind(patch.chest)
            .bind(patch.neck)
            .bind(patch.waist)
            .bind(patch.left_arm)
            .bind(patch.right_arm)
            .bind(patch.left_thigh)
            .bind(patch.right_thigh)
            .bind(patch.shoulders)
            .bind(patch.hips)
            .bind(patch.calves)
            .bind(format_timestamp(Utc::now()))
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to update body measurements: {e}")))?;
        }

        fetch_measurements(conn, user_id)
            .await?
            .ok_or_else(|| AppError::internal("Body measurements missing after upsert"))
    }

    // ========================================================================
    // Goal Measurements
    // ========================================================================

    /// Get the user's goal measurements, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_goal_measurements(&self, user_id: Uuid) -> AppResult<Option<GoalMeasurements>> {
        let mut conn = self.acquire().await?;
        fetch_goals(&mut conn, user_id).await
    }

    /// Get-or-create the goal row and merge the patch onto it
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn merge_goal_measurements(
        conn: &mut SqliteConnection,
        user_id: Uuid,
        patch: &GoalMeasurementsPatch,
    ) -> AppResult<GoalMeasurements> {
        ensure_row(conn, "goal_measurements", user_id).await?;

        if !patch.is_empty() {
            let m = &patch.measurements;
            sqlx::query(
                r"
                UPDATE goal_measurements SET
                    chest = COALESCE($2, chest),
                    neck = COALESCE($3, neck),
                    waist = COALESCE($4, waist),
                    left_arm = COALESCE($5, left_arm),
                    right_arm = COALESCE($6, right_arm),
                    left_thigh = COALESCE($7, left_thigh),
                    right_thigh = COALESCE($8, right_thigh),
                    shoulders = COALESCE($9, shoulders),
                    hips = COALESCE($10, hips),
                    calves = COALESCE($11, calves),
                    target_weight = COALESCE($12, target_weight),
                    updated_at = $13
                WHERE user_id = $1
                ",
            )
            .bind(user_id.to_string())
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
            .bind(patch.target_weight)
            .bind(format_timestamp(Utc::now()))
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to update goal measurements: {e}")))?;
        }

        fetch_goals(conn, user_id)
            .await?
            .ok_or_else(|| AppError::internal("Goal measurements missing after upsert"))
    }

    async fn acquire(&self) -> AppResult<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))
    }
}

/// Create an empty row for the user unless one exists
async fn ensure_row(conn: &mut SqliteConnection, table: &str, user_id: Uuid) -> AppResult<()> {
    let now = format_timestamp(Utc::now());
    sqlx::query(&format!(
        "INSERT INTO {table} (user_id, created_at, updated_at) VALUES ($1, $2, $2) \
         ON CONFLICT(user_id) DO NOTHING"
    ))
    .bind(user_id.to_string())
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to create {table} row: {e}")))?;
    Ok(())
}

async fn fetch_composition(
    conn: &mut SqliteConnection,
    user_id: Uuid,
) -> AppResult<Option<BodyComposition>> {
    let row = sqlx::query(&format!(
        "SELECT {COMPOSITION_COLUMNS} FROM body_compositions WHERE user_id = $1"
    ))
    .bind(user_id.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to get body composition: {e}")))?;

    row.map(|r| row_to_composition(&r)).transpose()
}

async fn fetch_measurements(
    conn: &mut SqliteConnection,
    user_id: Uuid,
) -> AppResult<Option<BodyMeasurements>> {
    let row = sqlx::query(&format!(
        "SELECT {MEASUREMENT_COLUMNS} FROM body_measurements WHERE user_id = $1"
    ))
    .bind(user_id.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to get body measurements: {e}")))?;

    row.map(|r| {
        let (user_id, created_at, updated_at) = row_keys(&r)?;
        Ok(BodyMeasurements {
            user_id,
            measurements: row_to_measurements(&r),
            created_at,
            updated_at,
        })
    })
    .transpose()
}

async fn fetch_goals(
    conn: &mut SqliteConnection,
    user_id: Uuid,
) -> AppResult<Option<GoalMeasurements>> {
    let row = sqlx::query(&format!(
        "SELECT {GOAL_COLUMNS} FROM goal_measurements WHERE user_id = $1"
    ))
    .bind(user_id.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to get goal measurements: {e}")))?;

    row.map(|r| {
        let (user_id, created_at, updated_at) = row_keys(&r)?;
        Ok(GoalMeasurements {
            user_id,
            measurements: row_to_measurements(&r),
            target_weight: r.get("target_weight"),
            created_at,
            updated_at,
        })
    })
    .transpose()
}

type RowKeys = (Uuid, DateTime<Utc>, DateTime<Utc>);

fn row_keys(row: &SqliteRow) -> AppResult<RowKeys> {
    let user_id: String = row.get("user_id");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");
    Ok((
        parse_uuid(&user_id)?,
        parse_timestamp(&created_at)?,
        parse_timestamp(&updated_at)?,
    ))
}

/// Read the ten measurement columns shared by several tables
pub(super) fn row_to_measurements(row: &SqliteRow) -> Measurements {
    Measurements {
        chest: row.get("chest"),
        neck: row.get("neck"),
        waist: row.get("waist"),
        left_arm: row.get("left_arm"),
        right_arm: row.get("right_arm"),
        left_thigh: row.get("left_thigh"),
        right_thigh: row.get("right_thigh"),
        shoulders: row.get("shoulders"),
        hips: row.get("hips"),
        calves: row.get("calves"),
    }
}

fn row_to_composition(row: &SqliteRow) -> AppResult<BodyComposition> {
    let (user_id, created_at, updated_at) = row_keys(row)?;
    Ok(BodyComposition {
        user_id,
        body_fat: row.get("body_fat"),
        muscle_mass: row.get("muscle_mass"),
        bone_mass: row.get("bone_mass"),
        water_weight: row.get("water_weight"),
        bmr: row.get("bmr"),
        visceral_fat: row.get("visceral_fat"),
        protein_mass: row.get("protein_mass"),
        bmi: row.get("bmi"),
        muscle_rate: row.get("muscle_rate"),
        metabolic_age: row.get("metabolic_age"),
        weight_without_fat: row.get("weight_without_fat"),
        created_at,
        updated_at,
    })
}
