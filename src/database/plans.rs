// ABOUTME: Workout plan database operations for plans, scheduled days, and prescribed exercises
// ABOUTME: Visibility is public-or-own for reads; plan writes are scoped to the author
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{execute_ddl, format_timestamp, parse_timestamp, parse_uuid, write_error};
use crate::errors::{AppError, AppResult};
use crate::models::{
    FitnessLevel, Gender, PlanDuration, PlanExercise, SpecificGoal, WorkoutDay, WorkoutPlan,
};
use crate::pagination::PageRequest;

const PLAN_COLUMNS: &str = "id, created_by, name, description, difficulty, duration, \
    specific_goal, target_gender, min_fitness_level, is_public, created_at, updated_at";

const DAY_COLUMNS: &str =
    "id, plan_id, name, day_number, is_rest_day, focus_area, notes, created_at, updated_at";

const PLAN_EXERCISE_SELECT: &str = "SELECT w.id, w.day_id, w.exercise_id, e.name AS exercise_name, \
    w.sets, w.reps, w.rest_time, w.weight, w.duration, w.position, w.notes, w.created_at \
    FROM workout_exercises w JOIN exercises e ON e.id = w.exercise_id";

pub(super) async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    execute_ddl(
        pool,
        &[
            r"
            CREATE TABLE IF NOT EXISTS workout_plans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_by TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                difficulty TEXT NOT NULL DEFAULT 'intermediate',
                duration TEXT NOT NULL DEFAULT '1_month',
                specific_goal TEXT,
                target_gender TEXT,
                min_fitness_level TEXT NOT NULL DEFAULT 'beginner',
                is_public INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_workout_plans_created_by ON workout_plans(created_by)",
            r"
            CREATE TABLE IF NOT EXISTS workout_days (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                plan_id INTEGER NOT NULL REFERENCES workout_plans(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                day_number INTEGER NOT NULL CHECK (day_number >= 1),
                is_rest_day INTEGER NOT NULL DEFAULT 0,
                focus_area TEXT,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(plan_id, day_number)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS workout_exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                day_id INTEGER NOT NULL REFERENCES workout_days(id) ON DELETE CASCADE,
                exercise_id INTEGER NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
                sets INTEGER NOT NULL DEFAULT 3,
                reps INTEGER NOT NULL DEFAULT 10,
                rest_time INTEGER NOT NULL DEFAULT 90,
                weight REAL,
                duration INTEGER,
                position INTEGER NOT NULL DEFAULT 0,
                notes TEXT,
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_workout_exercises_day ON workout_exercises(day_id)",
        ],
    )
    .await
}

/// Plan fields from a request; `None` keeps the stored value or takes the default
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutPlanInput {
    /// Display name, required on create
    pub name: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Overall difficulty
    pub difficulty: Option<FitnessLevel>,
    /// Program length
    pub duration: Option<PlanDuration>,
    /// Goal the plan is designed for
    pub specific_goal: Option<SpecificGoal>,
    /// Intended audience
    pub target_gender: Option<Gender>,
    /// Experience expected before starting
    pub min_fitness_level: Option<FitnessLevel>,
    /// Visibility to other users
    pub is_public: Option<bool>,
}

/// Day fields from a request; `None` keeps the stored value or takes the default
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutDayInput {
    /// Display name, required on create
    pub name: Option<String>,
    /// 1-based position, required on create
    pub day_number: Option<i32>,
    /// No exercises expected
    pub is_rest_day: Option<bool>,
    /// Focus of the day
    pub focus_area: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Exercise prescription from a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanExerciseInput {
    /// Catalog exercise id
    pub exercise_id: i64,
    /// Sets; defaults to 3
    pub sets: Option<i32>,
    /// Repetitions; defaults to 10
    pub reps: Option<i32>,
    /// Rest in seconds; defaults to 90
    pub rest_time: Option<i32>,
    /// Load in kilograms
    pub weight: Option<f64>,
    /// Duration in seconds
    pub duration: Option<i32>,
    /// Position within the day; defaults to 0
    pub position: Option<i32>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Workout plan database operations manager
pub struct PlanManager {
    pool: SqlitePool,
}

impl PlanManager {
    /// Create a new plan manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Plans
    // ========================================================================

    /// Insert a plan authored by `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn create_plan(&self, user_id: Uuid, input: &WorkoutPlanInput) -> AppResult<WorkoutPlan> {
        let row = sqlx::query(&format!(
            "INSERT INTO workout_plans (created_by, name, description, difficulty, duration, \
             specific_goal, target_gender, min_fitness_level, is_public, created_at, updated_at) \
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, 'intermediate'), COALESCE($5, '1_month'), \
             $6, $7, COALESCE($8, 'beginner'), COALESCE($9, 1), $10, $10) \
             RETURNING {PLAN_COLUMNS}"
        ))
        .bind(user_id.to_string())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.difficulty.map(|d| d.as_str()))
        .bind(input.duration.map(|d| d.as_str()))
        .bind(input.specific_goal.map(|g| g.as_str()))
        .bind(input.target_gender.map(|g| g.as_str()))
        .bind(input.min_fitness_level.map(|l| l.as_str()))
        .bind(input.is_public)
        .bind(format_timestamp(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create workout plan", &e))?;

        row_to_plan(&row)
    }

    /// Get a plan the user may see: public, or authored by the user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_visible_plan(&self, user_id: Uuid, plan_id: i64) -> AppResult<Option<WorkoutPlan>> {
        let row = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM workout_plans \
             WHERE id = $1 AND (is_public = 1 OR created_by = $2)"
        ))
        .bind(plan_id)
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get workout plan: {e}")))?;

        row.map(|r| row_to_plan(&r)).transpose()
    }

    /// One page of plans visible to the user, most recently created first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_visible_plans(&self, user_id: Uuid, page: PageRequest) -> AppResult<Vec<WorkoutPlan>> {
        let rows = sqlx::query(&format!(
            "SELECT {PLAN_COLUMNS} FROM workout_plans WHERE is_public = 1 OR created_by = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id.to_string())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list workout plans: {e}")))?;

        rows.iter().map(row_to_plan).collect()
    }

    /// Number of plans visible to the user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_visible_plans(&self, user_id: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM workout_plans WHERE is_public = 1 OR created_by = $1",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count workout plans: {e}")))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Merge present fields onto a plan authored by the user
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn update_plan(
        &self,
        user_id: Uuid,
        plan_id: i64,
        input: &WorkoutPlanInput,
    ) -> AppResult<Option<WorkoutPlan>> {
        let row = sqlx::query(&format!(
            r"
            UPDATE workout_plans SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                difficulty = COALESCE($5, difficulty),
                duration = COALESCE($6, duration),
                specific_goal = COALESCE($7, specific_goal),
                target_gender = COALESCE($8, target_gender),
                min_fitness_level = COALESCE($9, min_fitness_level),
                is_public = COALESCE($10, is_public),
                updated_at = $11
            WHERE id = $1 AND created_by = $2
            RETURNING {PLAN_COLUMNS}
            "
        ))
        .bind(plan_id)
        .bind(user_id.to_string())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.difficulty.map(|d| d.as_str()))
        .bind(input.duration.map(|d| d.as_str()))
        .bind(input.specific_goal.map(|g| g.as_str()))
        .bind(input.target_gender.map(|g| g.as_str()))
        .bind(input.min_fitness_level.map(|l| l.as_str()))
        .bind(input.is_public)
        .bind(format_timestamp(Utc::now()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("update workout plan", &e))?;

        row.map(|r| row_to_plan(&r)).transpose()
    }

    /// Delete a plan authored by the user with its days and prescriptions
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn delete_plan(&self, user_id: Uuid, plan_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workout_plans WHERE id = $1 AND created_by = $2")
            .bind(plan_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete workout plan: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Days
    // ========================================================================

    /// Add a day to a plan
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` when the plan already has that day number
    pub async fn create_day(&self, plan_id: i64, input: &WorkoutDayInput) -> AppResult<WorkoutDay> {
        let row = sqlx::query(&format!(
            "INSERT INTO workout_days (plan_id, name, day_number, is_rest_day, focus_area, notes, \
             created_at, updated_at) VALUES ($1, $2, $3, COALESCE($4, 0), $5, $6, $7, $7) \
             RETURNING {DAY_COLUMNS}"
        ))
        .bind(plan_id)
        .bind(&input.name)
        .bind(input.day_number)
        .bind(input.is_rest_day)
        .bind(&input.focus_area)
        .bind(&input.notes)
        .bind(format_timestamp(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create workout day", &e))?;

        row_to_day(&row)
    }

    /// Get one day by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_day(&self, day_id: i64) -> AppResult<Option<WorkoutDay>> {
        let row = sqlx::query(&format!("SELECT {DAY_COLUMNS} FROM workout_days WHERE id = $1"))
            .bind(day_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get workout day: {e}")))?;

        row.map(|r| row_to_day(&r)).transpose()
    }

    /// Days of a plan in schedule order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn days_for_plan(&self, plan_id: i64) -> AppResult<Vec<WorkoutDay>> {
        let rows = sqlx::query(&format!(
            "SELECT {DAY_COLUMNS} FROM workout_days WHERE plan_id = $1 ORDER BY day_number"
        ))
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list workout days: {e}")))?;

        rows.iter().map(row_to_day).collect()
    }

    /// Merge present fields onto a day
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` when moving onto a taken day number
    pub async fn update_day(&self, day_id: i64, input: &WorkoutDayInput) -> AppResult<Option<WorkoutDay>> {
        let row = sqlx::query(&format!(
            r"
            UPDATE workout_days SET
                name = COALESCE($2, name),
                day_number = COALESCE($3, day_number),
                is_rest_day = COALESCE($4, is_rest_day),
                focus_area = COALESCE($5, focus_area),
                notes = COALESCE($6, notes),
                updated_at = $7
            WHERE id = $1
            RETURNING {DAY_COLUMNS}
            "
        ))
        .bind(day_id)
        .bind(&input.name)
        .bind(input.day_number)
        .bind(input.is_rest_day)
        .bind(&input.focus_area)
        .bind(&input.notes)
        .bind(format_timestamp(Utc::now()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("update workout day", &e))?;

        row.map(|r| row_to_day(&r)).transpose()
    }

    /// Delete a day and its prescriptions
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn delete_day(&self, day_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workout_days WHERE id = $1")
            .bind(day_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete workout day: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Prescribed exercises
    // ========================================================================

    /// Prescribe a catalog exercise on a day
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn add_exercise(&self, day_id: i64, input: &PlanExerciseInput) -> AppResult<PlanExercise> {
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO workout_exercises (
                day_id, exercise_id, sets, reps, rest_time, weight, duration, position, notes,
                created_at
            ) VALUES ($1, $2, COALESCE($3, 3), COALESCE($4, 10), COALESCE($5, 90), $6, $7,
                COALESCE($8, 0), $9, $10)
            RETURNING id
            ",
        )
        .bind(day_id)
        .bind(input.exercise_id)
        .bind(input.sets)
        .bind(input.reps)
        .bind(input.rest_time)
        .bind(input.weight)
        .bind(input.duration)
        .bind(input.position)
        .bind(&input.notes)
        .bind(format_timestamp(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("add plan exercise", &e))?;

        self.get_exercise(id)
            .await?
            .ok_or_else(|| AppError::internal("Plan exercise missing after insert"))
    }

    /// Get one prescription by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_exercise(&self, plan_exercise_id: i64) -> AppResult<Option<PlanExercise>> {
        let row = sqlx::query(&format!("{PLAN_EXERCISE_SELECT} WHERE w.id = $1"))
            .bind(plan_exercise_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get plan exercise: {e}")))?;

        row.map(|r| row_to_plan_exercise(&r)).transpose()
    }

    /// Prescriptions for every day of a plan, by day then position
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn exercises_for_plan(&self, plan_id: i64) -> AppResult<Vec<PlanExercise>> {
        let rows = sqlx::query(&format!(
            "{PLAN_EXERCISE_SELECT} JOIN workout_days d ON d.id = w.day_id \
             WHERE d.plan_id = $1 ORDER BY d.day_number, w.position, w.id"
        ))
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list plan exercises: {e}")))?;

        rows.iter().map(row_to_plan_exercise).collect()
    }

    /// Prescriptions for one day by position
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn exercises_for_day(&self, day_id: i64) -> AppResult<Vec<PlanExercise>> {
        let rows = sqlx::query(&format!(
            "{PLAN_EXERCISE_SELECT} WHERE w.day_id = $1 ORDER BY w.position, w.id"
        ))
        .bind(day_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list plan exercises: {e}")))?;

        rows.iter().map(row_to_plan_exercise).collect()
    }

    /// Remove one prescription
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn delete_exercise(&self, plan_exercise_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workout_exercises WHERE id = $1")
            .bind(plan_exercise_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete plan exercise: {e}")))?;
        Ok(result.rows_affected() > 0)
    }
}

fn parse_column<T>(row: &SqliteRow, column: &str) -> AppResult<T>
where
    T: FromStr<Err = AppError>,
{
    let raw: String = row.get(column);
    raw.parse().map_err(|e: AppError| AppError::database(e.to_string()))
}

fn parse_optional_column<T>(row: &SqliteRow, column: &str) -> AppResult<Option<T>>
where
    T: FromStr<Err = AppError>,
{
    let raw: Option<String> = row.get(column);
    raw.map(|r| r.parse().map_err(|e: AppError| AppError::database(e.to_string())))
        .transpose()
}

fn row_to_plan(row: &SqliteRow) -> AppResult<WorkoutPlan> {
    let created_by: String = row.get("created_by");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(WorkoutPlan {
        id: row.get("id"),
        created_by: parse_uuid(&created_by)?,
        name: row.get("name"),
        description: row.get("description"),
        difficulty: parse_column(row, "difficulty")?,
        duration: parse_column(row, "duration")?,
        specific_goal: parse_optional_column(row, "specific_goal")?,
        target_gender: parse_optional_column(row, "target_gender")?,
        min_fitness_level: parse_column(row, "min_fitness_level")?,
        is_public: row.get("is_public"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn row_to_day(row: &SqliteRow) -> AppResult<WorkoutDay> {
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(WorkoutDay {
        id: row.get("id"),
        plan_id: row.get("plan_id"),
        name: row.get("name"),
        day_number: row.get("day_number"),
        is_rest_day: row.get("is_rest_day"),
        focus_area: row.get("focus_area"),
        notes: row.get("notes"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn row_to_plan_exercise(row: &SqliteRow) -> AppResult<PlanExercise> {
    let created_at: String = row.get("created_at");

    Ok(PlanExercise {
        id: row.get("id"),
        day_id: row.get("day_id"),
        exercise_id: row.get("exercise_id"),
        exercise_name: row.get("exercise_name"),
        sets: row.get("sets"),
        reps: row.get("reps"),
        rest_time: row.get("rest_time"),
        weight: row.get("weight"),
        duration: row.get("duration"),
        position: row.get("position"),
        notes: row.get("notes"),
        created_at: parse_timestamp(&created_at)?,
    })
}
