// ABOUTME: Workout database operations for exercises, sessions, sets, and completed workouts
// ABOUTME: Session and set upserts run on a caller-supplied connection inside one transaction
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
use crate::constants::exercises::{AUTO_CREATED_DESCRIPTION, AUTO_CREATED_NAME_PREFIX};
use crate::errors::{AppError, AppResult};
use crate::models::{
    CompletedWorkout, Exercise, ExerciseSet, FitnessLevel, MuscleGroup, SessionStatus,
    WorkoutSession,
};
use crate::pagination::PageRequest;

const SESSION_COLUMNS: &str = "id, user_id, status, started_at, completed_at, duration, \
    total_exercises, completed_exercises, notes, rating, created_at, updated_at";

const EXERCISE_COLUMNS: &str =
    "id, name, description, muscle_group, equipment_needed, difficulty_level, created_at";

const COMPLETED_COLUMNS: &str = "id, user_id, workout_name, workout_type, date, duration, \
    calories_burned, exercises_completed, notes, rating, created_at";

pub(super) async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    execute_ddl(
        pool,
        &[
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                muscle_group TEXT NOT NULL DEFAULT 'other',
                equipment_needed TEXT,
                difficulty_level TEXT NOT NULL DEFAULT 'beginner',
                created_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS workout_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                status TEXT NOT NULL DEFAULT 'not_started',
                started_at TEXT,
                completed_at TEXT,
                duration INTEGER,
                total_exercises INTEGER NOT NULL DEFAULT 0,
                completed_exercises INTEGER NOT NULL DEFAULT 0,
                notes TEXT,
                rating INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_workout_sessions_user_created ON workout_sessions(user_id, created_at)",
            r"
            CREATE TABLE IF NOT EXISTS exercise_sets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id INTEGER NOT NULL REFERENCES workout_sessions(id) ON DELETE CASCADE,
                exercise_id INTEGER NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
                set_number INTEGER NOT NULL DEFAULT 1,
                reps_completed INTEGER NOT NULL DEFAULT 0,
                weight_used REAL,
                duration INTEGER,
                rest_time INTEGER,
                notes TEXT,
                difficulty_rating INTEGER,
                created_at TEXT NOT NULL,
                UNIQUE(session_id, exercise_id, set_number)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS completed_workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                workout_name TEXT NOT NULL,
                workout_type TEXT,
                date TEXT NOT NULL,
                duration INTEGER NOT NULL,
                calories_burned INTEGER NOT NULL DEFAULT 0,
                exercises_completed INTEGER NOT NULL DEFAULT 0,
                notes TEXT,
                rating INTEGER CHECK (rating IS NULL OR rating BETWEEN 1 AND 5),
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_completed_workouts_user_date ON completed_workouts(user_id, date)",
        ],
    )
    .await
}

/// Session fields from a save-progress payload; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutSessionInput {
    /// Existing or client-chosen session id; a new id is assigned when absent
    pub id: Option<i64>,
    /// Lifecycle state
    pub status: Option<SessionStatus>,
    /// When the session began
    pub started_at: Option<DateTime<Utc>>,
    /// When the session finished
    pub completed_at: Option<DateTime<Utc>>,
    /// Duration in minutes
    pub duration: Option<i32>,
    /// Exercises planned
    pub total_exercises: Option<i32>,
    /// Exercises finished
    pub completed_exercises: Option<i32>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Self-assessed rating
    pub rating: Option<i32>,
}

/// One set from a save-progress payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseSetInput {
    /// Client exercise reference: an id, a name fragment, or an unknown label
    pub exercise_ref: String,
    /// 1-based set number; defaults to 1 on insert
    pub set_number: Option<i32>,
    /// Repetitions completed; defaults to 0 on insert
    pub reps_completed: Option<i32>,
    /// Load in kilograms
    pub weight_used: Option<f64>,
    /// Duration in seconds
    pub duration: Option<i32>,
    /// Rest after the set in seconds
    pub rest_time: Option<i32>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Perceived difficulty
    pub difficulty_rating: Option<i32>,
}

/// New catalog exercise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseInput {
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Primary muscle group
    pub muscle_group: MuscleGroup,
    /// Equipment required, if any
    pub equipment_needed: Option<String>,
    /// Difficulty
    pub difficulty_level: FitnessLevel,
}

/// New completed-workout log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedWorkoutInput {
    /// Workout name
    pub workout_name: String,
    /// Workout category
    pub workout_type: Option<String>,
    /// Day the workout was done
    pub date: NaiveDate,
    /// Duration in minutes
    pub duration: i32,
    /// Calories burned
    pub calories_burned: i32,
    /// Exercises completed
    pub exercises_completed: i32,
    /// Free-text notes
    pub notes: Option<String>,
    /// Rating from 1 to 5
    pub rating: Option<i32>,
}

/// Workout database operations manager
pub struct WorkoutManager {
    pool: SqlitePool,
}

impl WorkoutManager {
    /// Create a new workout manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Session and set writes (transactional)
    // ========================================================================

    /// Insert a session, or merge onto the existing session with the same id
    ///
    /// The merge only applies when the existing row belongs to `user_id`; a
    /// session owned by someone else yields no row and is reported as not found.
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for another user's session, or a database error
    pub async fn upsert_session(
        conn: &mut SqliteConnection,
        user_id: Uuid,
        input: &WorkoutSessionInput,
    ) -> AppResult<WorkoutSession> {
        let now = format_timestamp(Utc::now());
        let row = sqlx::query(
            r"
            INSERT INTO workout_sessions (
                id, user_id, status, started_at, completed_at, duration, total_exercises,
                completed_exercises, notes, rating, created_at, updated_at
            ) VALUES (
                $1, $2, COALESCE($3, 'not_started'), $4, $5, $6, COALESCE($7, 0),
                COALESCE($8, 0), $9, $10, $11, $11
            )
            ON CONFLICT(id) DO UPDATE SET
                status = COALESCE($3, workout_sessions.status),
                started_at = COALESCE($4, workout_sessions.started_at),
                completed_at = COALESCE($5, workout_sessions.completed_at),
                duration = COALESCE($6, workout_sessions.duration),
                total_exercises = COALESCE($7, workout_sessions.total_exercises),
                completed_exercises = COALESCE($8, workout_sessions.completed_exercises),
                notes = COALESCE($9, workout_sessions.notes),
                rating = COALESCE($10, workout_sessions.rating),
                updated_at = $11
            WHERE workout_sessions.user_id = excluded.user_id
            RETURNING id
            ",
        )
        .bind(input.id)
        .bind(user_id.to_string())
        .bind(input.status.map(|s| s.as_str()))
        .bind(input.started_at.map(format_timestamp))
        .bind(input.completed_at.map(format_timestamp))
        .bind(input.duration)
        .bind(input.total_exercises)
        .bind(input.completed_exercises)
        .bind(&input.notes)
        .bind(input.rating)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| write_error("save workout session", &e))?;

        let Some(row) = row else {
            let mut error = AppError::not_found("Workout session").with_user_id(user_id);
            if let Some(id) = input.id {
                error = error.with_resource_id(id.to_string());
            }
            return Err(error);
        };
        let session_id: i64 = row.get("id");

        fetch_session(conn, user_id, session_id)
            .await?
            .ok_or_else(|| AppError::internal("Workout session missing after upsert"))
    }

    /// Resolve a client exercise reference, creating a placeholder if nothing matches
    ///
    /// Resolution order: integer id, then case-insensitive name fragment, then a
    /// new `other` exercise named after the reference. Returns the exercise id
    /// and whether it was created.
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn resolve_exercise(
        conn: &mut SqliteConnection,
        exercise_ref: &str,
    ) -> AppResult<(i64, bool)> {
        let exercise_ref = exercise_ref.trim();

        if let Ok(id) = exercise_ref.parse::<i64>() {
            let found: Option<i64> = sqlx::query_scalar("SELECT id FROM exercises WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(|e| AppError::database(format!("Failed to look up exercise: {e}")))?;
            if let Some(id) = found {
                return Ok((id, false));
            }
        }

        let by_name: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM exercises WHERE instr(lower(name), lower($1)) > 0 ORDER BY id LIMIT 1",
        )
        .bind(exercise_ref)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to search exercises: {e}")))?;
        if let Some(id) = by_name {
            return Ok((id, false));
        }

        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO exercises (name, description, muscle_group, difficulty_level, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(format!("{AUTO_CREATED_NAME_PREFIX} {exercise_ref}"))
        .bind(AUTO_CREATED_DESCRIPTION)
        .bind(MuscleGroup::Other.as_str())
        .bind(FitnessLevel::Beginner.as_str())
        .bind(format_timestamp(Utc::now()))
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| write_error("create exercise", &e))?;

        Ok((id, true))
    }

    /// Insert a set, or merge onto the set with the same (session, exercise, set number)
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn upsert_set(
        conn: &mut SqliteConnection,
        session_id: i64,
        exercise_id: i64,
        input: &ExerciseSetInput,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            r"
            INSERT INTO exercise_sets (
                session_id, exercise_id, set_number, reps_completed, weight_used, duration,
                rest_time, notes, difficulty_rating, created_at
            ) VALUES ($1, $2, COALESCE($3, 1), COALESCE($4, 0), $5, $6, $7, $8, $9, $10)
            ON CONFLICT(session_id, exercise_id, set_number) DO UPDATE SET
                reps_completed = COALESCE($4, exercise_sets.reps_completed),
                weight_used = COALESCE($5, exercise_sets.weight_used),
                duration = COALESCE($6, exercise_sets.duration),
                rest_time = COALESCE($7, exercise_sets.rest_time),
                notes = COALESCE($8, exercise_sets.notes),
                difficulty_rating = COALESCE($9, exercise_sets.difficulty_rating)
            RETURNING id
            ",
        )
        .bind(session_id)
        .bind(exercise_id)
        .bind(input.set_number)
        .bind(input.reps_completed)
        .bind(input.weight_used)
        .bind(input.duration)
        .bind(input.rest_time)
        .bind(&input.notes)
        .bind(input.difficulty_rating)
        .bind(format_timestamp(Utc::now()))
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| write_error("save exercise set", &e))
    }

    // ========================================================================
    // Session reads
    // ========================================================================

    /// Get one session owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_session(
        &self,
        user_id: Uuid,
        session_id: i64,
    ) -> AppResult<Option<WorkoutSession>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        fetch_session(&mut conn, user_id, session_id).await
    }

    /// One page of the user's sessions, most recently created first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_sessions(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Vec<WorkoutSession>> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM workout_sessions WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id.to_string())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list workout sessions: {e}")))?;

        rows.iter().map(row_to_session).collect()
    }

    /// The user's most recently created sessions
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn recent_sessions(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<WorkoutSession>> {
        self.list_sessions(
            user_id,
            PageRequest::new(1, u32::try_from(limit).unwrap_or(u32::MAX)),
        )
        .await
    }

    /// Number of sessions owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_sessions(&self, user_id: Uuid) -> AppResult<u64> {
        count(
            &self.pool,
            "SELECT COUNT(*) FROM workout_sessions WHERE user_id = $1",
            user_id,
        )
        .await
    }

    /// Status and duration of every session owned by the user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn session_status_durations(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<(SessionStatus, Option<i32>)>> {
        let rows = sqlx::query("SELECT status, duration FROM workout_sessions WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load session totals: {e}")))?;

        rows.iter()
            .map(|row| {
                let status: String = row.get("status");
                let status = status
                    .parse()
                    .map_err(|e: AppError| AppError::database(e.to_string()))?;
                Ok((status, row.get("duration")))
            })
            .collect()
    }

    /// Sets recorded in one session, with exercise names
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn sets_for_session(&self, session_id: i64) -> AppResult<Vec<ExerciseSet>> {
        let rows = sqlx::query(
            r"
            SELECT s.id, s.session_id, s.exercise_id, e.name AS exercise_name, s.set_number,
                   s.reps_completed, s.weight_used, s.duration, s.rest_time, s.notes,
                   s.difficulty_rating, s.created_at
            FROM exercise_sets s
            JOIN exercises e ON e.id = s.exercise_id
            WHERE s.session_id = $1
            ORDER BY s.exercise_id, s.set_number
            ",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list exercise sets: {e}")))?;

        rows.iter().map(row_to_set).collect()
    }

    // ========================================================================
    // Exercise catalog
    // ========================================================================

    /// List catalog exercises, optionally filtered by muscle group
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_exercises(&self, muscle_group: Option<MuscleGroup>) -> AppResult<Vec<Exercise>> {
        let rows = sqlx::query(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises \
             WHERE $1 IS NULL OR muscle_group = $1 ORDER BY name, id"
        ))
        .bind(muscle_group.map(|g| g.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list exercises: {e}")))?;

        rows.iter().map(row_to_exercise).collect()
    }

    /// Get one catalog exercise by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_exercise(&self, exercise_id: i64) -> AppResult<Option<Exercise>> {
        let row = sqlx::query(&format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = $1"))
            .bind(exercise_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get exercise: {e}")))?;

        row.map(|r| row_to_exercise(&r)).transpose()
    }

    /// Add an exercise to the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn create_exercise(&self, input: &ExerciseInput) -> AppResult<Exercise> {
        let row = sqlx::query(&format!(
            "INSERT INTO exercises (name, description, muscle_group, equipment_needed, \
             difficulty_level, created_at) VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {EXERCISE_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.muscle_group.as_str())
        .bind(&input.equipment_needed)
        .bind(input.difficulty_level.as_str())
        .bind(format_timestamp(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("create exercise", &e))?;

        row_to_exercise(&row)
    }

    // ========================================================================
    // Completed workouts
    // ========================================================================

    /// Append a completed workout to the user's log
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn log_completed_workout(
        &self,
        user_id: Uuid,
        input: &CompletedWorkoutInput,
    ) -> AppResult<CompletedWorkout> {
        let row = sqlx::query(&format!(
            "INSERT INTO completed_workouts (user_id, workout_name, workout_type, date, duration, \
             calories_burned, exercises_completed, notes, rating, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {COMPLETED_COLUMNS}"
        ))
        .bind(user_id.to_string())
        .bind(&input.workout_name)
        .bind(&input.workout_type)
        .bind(input.date.format("%Y-%m-%d").to_string())
        .bind(input.duration)
        .bind(input.calories_burned)
        .bind(input.exercises_completed)
        .bind(&input.notes)
        .bind(input.rating)
        .bind(format_timestamp(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("log completed workout", &e))?;

        row_to_completed(&row)
    }

    /// One page of the user's completed workouts, newest date first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_completed_workouts(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Vec<CompletedWorkout>> {
        let rows = sqlx::query(&format!(
            "SELECT {COMPLETED_COLUMNS} FROM completed_workouts WHERE user_id = $1 \
             ORDER BY date DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id.to_string())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list completed workouts: {e}")))?;

        rows.iter().map(row_to_completed).collect()
    }

    /// Number of completed workouts logged by the user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_completed_workouts(&self, user_id: Uuid) -> AppResult<u64> {
        count(
            &self.pool,
            "SELECT COUNT(*) FROM completed_workouts WHERE user_id = $1",
            user_id,
        )
        .await
    }

    /// The user's completed workouts dated within `from..=to`, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn completed_workouts_between(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<CompletedWorkout>> {
        let rows = sqlx::query(&format!(
            "SELECT {COMPLETED_COLUMNS} FROM completed_workouts \
             WHERE user_id = $1 AND date >= $2 AND date <= $3 ORDER BY date ASC, id ASC"
        ))
        .bind(user_id.to_string())
        .bind(from.format("%Y-%m-%d").to_string())
        .bind(to.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load completed workouts: {e}")))?;

        rows.iter().map(row_to_completed).collect()
    }

    /// Workout type of every completed workout logged by the user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn completed_workout_types(&self, user_id: Uuid) -> AppResult<Vec<Option<String>>> {
        sqlx::query_scalar("SELECT workout_type FROM completed_workouts WHERE user_id = $1")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load workout types: {e}")))
    }
}

async fn count(pool: &SqlitePool, sql: &'static str, user_id: Uuid) -> AppResult<u64> {
    let count: i64 = sqlx::query_scalar(sql)
        .bind(user_id.to_string())
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count rows: {e}")))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

async fn fetch_session(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    session_id: i64,
) -> AppResult<Option<WorkoutSession>> {
    let row = sqlx::query(&format!(
        "SELECT {SESSION_COLUMNS} FROM workout_sessions WHERE id = $1 AND user_id = $2"
    ))
    .bind(session_id)
    .bind(user_id.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to get workout session: {e}")))?;

    row.map(|r| row_to_session(&r)).transpose()
}

fn row_to_session(row: &SqliteRow) -> AppResult<WorkoutSession> {
    let user_id: String = row.get("user_id");
    let status: String = row.get("status");
    let started_at: Option<String> = row.get("started_at");
    let completed_at: Option<String> = row.get("completed_at");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(WorkoutSession {
        id: row.get("id"),
        user_id: parse_uuid(&user_id)?,
        status: status
            .parse()
            .map_err(|e: AppError| AppError::database(e.to_string()))?,
        started_at: parse_optional_timestamp(started_at.as_deref())?,
        completed_at: parse_optional_timestamp(completed_at.as_deref())?,
        duration: row.get("duration"),
        total_exercises: row.get("total_exercises"),
        completed_exercises: row.get("completed_exercises"),
        notes: row.get("notes"),
        rating: row.get("rating"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn row_to_set(row: &SqliteRow) -> AppResult<ExerciseSet> {
    let created_at: String = row.get("created_at");
    Ok(ExerciseSet {
        id: row.get("id"),
        session_id: row.get("session_id"),
        exercise_id: row.get("exercise_id"),
        exercise_name: row.get("exercise_name"),
        set_number: row.get("set_number"),
        reps_completed: row.get("reps_completed"),
        weight_used: row.get("weight_used"),
        duration: row.get("duration"),
        rest_time: row.get("rest_time"),
        notes: row.get("notes"),
        difficulty_rating: row.get("difficulty_rating"),
        created_at: parse_timestamp(&created_at)?,
    })
}

fn row_to_exercise(row: &SqliteRow) -> AppResult<Exercise> {
    let muscle_group: String = row.get("muscle_group");
    let difficulty_level: String = row.get("difficulty_level");
    let created_at: String = row.get("created_at");

    Ok(Exercise {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        muscle_group: muscle_group
            .parse()
            .map_err(|e: AppError| AppError::database(e.to_string()))?,
        equipment_needed: row.get("equipment_needed"),
        difficulty_level: difficulty_level
            .parse()
            .map_err(|e: AppError| AppError::database(e.to_string()))?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn row_to_completed(row: &SqliteRow) -> AppResult<CompletedWorkout> {
    let user_id: String = row.get("user_id");
    let date: String = row.get("date");
    let created_at: String = row.get("created_at");

    Ok(CompletedWorkout {
        id: row.get("id"),
        user_id: parse_uuid(&user_id)?,
        workout_name: row.get("workout_name"),
        workout_type: row.get("workout_type"),
        date: parse_date(&date)?,
        duration: row.get("duration"),
        calories_burned: row.get("calories_burned"),
        exercises_completed: row.get("exercises_completed"),
        notes: row.get("notes"),
        rating: row.get("rating"),
        created_at: parse_timestamp(&created_at)?,
    })
}
