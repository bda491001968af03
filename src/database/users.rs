// ABOUTME: User account database operations
// ABOUTME: Registration inserts, lookups by id/email/username, and partial profile merges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::{execute_ddl, format_timestamp, parse_timestamp, parse_uuid, write_error};
use crate::errors::{AppError, AppResult};
use crate::models::{ProfilePatch, User};

const USER_COLUMNS: &str = "id, email, username, first_name, last_name, password_hash, \
    is_active, height, weight, gender, age, fitness_level, fitness_goal, specific_goal, \
    has_completed_onboarding, created_at, updated_at";

pub(super) async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    execute_ddl(
        pool,
        &[
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL UNIQUE,
                first_name TEXT,
                last_name TEXT,
                password_hash TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                height REAL,
                weight REAL,
                gender TEXT CHECK (gender IS NULL OR gender IN ('male', 'female', 'other')),
                age INTEGER,
                fitness_level TEXT NOT NULL DEFAULT 'beginner',
                fitness_goal TEXT,
                specific_goal TEXT,
                has_completed_onboarding INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
        ],
    )
    .await
}

/// User account database operations manager
pub struct UserManager {
    pool: SqlitePool,
}

impl UserManager {
    /// Create a new user manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` if the email or username is taken,
    /// or a database error
    pub async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        sqlx::query(
            r"
            INSERT INTO users (
                id, email, username, first_name, last_name, password_hash, is_active,
                height, weight, gender, age, fitness_level, fitness_goal, specific_goal,
                has_completed_onboarding, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.height)
        .bind(user.weight)
        .bind(user.gender.map(|g| g.as_str()))
        .bind(user.age)
        .bind(user.fitness_level.as_str())
        .bind(user.fitness_goal.map(|g| g.as_str()))
        .bind(user.specific_goal.map(|g| g.as_str()))
        .bind(user.has_completed_onboarding)
        .bind(format_timestamp(user.created_at))
        .bind(format_timestamp(user.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("create user", &e))?;

        Ok(user.id)
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        fetch_user(&mut conn, user_id).await
    }

    /// Get a user by email (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = lower($1)"
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Whether a username is already taken
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check username: {e}")))?;
        Ok(count > 0)
    }

    /// Merge a profile patch onto the user row
    ///
    /// Absent fields keep their stored value; `complete_onboarding` can only
    /// raise the onboarding flag.
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the user does not exist, or a database error
    pub async fn apply_profile_patch(
        conn: &mut SqliteConnection,
        user_id: Uuid,
        patch: &ProfilePatch,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                height = COALESCE($2, height),
                weight = COALESCE($3, weight),
                gender = COALESCE($4, gender),
                age = COALESCE($5, age),
                fitness_level = COALESCE($6, fitness_level),
                fitness_goal = COALESCE($7, fitness_goal),
                specific_goal = COALESCE($8, specific_goal),
                has_completed_onboarding = MAX(has_completed_onboarding, $9),
                updated_at = $10
            WHERE id = $1
            ",
        )
        .bind(user_id.to_string())
        .bind(patch.height)
        .bind(patch.weight)
        .bind(patch.gender.map(|g| g.as_str()))
        .bind(patch.age)
        .bind(patch.fitness_level.map(|l| l.as_str()))
        .bind(patch.fitness_goal.map(|g| g.as_str()))
        .bind(patch.specific_goal.map(|g| g.as_str()))
        .bind(patch.complete_onboarding)
        .bind(format_timestamp(Utc::now()))
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to update user profile: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User").with_user_id(user_id));
        }
        Ok(())
    }

    /// Read a user inside an open transaction
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the user does not exist, or a database error
    pub async fn get_user_in(conn: &mut SqliteConnection, user_id: Uuid) -> AppResult<User> {
        fetch_user(conn, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User").with_user_id(user_id))
    }
}

async fn fetch_user(conn: &mut SqliteConnection, user_id: Uuid) -> AppResult<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id.to_string())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

    row.map(|r| row_to_user(&r)).transpose()
}

fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let id: String = row.get("id");
    let gender: Option<String> = row.get("gender");
    let fitness_level: String = row.get("fitness_level");
    let fitness_goal: Option<String> = row.get("fitness_goal");
    let specific_goal: Option<String> = row.get("specific_goal");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(User {
        id: parse_uuid(&id)?,
        email: row.get("email"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        password_hash: row.get("password_hash"),
        is_active: row.get("is_active"),
        height: row.get("height"),
        weight: row.get("weight"),
        gender: gender
            .map(|g| g.parse())
            .transpose()
            .map_err(|e: AppError| AppError::database(e.to_string()))?,
        age: row.get("age"),
        fitness_level: fitness_level
            .parse()
            .map_err(|e: AppError| AppError::database(e.to_string()))?,
        fitness_goal: fitness_goal
            .map(|g| g.parse())
            .transpose()
            .map_err(|e: AppError| AppError::database(e.to_string()))?,
        specific_goal: specific_goal
            .map(|g| g.parse())
            .transpose()
            .map_err(|e: AppError| AppError::database(e.to_string()))?,
        has_completed_onboarding: row.get("has_completed_onboarding"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
