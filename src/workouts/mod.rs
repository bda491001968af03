// ABOUTME: Workout aggregator merging session and exercise-set submissions
// ABOUTME: All-or-nothing saves in one transaction, plus rollup stats and paginated history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! # Workout Aggregator
//!
//! A save-progress submission carries an optional session object and a list of
//! sets. The whole submission is parsed and validated before the store is
//! touched; then the session upsert, exercise resolution, and every set upsert
//! run inside a single transaction. Either everything is written or nothing is.

/// Save-progress, exercise, and completed-workout payload parsing
pub mod payload;
/// Pure rollup computations
pub mod stats;

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

pub use payload::{parse_completed_workout, parse_exercise, parse_submission, WorkoutSubmission};
pub use stats::{compute_totals, type_distribution, SessionWithSets, WorkoutStats, WorkoutTotals};

use crate::constants::limits::{RECENT_SESSIONS_LIMIT, TRANSACTION_MAX_RETRIES};
use crate::database::{
    begin_immediate, retry_transaction, Database, UserManager, WorkoutManager,
};
use crate::errors::{AppError, AppResult};
use crate::models::{CompletedWorkout, Exercise, MuscleGroup, WorkoutSession};
use crate::pagination::{Page, PageRequest};

/// Outcome of a save-progress submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SavedWorkout {
    /// Created or merged session
    pub session_id: i64,
    /// Distinct set rows written
    pub sets_saved: usize,
    /// Placeholder exercises provisioned for unknown references
    pub exercises_created: usize,
}

/// Workout session and catalog aggregator
pub struct WorkoutAggregator {
    database: Arc<Database>,
}

impl WorkoutAggregator {
    /// Create an aggregator over the shared database
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Create or merge a session and all of its sets
    ///
    /// # Errors
    ///
    /// Returns a validation error (nothing written) for malformed input, any
    /// set without `exercise_id`, or `completed_exercises` above
    /// `total_exercises`; `RESOURCE_NOT_FOUND` for another user's session id;
    /// or a database error
    pub async fn save_progress(&self, user_id: Uuid, data: &Value) -> AppResult<SavedWorkout> {
        let submission = parse_submission(data).inspect_err(|e| {
            warn!(user_id = %user_id, error = %e, "Rejected workout submission");
        })?;

        match self.write_submission(user_id, &submission).await {
            Ok(saved) => {
                info!(
                    user_id = %user_id,
                    session_id = saved.session_id,
                    sets_saved = saved.sets_saved,
                    exercises_created = saved.exercises_created,
                    "Workout progress saved"
                );
                Ok(saved)
            }
            Err(e) => {
                if e.code.is_client_error() {
                    warn!(user_id = %user_id, error = %e, "Rejected workout submission");
                } else {
                    error!(user_id = %user_id, error = %e, "Workout save failed");
                }
                Err(e)
            }
        }
    }

    async fn write_submission(
        &self,
        user_id: Uuid,
        submission: &WorkoutSubmission,
    ) -> AppResult<SavedWorkout> {
        let pool = self.database.pool();

        retry_transaction(
            || async move {
                let mut guard = begin_immediate(pool).await?;

                UserManager::get_user_in(guard.executor()?, user_id).await?;

                let session =
                    WorkoutManager::upsert_session(guard.executor()?, user_id, &submission.session)
                        .await?;
                if session.completed_exercises > session.total_exercises {
                    return Err(AppError::out_of_range(
                        "completed_exercises",
                        format!(
                            "completed_exercises ({}) exceeds total_exercises ({})",
                            session.completed_exercises, session.total_exercises
                        ),
                    ));
                }

                let mut set_ids = BTreeSet::new();
                let mut exercises_created = 0;
                for set in &submission.sets {
                    let (exercise_id, created) =
                        WorkoutManager::resolve_exercise(guard.executor()?, &set.exercise_ref)
                            .await?;
                    if created {
                        exercises_created += 1;
                    }
                    let set_id =
                        WorkoutManager::upsert_set(guard.executor()?, session.id, exercise_id, set)
                            .await?;
                    set_ids.insert(set_id);
                }

                guard.commit().await?;
                Ok(SavedWorkout {
                    session_id: session.id,
                    sets_saved: set_ids.len(),
                    exercises_created,
                })
            },
            TRANSACTION_MAX_RETRIES,
        )
        .await
    }

    /// Session totals, completion rate, recent sessions, and type distribution
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn get_stats(&self, user_id: Uuid) -> AppResult<WorkoutStats> {
        let workouts = self.database.workouts();

        let totals = compute_totals(&workouts.session_status_durations(user_id).await?);

        let recent = workouts.recent_sessions(user_id, RECENT_SESSIONS_LIMIT).await?;
        let mut recent_sessions = Vec::with_capacity(recent.len());
        for session in recent {
            let sets = workouts.sets_for_session(session.id).await?;
            recent_sessions.push(SessionWithSets { session, sets });
        }

        let workout_type_distribution =
            type_distribution(&workouts.completed_workout_types(user_id).await?);

        Ok(WorkoutStats {
            totals,
            recent_sessions,
            workout_type_distribution,
        })
    }

    /// One page of sessions, most recently created first
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn get_history(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<WorkoutSession>> {
        let workouts = self.database.workouts();
        let total = workouts.count_sessions(user_id).await?;
        let items = workouts.list_sessions(user_id, page).await?;
        Ok(Page::new(items, page, total))
    }

    /// One session owned by the user, with its sets
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for a missing or foreign session
    pub async fn get_session(&self, user_id: Uuid, session_id: i64) -> AppResult<SessionWithSets> {
        let workouts = self.database.workouts();
        let session = workouts
            .get_session(user_id, session_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Workout session")
                    .with_user_id(user_id)
                    .with_resource_id(session_id.to_string())
            })?;
        let sets = workouts.sets_for_session(session.id).await?;
        Ok(SessionWithSets { session, sets })
    }

    /// Catalog exercises, optionally filtered by a muscle group name
    ///
    /// # Errors
    ///
    /// Returns `INVALID_FORMAT` for an unknown muscle group
    pub async fn list_exercises(&self, muscle_group: Option<&str>) -> AppResult<Vec<Exercise>> {
        let filter = muscle_group
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(|g| {
                g.parse::<MuscleGroup>()
                    .map_err(|e| AppError::invalid_format("muscle_group", e.message))
            })
            .transpose()?;
        self.database.workouts().list_exercises(filter).await
    }

    /// Add an exercise to the catalog
    ///
    /// # Errors
    ///
    /// Returns a validation error or a database error
    pub async fn create_exercise(&self, data: &Value) -> AppResult<Exercise> {
        let input = parse_exercise(data)?;
        let exercise = self.database.workouts().create_exercise(&input).await?;
        info!(exercise_id = exercise.id, name = %exercise.name, "Exercise created");
        Ok(exercise)
    }

    /// Append a finished workout to the user's log
    ///
    /// # Errors
    ///
    /// Returns a validation error (rating outside 1..=5 included) or a database error
    pub async fn log_completed_workout(
        &self,
        user_id: Uuid,
        data: &Value,
    ) -> AppResult<CompletedWorkout> {
        let input = parse_completed_workout(data).inspect_err(|e| {
            warn!(user_id = %user_id, error = %e, "Rejected completed workout");
        })?;
        let workout = self
            .database
            .workouts()
            .log_completed_workout(user_id, &input)
            .await?;
        info!(user_id = %user_id, workout_id = workout.id, "Completed workout logged");
        Ok(workout)
    }

    /// One page of completed workouts, newest date first
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn list_completed_workouts(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<CompletedWorkout>> {
        let workouts = self.database.workouts();
        let total = workouts.count_completed_workouts(user_id).await?;
        let items = workouts.list_completed_workouts(user_id, page).await?;
        Ok(Page::new(items, page, total))
    }
}
