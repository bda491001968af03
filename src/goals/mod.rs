// ABOUTME: Goal tracker for user goals and runs through workout plans
// ABOUTME: Read-merge-derive-save updates inside one immediate transaction per write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! # Goal Tracker
//!
//! Goals and plan runs carry derived fields (progress and completion
//! percentages, achievement flags, rating means). Clients never write those
//! directly: every change merges the request onto the stored row, recomputes
//! the derived fields, and saves the whole row in one transaction.

/// Pure progress and completion derivations
pub mod compute;
/// Goal, plan-run, and workout-log payload parsing
pub mod payload;

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

pub use compute::{
    evaluate_goal, evaluate_plan_progress, goal_progress_percentage, plan_completion_percentage,
    record_workout,
};
pub use payload::{
    parse_goal, parse_plan_progress, parse_workout_log, GoalPatch, PlanProgressPatch, WorkoutLog,
};

use crate::constants::limits::TRANSACTION_MAX_RETRIES;
use crate::database::{
    begin_immediate, retry_transaction, Database, GoalManager, GoalValues, PlanProgressManager,
    PlanProgressValues,
};
use crate::errors::{AppError, AppResult};
use crate::models::{Goal, GoalStatus, PlanProgress};
use crate::pagination::{Page, PageRequest};

/// Goal and plan-run tracker
pub struct GoalTracker {
    database: Arc<Database>,
}

impl GoalTracker {
    /// Create a tracker over the shared database
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    // ========================================================================
    // Goals
    // ========================================================================

    /// Create a goal with its derived progress
    ///
    /// # Errors
    ///
    /// Returns `MISSING_REQUIRED_FIELD` without title, goal type, or target
    /// date, or a validation error
    pub async fn create_goal(&self, user_id: Uuid, data: &Value) -> AppResult<Goal> {
        let patch = parse_goal(data).inspect_err(|e| {
            warn!(user_id = %user_id, error = %e, "Rejected goal");
        })?;
        let mut values = GoalValues {
            title: patch.title.ok_or_else(|| AppError::missing_field("title"))?,
            description: patch.description.unwrap_or_default(),
            goal_type: patch.goal_type.ok_or_else(|| AppError::missing_field("goal_type"))?,
            start_value: patch.start_value,
            target_value: patch.target_value,
            current_value: patch.current_value.or(patch.start_value),
            target_date: patch
                .target_date
                .ok_or_else(|| AppError::missing_field("target_date"))?,
            progress_percentage: 0.0,
            status: patch.status.unwrap_or_default(),
            is_achieved: false,
            achieved_at: None,
        };
        evaluate_goal(&mut values, Utc::now());

        let goal = self.database.goals().insert_goal(user_id, &values).await?;
        info!(
            user_id = %user_id,
            goal_id = goal.id,
            progress = goal.progress_percentage,
            "Goal created"
        );
        Ok(goal)
    }

    /// One page of the user's goals, optionally filtered by a status name
    ///
    /// # Errors
    ///
    /// Returns `INVALID_FORMAT` for an unknown status
    pub async fn list_goals(
        &self,
        user_id: Uuid,
        status: Option<&str>,
        page: PageRequest,
    ) -> AppResult<Page<Goal>> {
        let filter = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<GoalStatus>()
                    .map_err(|e| AppError::invalid_format("status", e.message))
            })
            .transpose()?;
        let goals = self.database.goals();
        let total = goals.count_goals(user_id, filter).await?;
        let items = goals.list_goals(user_id, filter, page).await?;
        Ok(Page::new(items, page, total))
    }

    /// One of the user's goals
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for a missing or foreign goal
    pub async fn get_goal(&self, user_id: Uuid, goal_id: i64) -> AppResult<Goal> {
        self.database
            .goals()
            .get_goal(user_id, goal_id)
            .await?
            .ok_or_else(|| goal_not_found(user_id, goal_id))
    }

    /// Merge fields onto a goal and recompute its progress
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND`, a validation error, or a database error
    pub async fn update_goal(&self, user_id: Uuid, goal_id: i64, data: &Value) -> AppResult<Goal> {
        let patch = parse_goal(data).inspect_err(|e| {
            warn!(user_id = %user_id, error = %e, "Rejected goal update");
        })?;
        let goal = self.write_goal(user_id, goal_id, &patch).await?;
        info!(
            user_id = %user_id,
            goal_id,
            progress = goal.progress_percentage,
            status = %goal.status,
            "Goal updated"
        );
        Ok(goal)
    }

    async fn write_goal(&self, user_id: Uuid, goal_id: i64, patch: &GoalPatch) -> AppResult<Goal> {
        let pool = self.database.pool();

        retry_transaction(
            || async move {
                let mut guard = begin_immediate(pool).await?;
                let stored = GoalManager::fetch_goal(guard.executor()?, user_id, goal_id)
                    .await?
                    .ok_or_else(|| goal_not_found(user_id, goal_id))?;

                let mut values = merge_goal(&stored, patch);
                evaluate_goal(&mut values, Utc::now());
                let goal =
                    GoalManager::save_goal(guard.executor()?, user_id, goal_id, &values).await?;

                guard.commit().await?;
                Ok(goal)
            },
            TRANSACTION_MAX_RETRIES,
        )
        .await
    }

    /// Delete one of the user's goals
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for a missing or foreign goal
    pub async fn delete_goal(&self, user_id: Uuid, goal_id: i64) -> AppResult<()> {
        if !self.database.goals().delete_goal(user_id, goal_id).await? {
            return Err(goal_not_found(user_id, goal_id));
        }
        info!(user_id = %user_id, goal_id, "Goal deleted");
        Ok(())
    }

    // ========================================================================
    // Plan runs
    // ========================================================================

    /// Start a run through a plan
    ///
    /// With a plan reference the name and duration default to the plan's; the
    /// plan must be visible to the user. Without one a plan name is required.
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for a hidden plan, `MISSING_REQUIRED_FIELD`,
    /// or a validation error
    pub async fn start_plan(&self, user_id: Uuid, data: &Value) -> AppResult<PlanProgress> {
        let patch = parse_plan_progress(data).inspect_err(|e| {
            warn!(user_id = %user_id, error = %e, "Rejected plan progress");
        })?;

        let plan = match patch.plan_id {
            Some(plan_id) => Some(
                self.database
                    .plans()
                    .get_visible_plan(user_id, plan_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found("Workout plan").with_resource_id(plan_id.to_string())
                    })?,
            ),
            None => None,
        };

        let plan_name = patch
            .plan_name
            .or_else(|| plan.as_ref().map(|p| p.name.clone()))
            .ok_or_else(|| AppError::missing_field("plan_name"))?;
        let plan_duration = patch
            .plan_duration
            .or_else(|| plan.as_ref().map(|p| p.duration))
            .unwrap_or_default();
        let total_days = patch.total_days.unwrap_or_else(|| plan_duration.days());

        let mut values = PlanProgressValues {
            plan_id: patch.plan_id,
            plan_name,
            plan_duration,
            start_date: patch.start_date.unwrap_or_else(|| Utc::now().date_naive()),
            end_date: patch.end_date,
            current_day: patch.current_day.unwrap_or(1),
            total_days,
            completion_percentage: 0.0,
            workouts_completed: 0,
            total_workout_time: 0,
            average_workout_rating: None,
            rated_workouts: 0,
            is_active: patch.is_active.unwrap_or(true),
            is_completed: false,
        };
        evaluate_plan_progress(&mut values);

        let progress = self
            .database
            .plan_progress()
            .insert_progress(user_id, &values)
            .await?;
        info!(user_id = %user_id, progress_id = progress.id, "Plan run started");
        Ok(progress)
    }

    /// One page of the user's plan runs
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn list_plan_progress(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<PlanProgress>> {
        let runs = self.database.plan_progress();
        let total = runs.count_progress(user_id).await?;
        let items = runs.list_progress(user_id, page).await?;
        Ok(Page::new(items, page, total))
    }

    /// One of the user's plan runs
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for a missing or foreign run
    pub async fn get_plan_progress(&self, user_id: Uuid, progress_id: i64) -> AppResult<PlanProgress> {
        self.database
            .plan_progress()
            .get_progress(user_id, progress_id)
            .await?
            .ok_or_else(|| progress_not_found(user_id, progress_id))
    }

    /// Merge fields onto a plan run and recompute its completion
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND`, a validation error, or a database error
    pub async fn update_plan_progress(
        &self,
        user_id: Uuid,
        progress_id: i64,
        data: &Value,
    ) -> AppResult<PlanProgress> {
        let patch = parse_plan_progress(data)?;
        if let Some(plan_id) = patch.plan_id {
            if self
                .database
                .plans()
                .get_visible_plan(user_id, plan_id)
                .await?
                .is_none()
            {
                return Err(AppError::not_found("Workout plan").with_resource_id(plan_id.to_string()));
            }
        }
        let progress = self
            .write_plan_progress(user_id, progress_id, |values| {
                merge_plan_progress(values, &patch);
                Ok(())
            })
            .await?;
        info!(
            user_id = %user_id,
            progress_id,
            completion = progress.completion_percentage,
            "Plan run updated"
        );
        Ok(progress)
    }

    /// Record a finished workout against an active plan run
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for a completed run, `RESOURCE_NOT_FOUND`, or a
    /// validation error
    pub async fn log_workout(
        &self,
        user_id: Uuid,
        progress_id: i64,
        data: &Value,
    ) -> AppResult<PlanProgress> {
        let log = parse_workout_log(data).inspect_err(|e| {
            warn!(user_id = %user_id, error = %e, "Rejected plan workout log");
        })?;
        let progress = self
            .write_plan_progress(user_id, progress_id, |values| {
                if values.is_completed {
                    return Err(AppError::invalid_input("Plan run is already completed")
                        .with_resource_id(progress_id.to_string()));
                }
                record_workout(values, log.duration, log.rating);
                Ok(())
            })
            .await?;
        info!(
            user_id = %user_id,
            progress_id,
            current_day = progress.current_day,
            workouts_completed = progress.workouts_completed,
            "Plan workout logged"
        );
        Ok(progress)
    }

    async fn write_plan_progress<F>(
        &self,
        user_id: Uuid,
        progress_id: i64,
        apply: F,
    ) -> AppResult<PlanProgress>
    where
        F: Fn(&mut PlanProgressValues) -> AppResult<()>,
    {
        let pool = self.database.pool();
        let apply = &apply;

        retry_transaction(
            || async move {
                let mut guard = begin_immediate(pool).await?;
                let stored =
                    PlanProgressManager::fetch_progress(guard.executor()?, user_id, progress_id)
                        .await?
                        .ok_or_else(|| progress_not_found(user_id, progress_id))?;

                let mut values = PlanProgressValues::from(&stored);
                apply(&mut values)?;
                evaluate_plan_progress(&mut values);
                let progress = PlanProgressManager::save_progress(
                    guard.executor()?,
                    user_id,
                    progress_id,
                    &values,
                )
                .await?;

                guard.commit().await?;
                Ok(progress)
            },
            TRANSACTION_MAX_RETRIES,
        )
        .await
    }

    /// Delete one of the user's plan runs
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for a missing or foreign run
    pub async fn delete_plan_progress(&self, user_id: Uuid, progress_id: i64) -> AppResult<()> {
        if !self
            .database
            .plan_progress()
            .delete_progress(user_id, progress_id)
            .await?
        {
            return Err(progress_not_found(user_id, progress_id));
        }
        info!(user_id = %user_id, progress_id, "Plan run deleted");
        Ok(())
    }
}

fn merge_goal(stored: &Goal, patch: &GoalPatch) -> GoalValues {
    let mut values = GoalValues::from(stored);
    if let Some(title) = &patch.title {
        values.title.clone_from(title);
    }
    if let Some(description) = &patch.description {
        values.description.clone_from(description);
    }
    if let Some(goal_type) = patch.goal_type {
        values.goal_type = goal_type;
    }
    if patch.start_value.is_some() {
        values.start_value = patch.start_value;
    }
    if patch.target_value.is_some() {
        values.target_value = patch.target_value;
    }
    if patch.current_value.is_some() {
        values.current_value = patch.current_value;
    }
    if let Some(target_date) = patch.target_date {
        values.target_date = target_date;
    }
    if let Some(status) = patch.status {
        values.status = status;
    }
    values
}

fn merge_plan_progress(values: &mut PlanProgressValues, patch: &PlanProgressPatch) {
    if patch.plan_id.is_some() {
        values.plan_id = patch.plan_id;
    }
    if let Some(plan_name) = &patch.plan_name {
        values.plan_name.clone_from(plan_name);
    }
    if let Some(plan_duration) = patch.plan_duration {
        values.plan_duration = plan_duration;
    }
    if let Some(start_date) = patch.start_date {
        values.start_date = start_date;
    }
    if patch.end_date.is_some() {
        values.end_date = patch.end_date;
    }
    if let Some(current_day) = patch.current_day {
        values.current_day = current_day;
    }
    if let Some(total_days) = patch.total_days {
        values.total_days = total_days;
    }
    if let Some(is_active) = patch.is_active {
        values.is_active = is_active;
    }
}

fn goal_not_found(user_id: Uuid, goal_id: i64) -> AppError {
    AppError::not_found("Goal")
        .with_user_id(user_id)
        .with_resource_id(goal_id.to_string())
}

fn progress_not_found(user_id: Uuid, progress_id: i64) -> AppError {
    AppError::not_found("Plan progress")
        .with_user_id(user_id)
        .with_resource_id(progress_id.to_string())
}
