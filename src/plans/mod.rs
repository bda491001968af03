// ABOUTME: Workout plan catalog: plans, scheduled days, and prescribed exercises
// ABOUTME: Public-or-own visibility for reads, author-only writes, grouped plan detail
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! # Plan Catalog
//!
//! A plan is visible to its author and, when public, to everyone. Only the
//! author may change a plan, its days, or their prescriptions. A plan the
//! caller cannot see is reported as not found; a visible plan owned by
//! someone else is reported as permission denied.

/// Plan, day, and prescription payload parsing
pub mod payload;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

pub use payload::{parse_day, parse_plan, parse_plan_exercise};

use crate::database::Database;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{PlanExercise, WorkoutDay, WorkoutPlan};
use crate::pagination::{Page, PageRequest};

/// A plan day with its prescriptions in order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayWithExercises {
    /// The day
    #[serde(flatten)]
    pub day: WorkoutDay,
    /// Prescriptions by position
    pub exercises: Vec<PlanExercise>,
}

/// A plan with its full schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanDetail {
    /// The plan
    #[serde(flatten)]
    pub plan: WorkoutPlan,
    /// Days by day number
    pub days: Vec<DayWithExercises>,
}

/// Workout plan catalog
pub struct PlanCatalog {
    database: Arc<Database>,
}

impl PlanCatalog {
    /// Create a catalog over the shared database
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Create a plan authored by the user
    ///
    /// # Errors
    ///
    /// Returns `MISSING_REQUIRED_FIELD` without a name, or a validation error
    pub async fn create_plan(&self, user_id: Uuid, data: &Value) -> AppResult<WorkoutPlan> {
        let input = parse_plan(data).inspect_err(|e| {
            warn!(user_id = %user_id, error = %e, "Rejected workout plan");
        })?;
        if input.name.is_none() {
            return Err(AppError::missing_field("name"));
        }
        let plan = self.database.plans().create_plan(user_id, &input).await?;
        info!(user_id = %user_id, plan_id = plan.id, "Workout plan created");
        Ok(plan)
    }

    /// One page of plans visible to the user
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails
    pub async fn list_plans(&self, user_id: Uuid, page: PageRequest) -> AppResult<Page<WorkoutPlan>> {
        let plans = self.database.plans();
        let total = plans.count_visible_plans(user_id).await?;
        let items = plans.list_visible_plans(user_id, page).await?;
        Ok(Page::new(items, page, total))
    }

    /// A visible plan with its days and prescriptions
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for a missing or private foreign plan
    pub async fn get_plan(&self, user_id: Uuid, plan_id: i64) -> AppResult<PlanDetail> {
        let plan = self.visible_plan(user_id, plan_id).await?;
        let plans = self.database.plans();
        let days = plans.days_for_plan(plan.id).await?;
        let exercises = plans.exercises_for_plan(plan.id).await?;

        let days = days
            .into_iter()
            .map(|day| DayWithExercises {
                exercises: exercises
                    .iter()
                    .filter(|e| e.day_id == day.id)
                    .cloned()
                    .collect(),
                day,
            })
            .collect();

        Ok(PlanDetail { plan, days })
    }

    /// Merge fields onto a plan the user authored
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND`, `PERMISSION_DENIED`, or a validation error
    pub async fn update_plan(&self, user_id: Uuid, plan_id: i64, data: &Value) -> AppResult<WorkoutPlan> {
        let input = parse_plan(data)?;
        self.owned_plan(user_id, plan_id).await?;
        let plan = self
            .database
            .plans()
            .update_plan(user_id, plan_id, &input)
            .await?
            .ok_or_else(|| plan_not_found(user_id, plan_id))?;
        info!(user_id = %user_id, plan_id, "Workout plan updated");
        Ok(plan)
    }

    /// Delete a plan the user authored, together with its schedule
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` or `PERMISSION_DENIED`
    pub async fn delete_plan(&self, user_id: Uuid, plan_id: i64) -> AppResult<()> {
        self.owned_plan(user_id, plan_id).await?;
        if !self.database.plans().delete_plan(user_id, plan_id).await? {
            return Err(plan_not_found(user_id, plan_id));
        }
        info!(user_id = %user_id, plan_id, "Workout plan deleted");
        Ok(())
    }

    /// Add a day to a plan the user authored
    ///
    /// # Errors
    ///
    /// Returns `MISSING_REQUIRED_FIELD` without name or day number,
    /// `RESOURCE_ALREADY_EXISTS` for a taken day number, or an access error
    pub async fn create_day(&self, user_id: Uuid, plan_id: i64, data: &Value) -> AppResult<WorkoutDay> {
        let input = parse_day(data)?;
        if input.name.is_none() {
            return Err(AppError::missing_field("name"));
        }
        if input.day_number.is_none() {
            return Err(AppError::missing_field("day_number"));
        }
        self.owned_plan(user_id, plan_id).await?;
        let day = self.database.plans().create_day(plan_id, &input).await?;
        info!(user_id = %user_id, plan_id, day_id = day.id, "Workout day created");
        Ok(day)
    }

    /// A day of a visible plan with its prescriptions
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for a missing day or a hidden plan
    pub async fn get_day(&self, user_id: Uuid, day_id: i64) -> AppResult<DayWithExercises> {
        let day = self.visible_day(user_id, day_id).await?;
        let exercises = self.database.plans().exercises_for_day(day.id).await?;
        Ok(DayWithExercises { day, exercises })
    }

    /// Merge fields onto a day of a plan the user authored
    ///
    /// # Errors
    ///
    /// Returns an access error, a validation error, or
    /// `RESOURCE_ALREADY_EXISTS` when moving onto a taken day number
    pub async fn update_day(&self, user_id: Uuid, day_id: i64, data: &Value) -> AppResult<WorkoutDay> {
        let input = parse_day(data)?;
        self.owned_day(user_id, day_id).await?;
        self.database
            .plans()
            .update_day(day_id, &input)
            .await?
            .ok_or_else(|| day_not_found(day_id))
    }

    /// Delete a day of a plan the user authored
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` or `PERMISSION_DENIED`
    pub async fn delete_day(&self, user_id: Uuid, day_id: i64) -> AppResult<()> {
        self.owned_day(user_id, day_id).await?;
        if !self.database.plans().delete_day(day_id).await? {
            return Err(day_not_found(day_id));
        }
        info!(user_id = %user_id, day_id, "Workout day deleted");
        Ok(())
    }

    /// Prescribe a catalog exercise on a day of a plan the user authored
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for an unknown exercise, an access error,
    /// or a validation error
    pub async fn add_exercise(&self, user_id: Uuid, day_id: i64, data: &Value) -> AppResult<PlanExercise> {
        let input = parse_plan_exercise(data)?;
        self.owned_day(user_id, day_id).await?;
        if self.database.workouts().get_exercise(input.exercise_id).await?.is_none() {
            return Err(AppError::not_found("Exercise")
                .with_resource_id(input.exercise_id.to_string()));
        }
        let prescription = self.database.plans().add_exercise(day_id, &input).await?;
        info!(
            user_id = %user_id,
            day_id,
            exercise_id = prescription.exercise_id,
            "Plan exercise added"
        );
        Ok(prescription)
    }

    /// Remove a prescription from a plan the user authored
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` or `PERMISSION_DENIED`
    pub async fn delete_exercise(&self, user_id: Uuid, plan_exercise_id: i64) -> AppResult<()> {
        let not_found = || {
            AppError::not_found("Plan exercise").with_resource_id(plan_exercise_id.to_string())
        };
        let prescription = self
            .database
            .plans()
            .get_exercise(plan_exercise_id)
            .await?
            .ok_or_else(not_found)?;
        self.owned_day(user_id, prescription.day_id)
            .await
            .map_err(|e| if e.code == ErrorCode::ResourceNotFound { not_found() } else { e })?;
        if !self.database.plans().delete_exercise(plan_exercise_id).await? {
            return Err(not_found());
        }
        Ok(())
    }

    async fn visible_plan(&self, user_id: Uuid, plan_id: i64) -> AppResult<WorkoutPlan> {
        self.database
            .plans()
            .get_visible_plan(user_id, plan_id)
            .await?
            .ok_or_else(|| plan_not_found(user_id, plan_id))
    }

    async fn owned_plan(&self, user_id: Uuid, plan_id: i64) -> AppResult<WorkoutPlan> {
        let plan = self.visible_plan(user_id, plan_id).await?;
        if plan.created_by != user_id {
            warn!(user_id = %user_id, plan_id, "Rejected change to another user's plan");
            return Err(AppError::permission_denied("Only the plan author can modify it")
                .with_user_id(user_id)
                .with_resource_id(plan_id.to_string()));
        }
        Ok(plan)
    }

    async fn visible_day(&self, user_id: Uuid, day_id: i64) -> AppResult<WorkoutDay> {
        let day = self
            .database
            .plans()
            .get_day(day_id)
            .await?
            .ok_or_else(|| day_not_found(day_id))?;
        self.visible_plan(user_id, day.plan_id)
            .await
            .map_err(|e| if e.code == ErrorCode::ResourceNotFound { day_not_found(day_id) } else { e })?;
        Ok(day)
    }

    async fn owned_day(&self, user_id: Uuid, day_id: i64) -> AppResult<WorkoutDay> {
        let day = self.visible_day(user_id, day_id).await?;
        self.owned_plan(user_id, day.plan_id).await?;
        Ok(day)
    }
}

fn plan_not_found(user_id: Uuid, plan_id: i64) -> AppError {
    AppError::not_found("Workout plan")
        .with_user_id(user_id)
        .with_resource_id(plan_id.to_string())
}

fn day_not_found(day_id: i64) -> AppError {
    AppError::not_found("Workout day").with_resource_id(day_id.to_string())
}
