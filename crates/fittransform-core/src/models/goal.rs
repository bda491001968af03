// ABOUTME: Goal and plan-progress tracking models with derived progress fields
// ABOUTME: Goal type and status enumerations with database string mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::plan::PlanDuration;
use crate::errors::AppError;

/// What a goal measures
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Body weight target
    Weight,
    /// Body measurement target
    Measurement,
    /// Lifting target
    Strength,
    /// Duration or distance target
    Endurance,
    /// Body fat or muscle mass target
    BodyComposition,
}

impl GoalType {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Measurement => "measurement",
            Self::Strength => "strength",
            Self::Endurance => "endurance",
            Self::BodyComposition => "body_composition",
        }
    }
}

impl Display for GoalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weight" => Ok(Self::Weight),
            "measurement" => Ok(Self::Measurement),
            "strength" => Ok(Self::Strength),
            "endurance" => Ok(Self::Endurance),
            "body_composition" => Ok(Self::BodyComposition),
            _ => Err(AppError::invalid_input(format!("Invalid goal type: {s}"))),
        }
    }
}

/// Lifecycle of a goal
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Being worked towards
    #[default]
    Active,
    /// Reached, either by progress or by the user
    Completed,
    /// Abandoned; progress no longer completes it
    Cancelled,
}

impl GoalStatus {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for GoalStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(AppError::invalid_input(format!(
                "Invalid goal status: {s} (expected active, completed, or cancelled)"
            ))),
        }
    }
}

/// A user's target with its derived progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Row identifier
    pub id: i64,
    /// Owner
    pub user_id: Uuid,
    /// Short title
    pub title: String,
    /// Description
    pub description: String,
    /// What is measured
    pub goal_type: GoalType,
    /// Baseline the progress is measured from
    pub start_value: Option<f64>,
    /// Value to reach
    pub target_value: Option<f64>,
    /// Latest recorded value
    pub current_value: Option<f64>,
    /// Deadline
    pub target_date: NaiveDate,
    /// Derived from start, current, and target values; 0 to 100
    pub progress_percentage: f64,
    /// Lifecycle state
    pub status: GoalStatus,
    /// Set once the goal is reached and never cleared
    pub is_achieved: bool,
    /// When the goal was first reached
    pub achieved_at: Option<DateTime<Utc>>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

/// A user's run through a workout plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanProgress {
    /// Row identifier
    pub id: i64,
    /// Owner
    pub user_id: Uuid,
    /// Plan being followed, if it still exists
    pub plan_id: Option<i64>,
    /// Plan name at enrollment
    pub plan_name: String,
    /// Plan length at enrollment
    pub plan_duration: PlanDuration,
    /// First day of the run
    pub start_date: NaiveDate,
    /// Last day of the run, once known
    pub end_date: Option<NaiveDate>,
    /// 1-based day the user has reached
    pub current_day: i32,
    /// Days in the run
    pub total_days: i32,
    /// Derived from `current_day` over `total_days`; 0 to 100
    pub completion_percentage: f64,
    /// Workouts logged against the run
    pub workouts_completed: i32,
    /// Minutes trained during the run
    pub total_workout_time: i32,
    /// Mean of the ratings logged against the run
    pub average_workout_rating: Option<f64>,
    /// Ratings behind `average_workout_rating`
    pub rated_workouts: i32,
    /// Still being followed
    pub is_active: bool,
    /// Reached the last day
    pub is_completed: bool,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}
