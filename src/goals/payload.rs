// ABOUTME: Parsing of goal, plan-run, and logged-workout payloads into partial patches
// ABOUTME: Derived fields are never read from the client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use chrono::NaiveDate;
use serde_json::Value;

use crate::constants::limits::{MAX_RATING, MIN_RATING};
use crate::errors::{AppError, AppResult};
use crate::models::{GoalStatus, GoalType, PlanDuration};
use crate::utils::payload::{
    as_payload, lookup, read_bool, read_date, read_enum, read_f64, read_non_negative_i32,
    read_ranged_i32, read_string, read_text,
};

/// Goal fields present in a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalPatch {
    /// Short title
    pub title: Option<String>,
    /// Description
    pub description: Option<String>,
    /// What is measured
    pub goal_type: Option<GoalType>,
    /// Baseline
    pub start_value: Option<f64>,
    /// Value to reach
    pub target_value: Option<f64>,
    /// Latest recorded value
    pub current_value: Option<f64>,
    /// Deadline
    pub target_date: Option<NaiveDate>,
    /// Lifecycle state
    pub status: Option<GoalStatus>,
}

/// Plan-run fields present in a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanProgressPatch {
    /// Plan being followed
    pub plan_id: Option<i64>,
    /// Plan name, defaults to the plan's name
    pub plan_name: Option<String>,
    /// Plan length, defaults to the plan's duration
    pub plan_duration: Option<PlanDuration>,
    /// First day of the run
    pub start_date: Option<NaiveDate>,
    /// Last day of the run
    pub end_date: Option<NaiveDate>,
    /// 1-based day reached
    pub current_day: Option<i32>,
    /// Days in the run, defaults to the duration's day count
    pub total_days: Option<i32>,
    /// Still being followed
    pub is_active: Option<bool>,
}

/// A workout logged against a plan run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkoutLog {
    /// Minutes trained
    pub duration: i32,
    /// Rating from 1 to 5
    pub rating: Option<i32>,
}

/// Parse goal fields; every field is optional
///
/// # Errors
///
/// Returns a validation error for a malformed field
pub fn parse_goal(body: &Value) -> AppResult<GoalPatch> {
    let payload = as_payload(body)?;

    let title = match lookup(payload, &["title", "name"]) {
        Some((key, value)) => read_string(value, key)?,
        None => None,
    };
    let description = match lookup(payload, &["description"]) {
        Some((key, value)) => read_text(value, key)?,
        None => None,
    };
    let goal_type = match lookup(payload, &["goal_type", "goalType", "type"]) {
        Some((key, value)) => read_enum(value, key)?,
        None => None,
    };
    let start_value = match lookup(payload, &["start_value", "startValue"]) {
        Some((key, value)) => read_f64(value, key)?,
        None => None,
    };
    let target_value = match lookup(payload, &["target_value", "targetValue"]) {
        Some((key, value)) => read_f64(value, key)?,
        None => None,
    };
    let current_value = match lookup(payload, &["current_value", "currentValue"]) {
        Some((key, value)) => read_f64(value, key)?,
        None => None,
    };
    let target_date = match lookup(payload, &["target_date", "targetDate"]) {
        Some((key, value)) => read_date(value, key)?,
        None => None,
    };
    let status = match lookup(payload, &["status"]) {
        Some((key, value)) => read_enum(value, key)?,
        None => None,
    };

    Ok(GoalPatch {
        title,
        description,
        goal_type,
        start_value,
        target_value,
        current_value,
        target_date,
        status,
    })
}

/// Parse plan-run fields; every field is optional
///
/// # Errors
///
/// Returns a validation error for a malformed field or a day count below 1
pub fn parse_plan_progress(body: &Value) -> AppResult<PlanProgressPatch> {
    let payload = as_payload(body)?;

    let plan_id = match lookup(payload, &["plan", "plan_id", "planId"]) {
        Some((key, value)) => read_ranged_i32(value, key, 1, i32::MAX)?.map(i64::from),
        None => None,
    };
    let plan_name = match lookup(payload, &["plan_name", "planName"]) {
        Some((key, value)) => read_string(value, key)?,
        None => None,
    };
    let plan_duration = match lookup(payload, &["plan_duration", "planDuration"]) {
        Some((key, value)) => read_enum(value, key)?,
        None => None,
    };
    let start_date = match lookup(payload, &["start_date", "startDate"]) {
        Some((key, value)) => read_date(value, key)?,
        None => None,
    };
    let end_date = match lookup(payload, &["end_date", "endDate"]) {
        Some((key, value)) => read_date(value, key)?,
        None => None,
    };
    let current_day = match lookup(payload, &["current_day", "currentDay"]) {
        Some((key, value)) => read_ranged_i32(value, key, 1, i32::MAX)?,
        None => None,
    };
    let total_days = match lookup(payload, &["total_days", "totalDays"]) {
        Some((key, value)) => read_ranged_i32(value, key, 1, i32::MAX)?,
        None => None,
    };
    let is_active = match lookup(payload, &["is_active", "isActive"]) {
        Some((key, value)) => read_bool(value, key)?,
        None => None,
    };

    Ok(PlanProgressPatch {
        plan_id,
        plan_name,
        plan_duration,
        start_date,
        end_date,
        current_day,
        total_days,
        is_active,
    })
}

/// Parse a workout logged against a run; `duration` is required
///
/// # Errors
///
/// Returns `MISSING_REQUIRED_FIELD` without a duration, or a validation error
pub fn parse_workout_log(body: &Value) -> AppResult<WorkoutLog> {
    let payload = as_payload(body)?;

    let duration = match lookup(payload, &["duration", "workout_time", "workoutTime"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    }
    .ok_or_else(|| AppError::missing_field("duration"))?;
    let rating = match lookup(payload, &["rating"]) {
        Some((key, value)) => read_ranged_i32(value, key, MIN_RATING, MAX_RATING)?,
        None => None,
    };

    Ok(WorkoutLog { duration, rating })
}
