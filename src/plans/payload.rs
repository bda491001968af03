// ABOUTME: Parsing of workout plan, plan day, and prescribed-exercise payloads
// ABOUTME: Shared by create and update; required fields are enforced by the catalog on create
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use serde_json::Value;

use crate::database::{PlanExerciseInput, WorkoutDayInput, WorkoutPlanInput};
use crate::errors::{AppError, AppResult};
use crate::utils::payload::{
    as_payload, lookup, read_bool, read_enum, read_non_negative_f64, read_non_negative_i32,
    read_ranged_i32, read_string, read_text,
};

/// Parse plan fields; every field is optional
///
/// # Errors
///
/// Returns a validation error for a malformed field
pub fn parse_plan(body: &Value) -> AppResult<WorkoutPlanInput> {
    let payload = as_payload(body)?;

    let name = match lookup(payload, &["name"]) {
        Some((key, value)) => read_string(value, key)?,
        None => None,
    };
    let description = match lookup(payload, &["description"]) {
        Some((key, value)) => read_text(value, key)?,
        None => None,
    };
    let difficulty = match lookup(payload, &["difficulty"]) {
        Some((key, value)) => read_enum(value, key)?,
        None => None,
    };
    let duration = match lookup(payload, &["duration"]) {
        Some((key, value)) => read_enum(value, key)?,
        None => None,
    };
    let specific_goal = match lookup(payload, &["specific_goal", "specificGoal"]) {
        Some((key, value)) => read_enum(value, key)?,
        None => None,
    };
    let target_gender = match lookup(payload, &["target_gender", "targetGender"]) {
        Some((key, value)) => read_enum(value, key)?,
        None => None,
    };
    let min_fitness_level = match lookup(payload, &["min_fitness_level", "minFitnessLevel"]) {
        Some((key, value)) => read_enum(value, key)?,
        None => None,
    };
    let is_public = match lookup(payload, &["is_public", "isPublic"]) {
        Some((key, value)) => read_bool(value, key)?,
        None => None,
    };

    Ok(WorkoutPlanInput {
        name,
        description,
        difficulty,
        duration,
        specific_goal,
        target_gender,
        min_fitness_level,
        is_public,
    })
}

/// Parse plan day fields; every field is optional
///
/// # Errors
///
/// Returns a validation error for a malformed field or a day number below 1
pub fn parse_day(body: &Value) -> AppResult<WorkoutDayInput> {
    let payload = as_payload(body)?;

    let name = match lookup(payload, &["name"]) {
        Some((key, value)) => read_string(value, key)?,
        None => None,
    };
    let day_number = match lookup(payload, &["day_number", "dayNumber"]) {
        Some((key, value)) => read_ranged_i32(value, key, 1, i32::MAX)?,
        None => None,
    };
    let is_rest_day = match lookup(payload, &["is_rest_day", "isRestDay"]) {
        Some((key, value)) => read_bool(value, key)?,
        None => None,
    };
    let focus_area = match lookup(payload, &["focus_area", "focusArea"]) {
        Some((key, value)) => read_string(value, key)?,
        None => None,
    };
    let notes = match lookup(payload, &["notes"]) {
        Some((key, value)) => read_text(value, key)?,
        None => None,
    };

    Ok(WorkoutDayInput {
        name,
        day_number,
        is_rest_day,
        focus_area,
        notes,
    })
}

/// Parse an exercise prescription; `exercise_id` must be a catalog id
///
/// # Errors
///
/// Returns `MISSING_REQUIRED_FIELD` without an exercise id, or a validation error
pub fn parse_plan_exercise(body: &Value) -> AppResult<PlanExerciseInput> {
    let payload = as_payload(body)?;

    let exercise_id = match lookup(payload, &["exercise_id", "exerciseId", "exercise"]) {
        Some((key, value)) => read_ranged_i32(value, key, 1, i32::MAX)?,
        None => None,
    }
    .ok_or_else(|| AppError::missing_field("exercise_id"))?;
    let sets = match lookup(payload, &["sets"]) {
        Some((key, value)) => read_ranged_i32(value, key, 1, i32::MAX)?,
        None => None,
    };
    let reps = match lookup(payload, &["reps"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    };
    let rest_time = match lookup(payload, &["rest_time", "restTime"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    };
    let weight = match lookup(payload, &["weight"]) {
        Some((key, value)) => read_non_negative_f64(value, key)?,
        None => None,
    };
    let duration = match lookup(payload, &["duration"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    };
    let position = match lookup(payload, &["order", "position"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    };
    let notes = match lookup(payload, &["notes"]) {
        Some((key, value)) => read_text(value, key)?,
        None => None,
    };

    Ok(PlanExerciseInput {
        exercise_id: i64::from(exercise_id),
        sets,
        reps,
        rest_time,
        weight,
        duration,
        position,
        notes,
    })
}
