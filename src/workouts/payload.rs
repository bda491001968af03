// ABOUTME: Parsing of workout save, exercise, and completed-workout payloads
// ABOUTME: Validates every set up front so a batch is accepted or rejected as a whole
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use serde_json::{json, Value};

use crate::constants::limits::{MAX_RATING, MIN_RATING};
use crate::database::{CompletedWorkoutInput, ExerciseInput, ExerciseSetInput, WorkoutSessionInput};
use crate::errors::{AppError, AppResult};
use crate::utils::payload::{
    as_payload, lookup, read_date, read_enum, read_non_negative_f64,
    read_non_negative_i32, read_ranged_i32, read_string, read_text, read_timestamp, Payload,
};

const SESSION_KEYS: &[&str] = &["session", "workout_session"];
const SETS_KEYS: &[&str] = &["sets", "exercise_sets"];
const EXERCISE_REF_KEYS: &[&str] = &["exercise_id", "exerciseId", "exercise"];

/// A parsed save-progress request
#[derive(Debug, Clone, Default)]
pub struct WorkoutSubmission {
    /// Session fields to create or merge
    pub session: WorkoutSessionInput,
    /// Sets in submission order
    pub sets: Vec<ExerciseSetInput>,
}

fn parse_session(payload: &Payload) -> AppResult<WorkoutSessionInput> {
    let id = match lookup(payload, &["id", "session_id"]) {
        Some((key, value)) => read_ranged_i32(value, key, 1, i32::MAX)?.map(i64::from),
        None => None,
    };
    let status = match lookup(payload, &["status"]) {
        Some((key, value)) => read_enum(value, key)?,
        None => None,
    };
    let started_at = match lookup(payload, &["started_at", "startedAt"]) {
        Some((key, value)) => read_timestamp(value, key)?,
        None => None,
    };
    let completed_at = match lookup(payload, &["completed_at", "completedAt"]) {
        Some((key, value)) => read_timestamp(value, key)?,
        None => None,
    };
    let duration = match lookup(payload, &["duration"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    };
    let total_exercises = match lookup(payload, &["total_exercises", "totalExercises"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    };
    let completed_exercises = match lookup(payload, &["completed_exercises", "completedExercises"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    };
    let notes = match lookup(payload, &["notes"]) {
        Some((key, value)) => read_text(value, key)?,
        None => None,
    };
    let rating = match lookup(payload, &["rating"]) {
        Some((key, value)) => read_ranged_i32(value, key, MIN_RATING, MAX_RATING)?,
        None => None,
    };

    Ok(WorkoutSessionInput {
        id,
        status,
        started_at,
        completed_at,
        duration,
        total_exercises,
        completed_exercises,
        notes,
        rating,
    })
}

/// Parse one set; `Ok(None)` when the exercise reference is absent or blank
fn parse_set(payload: &Payload) -> AppResult<Option<ExerciseSetInput>> {
    let exercise_ref = match lookup(payload, EXERCISE_REF_KEYS) {
        Some((key, value)) => read_string(value, key)?,
        None => None,
    };
    let Some(exercise_ref) = exercise_ref else {
        return Ok(None);
    };

    let set_number = match lookup(payload, &["set_number", "setNumber"]) {
        Some((key, value)) => read_ranged_i32(value, key, 1, i32::MAX)?,
        None => None,
    };
    let reps_completed = match lookup(payload, &["reps_completed", "repsCompleted", "reps"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    };
    let weight_used = match lookup(payload, &["weight_used", "weightUsed", "weight"]) {
        Some((key, value)) => read_non_negative_f64(value, key)?,
        None => None,
    };
    let duration = match lookup(payload, &["duration"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    };
    let rest_time = match lookup(payload, &["rest_time", "restTime"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    };
    let notes = match lookup(payload, &["notes"]) {
        Some((key, value)) => read_text(value, key)?,
        None => None,
    };
    let difficulty_rating = match lookup(payload, &["difficulty_rating", "difficultyRating"]) {
        Some((key, value)) => read_ranged_i32(value, key, MIN_RATING, MAX_RATING)?,
        None => None,
    };

    Ok(Some(ExerciseSetInput {
        exercise_ref,
        set_number,
        reps_completed,
        weight_used,
        duration,
        rest_time,
        notes,
        difficulty_rating,
    }))
}

/// Parse a save-progress body: `{"session": {...}, "sets": [...]}`
///
/// Both parts are optional; an absent session creates a new one. Every set
/// must carry an exercise reference; the indices of those that do not are
/// reported together in the error details.
///
/// # Errors
///
/// Returns a validation error for a malformed field, a non-object session or
/// set, or any set without an exercise reference
pub fn parse_submission(body: &Value) -> AppResult<WorkoutSubmission> {
    let payload = as_payload(body)?;

    let session = match lookup(payload, SESSION_KEYS) {
        Some((_, Value::Null)) | None => WorkoutSessionInput::default(),
        Some((key, value)) => parse_session(
            value
                .as_object()
                .ok_or_else(|| AppError::invalid_format(key, "Expected a JSON object"))?,
        )?,
    };

    let raw_sets: &[Value] = match lookup(payload, SETS_KEYS) {
        Some((_, Value::Null)) | None => &[],
        Some((key, value)) => value
            .as_array()
            .ok_or_else(|| AppError::invalid_format(key, "Expected a JSON array"))?,
    };

    let mut sets = Vec::with_capacity(raw_sets.len());
    let mut missing_refs = Vec::new();
    for (index, raw) in raw_sets.iter().enumerate() {
        let set_payload = raw.as_object().ok_or_else(|| {
            AppError::invalid_format("sets", "Every set must be a JSON object")
                .with_detail("set_index", index)
        })?;
        match parse_set(set_payload).map_err(|e| e.with_detail("set_index", index))? {
            Some(set) => sets.push(set),
            None => missing_refs.push(index),
        }
    }

    if !missing_refs.is_empty() {
        return Err(AppError::invalid_input(format!(
            "{} set(s) have no exercise_id",
            missing_refs.len()
        ))
        .with_details(json!({
            "field": "exercise_id",
            "set_indices": missing_refs,
        })));
    }

    Ok(WorkoutSubmission { session, sets })
}

/// Parse a new catalog exercise
///
/// # Errors
///
/// Returns `MISSING_REQUIRED_FIELD` without a name, or a validation error
pub fn parse_exercise(body: &Value) -> AppResult<ExerciseInput> {
    let payload = as_payload(body)?;

    let name = match lookup(payload, &["name"]) {
        Some((key, value)) => read_string(value, key)?,
        None => None,
    }
    .ok_or_else(|| AppError::missing_field("name"))?;
    let description = match lookup(payload, &["description"]) {
        Some((key, value)) => read_text(value, key)?,
        None => None,
    };
    let muscle_group = match lookup(payload, &["muscle_group", "muscleGroup"]) {
        Some((key, value)) => read_enum(value, key)?,
        None => None,
    };
    let equipment_needed = match lookup(payload, &["equipment_needed", "equipmentNeeded"]) {
        Some((key, value)) => read_string(value, key)?,
        None => None,
    };
    let difficulty_level = match lookup(payload, &["difficulty_level", "difficultyLevel"]) {
        Some((key, value)) => read_enum(value, key)?,
        None => None,
    };

    Ok(ExerciseInput {
        name,
        description: description.unwrap_or_default(),
        muscle_group: muscle_group.unwrap_or_default(),
        equipment_needed,
        difficulty_level: difficulty_level.unwrap_or_default(),
    })
}

/// Parse a completed-workout log entry; name, date and duration are required
///
/// # Errors
///
/// Returns `MISSING_REQUIRED_FIELD` or a field validation error
pub fn parse_completed_workout(body: &Value) -> AppResult<CompletedWorkoutInput> {
    let payload = as_payload(body)?;

    let workout_name = match lookup(payload, &["workout_name", "workoutName", "name"]) {
        Some((key, value)) => read_string(value, key)?,
        None => None,
    }
    .ok_or_else(|| AppError::missing_field("workout_name"))?;
    let workout_type = match lookup(payload, &["workout_type", "workoutType", "type"]) {
        Some((key, value)) => read_string(value, key)?,
        None => None,
    };
    let date = match lookup(payload, &["date"]) {
        Some((key, value)) => read_date(value, key)?,
        None => None,
    }
    .ok_or_else(|| AppError::missing_field("date"))?;
    let duration = match lookup(payload, &["duration"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    }
    .ok_or_else(|| AppError::missing_field("duration"))?;
    let calories_burned = match lookup(payload, &["calories_burned", "caloriesBurned"]) {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    };
    let exercises_completed = match lookup(payload, &["exercises_completed", "exercisesCompleted"])
    {
        Some((key, value)) => read_non_negative_i32(value, key)?,
        None => None,
    };
    let notes = match lookup(payload, &["notes"]) {
        Some((key, value)) => read_text(value, key)?,
        None => None,
    };
    let rating = match lookup(payload, &["rating"]) {
        Some((key, value)) => read_ranged_i32(value, key, MIN_RATING, MAX_RATING)?,
        None => None,
    };

    Ok(CompletedWorkoutInput {
        workout_name,
        workout_type,
        date,
        duration,
        calories_burned: calories_burned.unwrap_or(0),
        exercises_completed: exercises_completed.unwrap_or(0),
        notes,
        rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::models::{MuscleGroup, SessionStatus};

    #[test]
    fn test_submission_collects_every_missing_exercise_reference() {
        let body = json!({
            "sets": [
                { "exercise_id": "squat", "reps_completed": 5 },
                { "reps_completed": 8 },
                { "exercise_id": "  ", "reps_completed": 8 },
                { "exercise_id": 3 }
            ]
        });
        let err = parse_submission(&body).unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert_eq!(err.context.details["set_indices"], json!([1, 2]));
    }

    #[test]
    fn test_submission_defaults_and_numeric_exercise_ids() {
        let body = json!({
            "session": { "id": "12", "status": "completed", "duration": 45 },
            "sets": [{ "exercise_id": 7, "set_number": 2, "weight_used": "60.5" }]
        });
        let submission = parse_submission(&body).unwrap();

        assert_eq!(submission.session.id, Some(12));
        assert_eq!(submission.session.status, Some(SessionStatus::Completed));
        assert_eq!(submission.sets.len(), 1);
        assert_eq!(submission.sets[0].exercise_ref, "7");
        assert_eq!(submission.sets[0].set_number, Some(2));
        assert_eq!(submission.sets[0].weight_used, Some(60.5));

        let empty = parse_submission(&json!({})).unwrap();
        assert!(empty.session.id.is_none());
        assert!(empty.sets.is_empty());
    }

    #[test]
    fn test_set_field_errors_carry_the_set_index() {
        let body = json!({
            "sets": [
                { "exercise_id": "bench" },
                { "exercise_id": "bench", "difficulty_rating": 9 }
            ]
        });
        let err = parse_submission(&body).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.context.details["set_index"], 1);
    }

    #[test]
    fn test_exercise_defaults() {
        let exercise = parse_exercise(&json!({ "name": "Plank", "muscle_group": "core" })).unwrap();
        assert_eq!(exercise.muscle_group, MuscleGroup::Core);
        assert_eq!(exercise.description, "");

        let err = parse_exercise(&json!({ "muscle_group": "core" })).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
    }

    #[test]
    fn test_completed_workout_rating_bounds() {
        let base = json!({ "workout_name": "Leg day", "date": "2024-05-01", "duration": 50 });
        let parsed = parse_completed_workout(&base).unwrap();
        assert_eq!(parsed.calories_burned, 0);
        assert!(parsed.workout_type.is_none());

        let mut too_high = base;
        too_high["rating"] = json!(6);
        let err = parse_completed_workout(&too_high).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }
}
