// ABOUTME: Workout domain models: exercises, sessions, exercise sets, and completed workouts
// ABOUTME: Session status and muscle group enumerations with database string mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::FitnessLevel;
use crate::errors::AppError;

// ============================================================================
// Enums
// ============================================================================

/// Lifecycle of a workout session
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Created but not begun
    #[default]
    NotStarted,
    /// Currently running
    InProgress,
    /// Finished; counted by completion stats
    Completed,
    /// Temporarily stopped
    Paused,
    /// Abandoned
    Cancelled,
}

impl SessionStatus {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the session counts towards completion stats
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "paused" => Ok(Self::Paused),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(AppError::invalid_input(format!(
                "Invalid session status: {s}"
            ))),
        }
    }
}

/// Primary muscle group trained by an exercise
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    /// Chest
    Chest,
    /// Back
    Back,
    /// Shoulders
    Shoulders,
    /// Arms
    Arms,
    /// Legs
    Legs,
    /// Core
    Core,
    /// Cardio
    Cardio,
    /// Full body
    FullBody,
    /// Unclassified, used for auto-provisioned exercises
    #[default]
    Other,
}

impl MuscleGroup {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Shoulders => "shoulders",
            Self::Arms => "arms",
            Self::Legs => "legs",
            Self::Core => "core",
            Self::Cardio => "cardio",
            Self::FullBody => "full_body",
            Self::Other => "other",
        }
    }
}

impl Display for MuscleGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for MuscleGroup {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chest" => Ok(Self::Chest),
            "back" => Ok(Self::Back),
            "shoulders" => Ok(Self::Shoulders),
            "arms" => Ok(Self::Arms),
            "legs" => Ok(Self::Legs),
            "core" => Ok(Self::Core),
            "cardio" => Ok(Self::Cardio),
            "full_body" => Ok(Self::FullBody),
            "other" => Ok(Self::Other),
            _ => Err(AppError::invalid_input(format!("Invalid muscle group: {s}"))),
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Exercise reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Row identifier
    pub id: i64,
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
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

/// One workout attempt by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Row identifier
    pub id: i64,
    /// Owner
    pub user_id: Uuid,
    /// Lifecycle state
    pub status: SessionStatus,
    /// When the session began
    pub started_at: Option<DateTime<Utc>>,
    /// When the session finished
    pub completed_at: Option<DateTime<Utc>>,
    /// Duration in minutes
    pub duration: Option<i32>,
    /// Exercises planned
    pub total_exercises: i32,
    /// Exercises finished, expected not to exceed `total_exercises`
    pub completed_exercises: i32,
    /// Free-text notes
    pub notes: Option<String>,
    /// Self-assessed rating
    pub rating: Option<i32>,
    /// Row creation time, used for recency ordering
    pub created_at: DateTime<Utc>,
    /// Last upsert time
    pub updated_at: DateTime<Utc>,
}

/// One set of an exercise inside a session, keyed by (session, exercise, `set_number`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    /// Row identifier
    pub id: i64,
    /// Parent session
    pub session_id: i64,
    /// Exercise performed
    pub exercise_id: i64,
    /// Exercise name, joined for display
    pub exercise_name: String,
    /// 1-based position within the exercise
    pub set_number: i32,
    /// Repetitions completed
    pub reps_completed: i32,
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
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

/// Append-only log entry for a finished workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedWorkout {
    /// Row identifier
    pub id: i64,
    /// Owner
    pub user_id: Uuid,
    /// Workout name
    pub workout_name: String,
    /// Workout category such as strength or cardio
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
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_strings() {
        for status in [
            SessionStatus::NotStarted,
            SessionStatus::InProgress,
            SessionStatus::Completed,
            SessionStatus::Paused,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<SessionStatus>().unwrap(), status);
        }
        assert!("done".parse::<SessionStatus>().is_err());
        assert!(SessionStatus::Completed.is_completed());
    }

    #[test]
    fn test_muscle_group_default_is_other() {
        assert_eq!(MuscleGroup::default().as_str(), "other");
        assert_eq!(
            "Full_Body".parse::<MuscleGroup>().unwrap(),
            MuscleGroup::FullBody
        );
    }
}
