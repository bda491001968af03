// ABOUTME: Core data models for users, body state, progress, goals, plans, and workouts
// ABOUTME: Re-exports every entity so callers import from models directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

/// One-to-one body-state entities
pub mod body;
/// Goals and plan-progress tracking
pub mod goal;
/// Typed partial updates for the merge engine
pub mod patch;
/// Workout plans, their days, and prescribed exercises
pub mod plan;
/// Dated progress snapshots
pub mod progress;
/// User account and profile enumerations
pub mod user;
/// Exercises, sessions, sets, and completed workouts
pub mod workout;

pub use body::{BodyComposition, BodyMeasurements, GoalMeasurements, MeasurementField, Measurements};
pub use goal::{Goal, GoalStatus, GoalType, PlanProgress};
pub use patch::{BodyCompositionPatch, GoalMeasurementsPatch, ProfilePatch};
pub use plan::{PlanDuration, PlanExercise, WorkoutDay, WorkoutPlan};
pub use progress::{AnalyticsPeriod, ProgressEntry};
pub use user::{FitnessGoal, FitnessLevel, Gender, SpecificGoal, User};
pub use workout::{
    CompletedWorkout, Exercise, ExerciseSet, MuscleGroup, SessionStatus, WorkoutSession,
};
