// ABOUTME: Workout rollups: session totals, completion rate, and workout type distribution
// ABOUTME: Pure functions over rows already loaded by the workout manager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{ExerciseSet, SessionStatus, WorkoutSession};

/// Label for completed workouts logged without a type
pub const UNTYPED_WORKOUT: &str = "other";

/// A session together with its recorded sets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionWithSets {
    /// Session row
    #[serde(flatten)]
    pub session: WorkoutSession,
    /// Sets ordered by exercise and set number
    pub sets: Vec<ExerciseSet>,
}

/// Session counts and completion
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkoutTotals {
    /// All sessions
    pub total_sessions: u64,
    /// Sessions with status `completed`
    pub completed_sessions: u64,
    /// Minutes across completed sessions; missing durations count as zero
    pub total_duration: i64,
    /// Completed over total as a percentage, zero without sessions
    pub completion_rate: f64,
}

/// Workout stats response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutStats {
    /// Counts and completion
    #[serde(flatten)]
    pub totals: WorkoutTotals,
    /// Most recently created sessions with their sets
    pub recent_sessions: Vec<SessionWithSets>,
    /// Logged completed workouts per type
    pub workout_type_distribution: BTreeMap<String, u64>,
}

/// Totals over every session's status and duration
#[must_use]
pub fn compute_totals(sessions: &[(SessionStatus, Option<i32>)]) -> WorkoutTotals {
    let total_sessions = sessions.len() as u64;
    let (completed_sessions, total_duration) = sessions
        .iter()
        .filter(|(status, _)| status.is_completed())
        .fold((0_u64, 0_i64), |(count, minutes), (_, duration)| {
            (count + 1, minutes + i64::from(duration.unwrap_or(0)))
        });

    let completion_rate = if total_sessions == 0 {
        0.0
    } else {
        let rate = completed_sessions as f64 / total_sessions as f64 * 100.0;
        (rate * 100.0).round() / 100.0
    };

    WorkoutTotals {
        total_sessions,
        completed_sessions,
        total_duration,
        completion_rate,
    }
}

/// Count workouts per type, folding blank types into [`UNTYPED_WORKOUT`]
#[must_use]
pub fn type_distribution(types: &[Option<String>]) -> BTreeMap<String, u64> {
    let mut distribution = BTreeMap::new();
    for workout_type in types {
        let label = workout_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTYPED_WORKOUT);
        *distribution.entry(label.to_owned()).or_insert(0) += 1;
    }
    distribution
}
