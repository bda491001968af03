// ABOUTME: Period analytics over snapshots and completed workouts in a trailing date window
// ABOUTME: Pure computation; weight and body-fat change plus workout consistency
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{AnalyticsPeriod, CompletedWorkout, ProgressEntry};

/// Summary of one analytics window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressAnalytics {
    /// Window length
    pub period: AnalyticsPeriod,
    /// First day of the window
    pub start_date: NaiveDate,
    /// Last day of the window
    pub end_date: NaiveDate,
    /// Earliest weight in the window
    pub starting_weight: Option<f64>,
    /// Latest weight in the window
    pub ending_weight: Option<f64>,
    /// Ending minus starting weight
    pub weight_change: Option<f64>,
    /// Earliest body fat in the window
    pub starting_body_fat: Option<f64>,
    /// Latest body fat in the window
    pub ending_body_fat: Option<f64>,
    /// Ending minus starting body fat
    pub body_fat_change: Option<f64>,
    /// Completed workouts in the window
    pub total_workouts: usize,
    /// Minutes trained
    pub total_workout_time: i64,
    /// Mean minutes per workout
    pub average_workout_duration: Option<f64>,
    /// Mean rating over rated workouts
    pub average_workout_rating: Option<f64>,
    /// Distinct days with at least one workout
    pub days_worked_out: usize,
    /// Days in the window
    pub total_days: u32,
    /// `days_worked_out` over `total_days`, as a percentage
    pub workout_consistency: f64,
}

/// Inclusive window of `period` days ending on `end`
#[must_use]
pub fn analytics_window(period: AnalyticsPeriod, end: NaiveDate) -> (NaiveDate, NaiveDate) {
    (end - Duration::days(i64::from(period.days()) - 1), end)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn first_and_last(values: impl Iterator<Item = Option<f64>>) -> (Option<f64>, Option<f64>) {
    let present: Vec<f64> = values.flatten().collect();
    (present.first().copied(), present.last().copied())
}

fn change(start: Option<f64>, end: Option<f64>) -> Option<f64> {
    Some(round2(end? - start?))
}

/// Summarise a window
///
/// `entries` and `workouts` must already be limited to the window and ordered
/// oldest first.
#[must_use]
pub fn compute_analytics(
    period: AnalyticsPeriod,
    end: NaiveDate,
    entries: &[ProgressEntry],
    workouts: &[CompletedWorkout],
) -> ProgressAnalytics {
    let (start_date, end_date) = analytics_window(period, end);

    let (starting_weight, ending_weight) = first_and_last(entries.iter().map(|e| e.weight));
    let (starting_body_fat, ending_body_fat) = first_and_last(entries.iter().map(|e| e.body_fat));

    let total_workout_time: i64 = workouts.iter().map(|w| i64::from(w.duration)).sum();
    let average_workout_duration =
        (!workouts.is_empty()).then(|| round2(total_workout_time as f64 / workouts.len() as f64));
    let ratings: Vec<i32> = workouts.iter().filter_map(|w| w.rating).collect();
    let average_workout_rating = (!ratings.is_empty()).then(|| {
        round2(f64::from(ratings.iter().sum::<i32>()) / ratings.len() as f64)
    });

    let days_worked_out = workouts.iter().map(|w| w.date).collect::<BTreeSet<_>>().len();
    let total_days = period.days();

    ProgressAnalytics {
        period,
        start_date,
        end_date,
        starting_weight,
        ending_weight,
        weight_change: change(starting_weight, ending_weight),
        starting_body_fat,
        ending_body_fat,
        body_fat_change: change(starting_body_fat, ending_body_fat),
        total_workouts: workouts.len(),
        total_workout_time,
        average_workout_duration,
        average_workout_rating,
        days_worked_out,
        total_days,
        workout_consistency: round2(days_worked_out as f64 / f64::from(total_days) * 100.0),
    }
}
