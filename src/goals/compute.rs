// ABOUTME: Pure derivations for goal progress and plan-run completion
// ABOUTME: Percentages clamp to 0..=100 with two decimals; achievement is sticky
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use chrono::{DateTime, Duration, Utc};

use crate::database::{GoalValues, PlanProgressValues};
use crate::models::GoalStatus;

const FULL: f64 = 100.0;

fn clamp_percentage(value: f64) -> f64 {
    (value.clamp(0.0, FULL) * 100.0).round() / 100.0
}

/// Progress towards a target, measured from `start` when known, otherwise from zero
///
/// A target below its start (weight loss) counts downward. Missing current or
/// target values mean no progress.
#[must_use]
pub fn goal_progress_percentage(start: Option<f64>, current: Option<f64>, target: Option<f64>) -> f64 {
    let (Some(current), Some(target)) = (current, target) else {
        return 0.0;
    };
    let start = start.unwrap_or(0.0);
    let span = target - start;
    if span.abs() < f64::EPSILON {
        return if (current - target).abs() < f64::EPSILON { FULL } else { 0.0 };
    }
    clamp_percentage((current - start) / span * FULL)
}

/// Recompute derived goal fields in place
///
/// An active goal at 100% becomes completed; an explicitly completed goal is
/// achieved regardless of its values. `is_achieved` is never cleared and
/// `achieved_at` keeps the first achievement time.
pub fn evaluate_goal(values: &mut GoalValues, now: DateTime<Utc>) {
    values.progress_percentage =
        goal_progress_percentage(values.start_value, values.current_value, values.target_value);

    if values.status == GoalStatus::Active && values.progress_percentage >= FULL {
        values.status = GoalStatus::Completed;
    }
    if values.status == GoalStatus::Completed {
        values.is_achieved = true;
    }
    if values.is_achieved && values.achieved_at.is_none() {
        values.achieved_at = Some(now);
    }
}

/// Share of the run's days reached
#[must_use]
pub fn plan_completion_percentage(current_day: i32, total_days: i32) -> f64 {
    if total_days <= 0 {
        return 0.0;
    }
    clamp_percentage(f64::from(current_day.min(total_days)) / f64::from(total_days) * FULL)
}

/// Recompute derived plan-run fields in place
///
/// Reaching the last day completes the run and stops it being active. The
/// end date defaults to the last scheduled day.
pub fn evaluate_plan_progress(values: &mut PlanProgressValues) {
    values.current_day = values.current_day.clamp(1, values.total_days.max(1));
    values.completion_percentage = plan_completion_percentage(values.current_day, values.total_days);
    if values.current_day >= values.total_days {
        values.is_completed = true;
        values.is_active = false;
    }
    if values.end_date.is_none() {
        values.end_date = Some(values.start_date + Duration::days(i64::from(values.total_days - 1)));
    }
}

/// Fold one logged workout into a run's counters
///
/// The rating mean is maintained over `rated_workouts` so unrated workouts do
/// not dilute it. The run advances by one day.
pub fn record_workout(values: &mut PlanProgressValues, minutes: i32, rating: Option<i32>) {
    values.workouts_completed += 1;
    values.total_workout_time += minutes;
    if let Some(rating) = rating {
        let previous = values.average_workout_rating.unwrap_or(0.0) * f64::from(values.rated_workouts);
        values.rated_workouts += 1;
        let mean = (previous + f64::from(rating)) / f64::from(values.rated_workouts);
        values.average_workout_rating = Some((mean * 100.0).round() / 100.0);
    }
    values.current_day += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalType, PlanDuration};
    use chrono::NaiveDate;

    fn goal(start: Option<f64>, current: Option<f64>, target: f64) -> GoalValues {
        GoalValues {
            title: "Cut".to_owned(),
            description: String::new(),
            goal_type: GoalType::Weight,
            start_value: start,
            target_value: Some(target),
            current_value: current,
            target_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            progress_percentage: 0.0,
            status: GoalStatus::Active,
            is_achieved: false,
            achieved_at: None,
        }
    }

    fn run(total_days: i32) -> PlanProgressValues {
        PlanProgressValues {
            plan_id: Some(1),
            plan_name: "Starter".to_owned(),
            plan_duration: PlanDuration::OneMonth,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: None,
            current_day: 1,
            total_days,
            completion_percentage: 0.0,
            workouts_completed: 0,
            total_workout_time: 0,
            average_workout_rating: None,
            rated_workouts: 0,
            is_active: true,
            is_completed: false,
        }
    }

    #[test]
    fn test_progress_counts_downward_targets() {
        assert!((goal_progress_percentage(Some(90.0), Some(85.0), Some(80.0)) - 50.0).abs() < 1e-9);
        assert!(goal_progress_percentage(Some(90.0), Some(95.0), Some(80.0)).abs() < 1e-9);
        assert!((goal_progress_percentage(None, Some(50.0), Some(150.0)) - 33.33).abs() < 1e-9);
        assert!((goal_progress_percentage(None, Some(200.0), Some(150.0)) - 100.0).abs() < 1e-9);
        assert!(goal_progress_percentage(None, None, Some(150.0)).abs() < 1e-9);
        assert!((goal_progress_percentage(Some(5.0), Some(5.0), Some(5.0)) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_goal_achievement_is_sticky() {
        let first = Utc::now();
        let mut values = goal(Some(90.0), Some(80.0), 80.0);
        evaluate_goal(&mut values, first);
        assert_eq!(values.status, GoalStatus::Completed);
        assert!(values.is_achieved);
        assert_eq!(values.achieved_at, Some(first));

        values.current_value = Some(84.0);
        values.status = GoalStatus::Active;
        evaluate_goal(&mut values, first + Duration::days(3));
        assert!((values.progress_percentage - 60.0).abs() < 1e-9);
        assert_eq!(values.status, GoalStatus::Active);
        assert!(values.is_achieved);
        assert_eq!(values.achieved_at, Some(first));
    }

    #[test]
    fn test_cancelled_goal_is_never_completed_by_progress() {
        let mut values = goal(None, Some(100.0), 100.0);
        values.status = GoalStatus::Cancelled;
        evaluate_goal(&mut values, Utc::now());
        assert_eq!(values.status, GoalStatus::Cancelled);
        assert!(!values.is_achieved);
        assert!(values.achieved_at.is_none());
    }

    #[test]
    fn test_run_completes_on_last_day() {
        let mut values = run(4);
        evaluate_plan_progress(&mut values);
        assert!((values.completion_percentage - 25.0).abs() < 1e-9);
        assert_eq!(values.end_date, NaiveDate::from_ymd_opt(2024, 5, 4));
        assert!(values.is_active);

        for minutes in [30, 45, 60] {
            record_workout(&mut values, minutes, None);
        }
        evaluate_plan_progress(&mut values);
        assert_eq!(values.current_day, 4);
        assert!((values.completion_percentage - 100.0).abs() < 1e-9);
        assert!(values.is_completed);
        assert!(!values.is_active);
        assert_eq!(values.total_workout_time, 135);
    }

    #[test]
    fn test_rating_mean_ignores_unrated_workouts() {
        let mut values = run(30);
        record_workout(&mut values, 40, Some(4));
        record_workout(&mut values, 40, None);
        record_workout(&mut values, 40, Some(5));
        assert_eq!(values.workouts_completed, 3);
        assert_eq!(values.rated_workouts, 2);
        assert_eq!(values.average_workout_rating, Some(4.5));
    }
}
