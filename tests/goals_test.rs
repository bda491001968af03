// ABOUTME: Integration tests for goals, plan runs, and period analytics
// ABOUTME: Derived percentages and achievement flags are checked after each stored write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::NaiveDate;
use fittransform_server::errors::ErrorCode;
use fittransform_server::models::{AnalyticsPeriod, GoalStatus, PlanDuration};
use fittransform_server::pagination::PageRequest;
use serde_json::json;

#[tokio::test]
async fn test_goal_progress_is_recomputed_on_every_update() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "goals@example.com").await;

    let goal = resources
        .goals
        .create_goal(
            user.id,
            &json!({
                "title": "Cut to 80",
                "goal_type": "weight",
                "start_value": 90,
                "target_value": 80,
                "target_date": "2024-12-31"
            }),
        )
        .await
        .unwrap();
    assert_eq!(goal.current_value, Some(90.0));
    assert!(goal.progress_percentage.abs() < 1e-9);
    assert_eq!(goal.status, GoalStatus::Active);

    let halfway = resources
        .goals
        .update_goal(user.id, goal.id, &json!({ "current_value": 85 }))
        .await
        .unwrap();
    assert!((halfway.progress_percentage - 50.0).abs() < 1e-9);
    assert!(!halfway.is_achieved);

    let reached = resources
        .goals
        .update_goal(user.id, goal.id, &json!({ "current_value": 79.5 }))
        .await
        .unwrap();
    assert!((reached.progress_percentage - 100.0).abs() < 1e-9);
    assert_eq!(reached.status, GoalStatus::Completed);
    assert!(reached.is_achieved);
    let achieved_at = reached.achieved_at.unwrap();

    let slipped = resources
        .goals
        .update_goal(
            user.id,
            goal.id,
            &json!({ "current_value": 83, "status": "active", "progress_percentage": 100 }),
        )
        .await
        .unwrap();
    assert!((slipped.progress_percentage - 70.0).abs() < 1e-9);
    assert!(slipped.is_achieved);
    assert_eq!(slipped.achieved_at, Some(achieved_at));
}

#[tokio::test]
async fn test_goals_are_owner_scoped_and_filterable() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "owner@example.com").await;
    let (other, _) = common::create_test_user(&resources, "intruder@example.com").await;

    let squat = resources
        .goals
        .create_goal(
            user.id,
            &json!({
                "title": "Squat 140",
                "goalType": "strength",
                "targetValue": 140,
                "currentValue": 100,
                "targetDate": "2024-10-01"
            }),
        )
        .await
        .unwrap();
    resources
        .goals
        .create_goal(
            user.id,
            &json!({
                "title": "Run 10k",
                "goal_type": "endurance",
                "target_value": 10,
                "current_value": 10,
                "target_date": "2024-08-01"
            }),
        )
        .await
        .unwrap();

    let err = resources
        .goals
        .create_goal(user.id, &json!({ "title": "No date", "goal_type": "weight" }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);

    let completed = resources
        .goals
        .list_goals(user.id, Some("completed"), PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(completed.pagination.total_count, 1);
    assert_eq!(completed.items[0].title, "Run 10k");

    let all = resources
        .goals
        .list_goals(user.id, None, PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(all.pagination.total_count, 2);

    let err = resources
        .goals
        .list_goals(user.id, Some("paused"), PageRequest::new(1, 10))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidFormat);

    let err = resources.goals.get_goal(other.id, squat.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    let err = resources
        .goals
        .update_goal(other.id, squat.id, &json!({ "current_value": 140 }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    let err = resources.goals.delete_goal(other.id, squat.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    resources.goals.delete_goal(user.id, squat.id).await.unwrap();
    let err = resources.goals.get_goal(user.id, squat.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_plan_run_completes_after_last_logged_day() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "runner@example.com").await;
    let plan = resources
        .plans
        .create_plan(user.id, &json!({ "name": "Six month base", "duration": "6_month" }))
        .await
        .unwrap();

    let defaulted = resources
        .goals
        .start_plan(user.id, &json!({ "plan": plan.id, "start_date": "2024-01-01" }))
        .await
        .unwrap();
    assert_eq!(defaulted.plan_name, "Six month base");
    assert_eq!(defaulted.plan_duration, PlanDuration::SixMonth);
    assert_eq!(defaulted.total_days, 180);
    assert_eq!(defaulted.end_date, NaiveDate::from_ymd_opt(2024, 6, 28));

    let run = resources
        .goals
        .start_plan(
            user.id,
            &json!({ "plan_name": "Deload", "total_days": 3, "start_date": "2024-05-01" }),
        )
        .await
        .unwrap();
    assert!(run.is_active);
    assert!((run.completion_percentage - 33.33).abs() < 1e-9);

    let run = resources
        .goals
        .log_workout(user.id, run.id, &json!({ "duration": 40, "rating": 3 }))
        .await
        .unwrap();
    assert_eq!(run.current_day, 2);
    assert_eq!(run.average_workout_rating, Some(3.0));

    let run = resources
        .goals
        .log_workout(user.id, run.id, &json!({ "duration": 50, "rating": 4 }))
        .await
        .unwrap();
    assert_eq!(run.current_day, 3);
    assert!(run.is_completed);
    assert!(!run.is_active);
    assert!((run.completion_percentage - 100.0).abs() < 1e-9);
    assert_eq!(run.workouts_completed, 2);
    assert_eq!(run.total_workout_time, 90);
    assert_eq!(run.average_workout_rating, Some(3.5));

    let err = resources
        .goals
        .log_workout(user.id, run.id, &json!({ "duration": 20 }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = resources
        .goals
        .start_plan(user.id, &json!({ "start_date": "2024-05-01" }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);

    let runs = resources
        .goals
        .list_plan_progress(user.id, PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(runs.pagination.total_count, 2);
}

#[tokio::test]
async fn test_deleting_a_plan_keeps_runs_through_it() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "keeper@example.com").await;
    let plan = resources
        .plans
        .create_plan(user.id, &json!({ "name": "Gone soon" }))
        .await
        .unwrap();
    let run = resources
        .goals
        .start_plan(user.id, &json!({ "plan_id": plan.id }))
        .await
        .unwrap();
    assert_eq!(run.plan_id, Some(plan.id));
    assert_eq!(run.total_days, 30);

    resources.plans.delete_plan(user.id, plan.id).await.unwrap();

    let run = resources.goals.get_plan_progress(user.id, run.id).await.unwrap();
    assert!(run.plan_id.is_none());
    assert_eq!(run.plan_name, "Gone soon");
}

#[tokio::test]
async fn test_analytics_window_summarises_entries_and_workouts() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "analytics@example.com").await;

    for (date, weight, body_fat) in [
        ("2024-04-20", 85.0, 24.0),
        ("2024-05-02", 84.0, 23.5),
        ("2024-05-20", 82.5, 22.0),
        ("2024-06-05", 81.0, 21.0),
    ] {
        resources
            .progress
            .save_entry(
                user.id,
                &json!({ "date": date, "weight": weight, "body_fat": body_fat }),
            )
            .await
            .unwrap();
    }
    for (date, duration, rating) in [
        ("2024-05-03", 30, Some(4)),
        ("2024-05-03", 20, None),
        ("2024-05-10", 40, Some(5)),
        ("2024-06-10", 60, Some(1)),
    ] {
        let mut body = json!({ "workout_name": "Session", "date": date, "duration": duration });
        if let Some(rating) = rating {
            body["rating"] = json!(rating);
        }
        resources
            .workouts
            .log_completed_workout(user.id, &body)
            .await
            .unwrap();
    }

    let analytics = resources
        .progress
        .get_analytics(user.id, Some("month"), Some("2024-05-30"))
        .await
        .unwrap();
    assert_eq!(analytics.period, AnalyticsPeriod::Month);
    assert_eq!(analytics.start_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    assert_eq!(analytics.starting_weight, Some(84.0));
    assert_eq!(analytics.ending_weight, Some(82.5));
    assert_eq!(analytics.weight_change, Some(-1.5));
    assert_eq!(analytics.body_fat_change, Some(-1.5));
    assert_eq!(analytics.total_workouts, 3);
    assert_eq!(analytics.total_workout_time, 90);
    assert_eq!(analytics.average_workout_rating, Some(4.5));
    assert_eq!(analytics.days_worked_out, 2);
    assert!((analytics.workout_consistency - 6.67).abs() < 1e-9);

    let err = resources
        .progress
        .get_analytics(user.id, Some("fortnight"), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidFormat);

    let empty = resources
        .progress
        .get_analytics(user.id, Some("week"), Some("2023-01-07"))
        .await
        .unwrap();
    assert_eq!(empty.total_workouts, 0);
    assert!(empty.weight_change.is_none());
}
