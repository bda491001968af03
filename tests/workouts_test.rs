// ABOUTME: Integration tests for workout session saves, stats, history, and the exercise catalog
// ABOUTME: Runs the workout aggregator against an in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use fittransform_server::errors::ErrorCode;
use fittransform_server::models::{MuscleGroup, SessionStatus};
use fittransform_server::pagination::PageRequest;
use serde_json::json;

#[tokio::test]
async fn test_duplicate_set_key_keeps_later_reps() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "sets@example.com").await;
    let exercise = resources
        .workouts
        .create_exercise(&json!({ "name": "Bench Press", "muscle_group": "chest" }))
        .await
        .unwrap();

    let saved = resources
        .workouts
        .save_progress(
            user.id,
            &json!({
                "session": { "status": "in_progress", "total_exercises": 1 },
                "sets": [
                    { "exercise_id": exercise.id, "set_number": 1, "reps_completed": 8 },
                    { "exercise_id": exercise.id.to_string(), "set_number": 1, "reps_completed": 10 }
                ]
            }),
        )
        .await
        .unwrap();
    assert_eq!(saved.sets_saved, 1);
    assert_eq!(saved.exercises_created, 0);

    let session = resources
        .workouts
        .get_session(user.id, saved.session_id)
        .await
        .unwrap();
    assert_eq!(session.sets.len(), 1);
    assert_eq!(session.sets[0].reps_completed, 10);
    assert_eq!(session.sets[0].exercise_name, "Bench Press");
    assert_eq!(session.session.status, SessionStatus::InProgress);
}

#[tokio::test]
async fn test_unknown_exercise_reference_is_created_once() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "auto@example.com").await;

    let saved = resources
        .workouts
        .save_progress(
            user.id,
            &json!({
                "sets": [
                    { "exercise_id": "zercher-squat", "set_number": 1, "reps_completed": 5 },
                    { "exercise_id": "zercher-squat", "set_number": 2, "reps_completed": 5 }
                ]
            }),
        )
        .await
        .unwrap();
    assert_eq!(saved.exercises_created, 1);
    assert_eq!(saved.sets_saved, 2);

    let catalog = resources
        .workouts
        .list_exercises(Some("other"))
        .await
        .unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(catalog[0].name.contains("zercher-squat"));
    assert_eq!(catalog[0].muscle_group, MuscleGroup::Other);
}

#[tokio::test]
async fn test_set_without_exercise_rejects_whole_batch() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "batch@example.com").await;

    let err = resources
        .workouts
        .save_progress(
            user.id,
            &json!({
                "session": { "status": "completed", "duration": 40 },
                "sets": [
                    { "exercise_id": "row", "reps_completed": 12 },
                    { "reps_completed": 12 },
                    { "exercise_id": "", "reps_completed": 12 }
                ]
            }),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(err.context.details["set_indices"], json!([1, 2]));

    let history = resources
        .workouts
        .get_history(user.id, PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(history.pagination.total_count, 0);
    assert!(resources.workouts.list_exercises(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_completed_above_total_is_rejected() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "counts@example.com").await;

    let err = resources
        .workouts
        .save_progress(
            user.id,
            &json!({ "session": { "total_exercises": 2, "completed_exercises": 3 } }),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    assert_eq!(err.context.details["field"], "completed_exercises");
}

#[tokio::test]
async fn test_resubmitting_session_merges_fields() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "merge@example.com").await;

    let first = resources
        .workouts
        .save_progress(user.id, &json!({ "session": { "status": "in_progress", "notes": "legs" } }))
        .await
        .unwrap();
    let second = resources
        .workouts
        .save_progress(
            user.id,
            &json!({ "session": { "id": first.session_id, "status": "completed", "duration": 55 } }),
        )
        .await
        .unwrap();
    assert_eq!(second.session_id, first.session_id);

    let session = resources
        .workouts
        .get_session(user.id, first.session_id)
        .await
        .unwrap()
        .session;
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.duration, Some(55));
    assert_eq!(session.notes.as_deref(), Some("legs"));
}

#[tokio::test]
async fn test_foreign_session_id_is_not_found() {
    let resources = common::create_test_resources().await;
    let (owner, _) = common::create_test_user(&resources, "mine@example.com").await;
    let (intruder, _) = common::create_test_user(&resources, "theirs@example.com").await;

    let saved = resources
        .workouts
        .save_progress(owner.id, &json!({ "session": { "notes": "private" } }))
        .await
        .unwrap();

    let err = resources
        .workouts
        .save_progress(
            intruder.id,
            &json!({ "session": { "id": saved.session_id, "notes": "overwritten" } }),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    let session = resources
        .workouts
        .get_session(owner.id, saved.session_id)
        .await
        .unwrap()
        .session;
    assert_eq!(session.notes.as_deref(), Some("private"));

    let err = resources
        .workouts
        .get_session(intruder.id, saved.session_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_stats_without_sessions() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "idle@example.com").await;

    let stats = resources.workouts.get_stats(user.id).await.unwrap();
    assert_eq!(stats.totals.total_sessions, 0);
    assert!(stats.totals.completion_rate.abs() < f64::EPSILON);
    assert!(stats.recent_sessions.is_empty());
    assert!(stats.workout_type_distribution.is_empty());
}

#[tokio::test]
async fn test_stats_totals_and_type_distribution() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "busy@example.com").await;

    for (status, duration) in [("completed", 30), ("completed", 45), ("cancelled", 0)] {
        resources
            .workouts
            .save_progress(
                user.id,
                &json!({ "session": { "status": status, "duration": duration } }),
            )
            .await
            .unwrap();
    }
    for workout_type in [json!("strength"), json!("strength"), json!(null)] {
        resources
            .workouts
            .log_completed_workout(
                user.id,
                &json!({
                    "workout_name": "Session",
                    "workout_type": workout_type,
                    "date": "2024-04-01",
                    "duration": 30
                }),
            )
            .await
            .unwrap();
    }

    let stats = resources.workouts.get_stats(user.id).await.unwrap();
    assert_eq!(stats.totals.total_sessions, 3);
    assert_eq!(stats.totals.completed_sessions, 2);
    assert_eq!(stats.totals.total_duration, 75);
    assert!((stats.totals.completion_rate - 66.67).abs() < 1e-9);
    assert_eq!(stats.recent_sessions.len(), 3);
    assert_eq!(stats.workout_type_distribution.get("strength"), Some(&2));
    assert_eq!(stats.workout_type_distribution.get("other"), Some(&1));
}

#[tokio::test]
async fn test_completed_workout_rating_is_bounded() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "rating@example.com").await;

    let err = resources
        .workouts
        .log_completed_workout(
            user.id,
            &json!({ "workout_name": "Run", "date": "2024-04-02", "duration": 20, "rating": 6 }),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);

    let logged = resources
        .workouts
        .log_completed_workout(
            user.id,
            &json!({ "workout_name": "Run", "date": "2024-04-02", "duration": 20, "rating": 5 }),
        )
        .await
        .unwrap();
    assert_eq!(logged.calories_burned, 0);

    let page = resources
        .workouts
        .list_completed_workouts(user.id, PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, logged.id);
}

#[tokio::test]
async fn test_unknown_muscle_group_filter_is_rejected() {
    let resources = common::create_test_resources().await;

    let err = resources
        .workouts
        .list_exercises(Some("wings"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidFormat);
    assert_eq!(err.context.details["field"], "muscle_group");
}

#[tokio::test]
async fn test_whole_float_exercise_id_resolves_existing_exercise() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "float@example.com").await;
    let exercise = resources
        .workouts
        .create_exercise(&json!({ "name": "Deadlift", "muscle_group": "back" }))
        .await
        .unwrap();

    let float_id = exercise.id as f64;
    let saved = resources
        .workouts
        .save_progress(
            user.id,
            &json!({ "sets": [{ "exercise_id": float_id, "set_number": 1, "reps_completed": 3 }] }),
        )
        .await
        .unwrap();
    assert_eq!(saved.exercises_created, 0);

    let session = resources
        .workouts
        .get_session(user.id, saved.session_id)
        .await
        .unwrap();
    assert_eq!(session.sets[0].exercise_id, exercise.id);
    assert_eq!(resources.workouts.list_exercises(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_pages_newest_first() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "pages@example.com").await;

    let mut saved_ids = Vec::new();
    for n in 1..=25 {
        let saved = resources
            .workouts
            .save_progress(user.id, &json!({ "session": { "notes": format!("session {n}") } }))
            .await
            .unwrap();
        saved_ids.push(saved.session_id);
    }
    saved_ids.reverse();

    let second = resources
        .workouts
        .get_history(user.id, PageRequest::new(2, 10))
        .await
        .unwrap();
    assert_eq!(second.items.len(), 10);
    assert_eq!(second.pagination.total_count, 25);
    assert!(second.pagination.has_next);
    let ids: Vec<i64> = second.items.iter().map(|s| s.id).collect();
    assert_eq!(ids, saved_ids[10..20]);
    assert_eq!(second.items[0].notes.as_deref(), Some("session 15"));
    assert!(second
        .items
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    let third = resources
        .workouts
        .get_history(user.id, PageRequest::new(3, 10))
        .await
        .unwrap();
    assert_eq!(third.items.len(), 5);
    assert!(!third.pagination.has_next);
    assert_eq!(third.items[4].id, saved_ids[24]);
}
