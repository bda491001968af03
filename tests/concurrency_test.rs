// ABOUTME: Concurrency tests for transactional writes against a file database
// ABOUTME: Parallel onboarding, progress, and workout saves for one user must all succeed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use fittransform_server::errors::AppError;
use fittransform_server::pagination::PageRequest;
use serde_json::json;
use tokio::task::JoinSet;

const WRITERS: usize = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_step_and_entry_saves_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let resources = common::create_file_test_resources(&dir.path().join("parallel.db")).await;
    let (user, _) = common::create_test_user(&resources, "parallel@example.com").await;

    let mut tasks = JoinSet::new();
    for n in 0..WRITERS {
        let resources = Arc::clone(&resources);
        tasks.spawn(async move {
            resources
                .onboarding
                .apply_step(
                    user.id,
                    "body_composition",
                    &json!({ "bodyFat": 20 + n, "muscleMass": 60 }),
                )
                .await?;
            resources
                .progress
                .save_entry(user.id, &json!({ "date": "2024-05-01", "weight": 80 + n }))
                .await?;
            Ok::<_, AppError>(())
        });
    }

    let mut failures = Vec::new();
    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result.unwrap() {
            failures.push(e.to_string());
        }
    }
    assert!(failures.is_empty(), "failed writes: {failures:?}");

    let history = resources
        .progress
        .get_history(user.id, PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(history.pagination.total_count, 1);

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM body_compositions WHERE user_id = $1")
            .bind(user.id.to_string())
            .fetch_one(resources.database.pool())
            .await
            .unwrap();
    assert_eq!(rows, 1);
    let composition = resources
        .database
        .body()
        .get_body_composition(user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(composition.muscle_mass, Some(60.0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_workout_saves_share_auto_created_exercise() {
    let dir = tempfile::tempdir().unwrap();
    let resources = common::create_file_test_resources(&dir.path().join("workouts.db")).await;
    let (user, _) = common::create_test_user(&resources, "crowd@example.com").await;

    let mut tasks = JoinSet::new();
    for n in 0..WRITERS {
        let resources = Arc::clone(&resources);
        tasks.spawn(async move {
            resources
                .workouts
                .save_progress(
                    user.id,
                    &json!({
                        "session": { "status": "completed", "duration": 30 },
                        "sets": [{ "exercise_id": "sled push", "set_number": 1, "reps_completed": n }]
                    }),
                )
                .await
        });
    }

    let mut created = 0;
    while let Some(result) = tasks.join_next().await {
        created += result.unwrap().unwrap().exercises_created;
    }
    assert_eq!(created, 1);

    let stats = resources.workouts.get_stats(user.id).await.unwrap();
    assert_eq!(stats.totals.total_sessions, WRITERS as u64);
    assert_eq!(resources.workouts.list_exercises(None).await.unwrap().len(), 1);
}
