// ABOUTME: HTTP tests driving the full router with every middleware layer
// ABOUTME: Covers status codes, the error envelope, bearer enforcement, and pagination parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::Router;
use fittransform_server::resources::ServerResources;
use fittransform_server::server::build_router;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

async fn setup() -> (Arc<ServerResources>, Router) {
    let resources = common::create_test_resources().await;
    let router = build_router(&resources);
    (resources, router)
}

#[tokio::test]
async fn test_health_is_public_and_tagged_with_request_id() {
    let (_, router) = setup().await;

    let response = AxumTestRequest::get("/health").send(router).await;
    assert_eq!(response.status(), 200);
    assert!(response.request_id().is_some());
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_and_onboard_over_http() {
    let (_, router) = setup().await;

    let response = AxumTestRequest::post("/api/auth/register")
        .json(&json!({
            "email": "http@example.com",
            "username": "http",
            "password": common::TEST_PASSWORD,
            "confirm_password": common::TEST_PASSWORD
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    assert_eq!(body["message"], "User registered successfully");
    let access = body["tokens"]["access"].as_str().unwrap().to_owned();

    let response = AxumTestRequest::post("/api/auth/onboarding/step")
        .bearer(&access)
        .json(&json!({ "step": "goals", "data": { "fitnessGoal": "maintain", "mood": "great" } }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "goals step completed successfully");
    assert_eq!(body["user"]["fitnessGoal"], "maintain");
    assert_eq!(body["ignored_fields"], json!(["mood"]));

    let response = AxumTestRequest::post("/api/auth/onboarding/step")
        .bearer(&access)
        .json(&json!({ "step": "stretching", "data": {} }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");

    let response = AxumTestRequest::get("/api/auth/profile")
        .bearer(&access)
        .send(router)
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["user"]["email"], "http@example.com");
    assert!(body["user"]["currentMeasurements"].is_null());
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let (_, router) = setup().await;

    for uri in ["/api/auth/profile", "/api/progress/stats", "/api/workouts/stats"] {
        let response = AxumTestRequest::get(uri).send(router.clone()).await;
        assert_eq!(response.status(), 401, "{uri}");
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "AUTH_REQUIRED");
    }

    let response = AxumTestRequest::get("/api/progress/stats")
        .bearer("not-a-jwt")
        .send(router)
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_progress_routes() {
    let (resources, router) = setup().await;
    let (_, access) = common::create_test_user(&resources, "progress@example.com").await;

    let response = AxumTestRequest::get("/api/progress/stats")
        .bearer(&access)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["has_data"], false);

    let response = AxumTestRequest::post("/api/progress/entries")
        .bearer(&access)
        .json(&json!({ "date": "2024-01-01", "weight": 80 }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 201);
    let entry_id = response.json::<Value>()["entry_id"].as_i64().unwrap();

    let response = AxumTestRequest::post("/api/progress/entries")
        .bearer(&access)
        .json(&json!({ "date": "2024-01-01", "weight": 78 }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);

    let response = AxumTestRequest::get(&format!("/api/progress/entries/{entry_id}"))
        .bearer(&access)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>()["weight"], 78.0);

    let response = AxumTestRequest::get("/api/progress/entries?page=abc")
        .bearer(&access)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_FORMAT");
    assert_eq!(body["error"]["details"]["field"], "page");

    let response = AxumTestRequest::get("/api/progress/entries?page=1&page_size=5")
        .bearer(&access)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["entries"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["has_next"], false);

    let response = AxumTestRequest::delete(&format!("/api/progress/entries/{entry_id}"))
        .bearer(&access)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 204);

    let response = AxumTestRequest::get(&format!("/api/progress/entries/{entry_id}"))
        .bearer(&access)
        .send(router)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_workout_routes() {
    let (resources, router) = setup().await;
    let (_, access) = common::create_test_user(&resources, "lifter@example.com").await;

    let response = AxumTestRequest::post("/api/workouts/progress")
        .bearer(&access)
        .json(&json!({
            "session": { "status": "completed", "duration": 30, "total_exercises": 1, "completed_exercises": 1 },
            "sets": [{ "exercise_id": "kettlebell swing", "set_number": 1, "reps_completed": 15 }]
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["exercises_created"], 1);
    let session_id = body["session_id"].as_i64().unwrap();

    let response = AxumTestRequest::get(&format!("/api/workouts/sessions/{session_id}"))
        .bearer(&access)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["sets"][0]["reps_completed"], 15);

    let response = AxumTestRequest::get("/api/workouts/stats")
        .bearer(&access)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["total_sessions"], 1);
    assert_eq!(body["completion_rate"], 100.0);

    let response = AxumTestRequest::get("/api/workouts/history?page=0")
        .bearer(&access)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");

    let response = AxumTestRequest::get("/api/workouts/sessions/99999")
        .bearer(&access)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 404);

    let response = AxumTestRequest::post("/api/workouts/completed")
        .bearer(&access)
        .json(&json!({ "workout_name": "Evening run", "workout_type": "cardio", "date": "2024-06-01", "duration": 25 }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 201);

    let response = AxumTestRequest::get("/api/workouts/completed")
        .bearer(&access)
        .send(router)
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["workouts"][0]["workout_name"], "Evening run");
    assert_eq!(body["pagination"]["total_count"], 1);
}

#[tokio::test]
async fn test_plan_routes_enforce_authorship() {
    let (resources, router) = setup().await;
    let (_, author) = common::create_test_user(&resources, "planner@example.com").await;
    let (_, reader) = common::create_test_user(&resources, "reader@example.com").await;
    let exercise = resources
        .workouts
        .create_exercise(&json!({ "name": "Deadlift", "muscle_group": "back" }))
        .await
        .unwrap();

    let response = AxumTestRequest::post("/api/workouts/plans")
        .bearer(&author)
        .json(&json!({ "name": "Pull focus", "difficulty": "advanced" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    let plan_id = body["id"].as_i64().unwrap();
    assert_eq!(body["duration"], "1_month");

    let response = AxumTestRequest::post(&format!("/api/workouts/plans/{plan_id}/days"))
        .bearer(&author)
        .json(&json!({ "name": "Day 1", "day_number": 1 }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 201);
    let day_id = response.json::<Value>()["id"].as_i64().unwrap();

    let response = AxumTestRequest::post(&format!("/api/workouts/days/{day_id}/exercises"))
        .bearer(&author)
        .json(&json!({ "exercise_id": exercise.id, "order": 1 }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    assert_eq!(body["order"], 1);
    assert_eq!(body["exercise_name"], "Deadlift");
    let prescription_id = body["id"].as_i64().unwrap();

    let response = AxumTestRequest::get(&format!("/api/workouts/plans/{plan_id}"))
        .bearer(&reader)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["name"], "Pull focus");
    assert_eq!(body["days"][0]["exercises"][0]["exercise_id"], exercise.id);

    let response = AxumTestRequest::put(&format!("/api/workouts/plans/{plan_id}"))
        .bearer(&reader)
        .json(&json!({ "name": "Hijacked" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 403);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");

    let response = AxumTestRequest::delete(&format!("/api/workouts/day-exercises/{prescription_id}"))
        .bearer(&author)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 204);

    let response = AxumTestRequest::delete(&format!("/api/workouts/days/{day_id}"))
        .bearer(&author)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 204);

    let response = AxumTestRequest::get("/api/workouts/plans")
        .bearer(&reader)
        .send(router)
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["pagination"]["total_count"], 1);
}

#[tokio::test]
async fn test_goal_and_analytics_routes() {
    let (resources, router) = setup().await;
    let (_, access) = common::create_test_user(&resources, "tracker@example.com").await;

    let response = AxumTestRequest::post("/api/progress/goals")
        .bearer(&access)
        .json(&json!({
            "title": "Bench 100",
            "goal_type": "strength",
            "start_value": 60,
            "current_value": 80,
            "target_value": 100,
            "target_date": "2024-12-01"
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    assert_eq!(body["progress_percentage"], 50.0);
    let goal_id = body["id"].as_i64().unwrap();

    let response = AxumTestRequest::put(&format!("/api/progress/goals/{goal_id}"))
        .bearer(&access)
        .json(&json!({ "current_value": 100 }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["is_achieved"], true);

    let response = AxumTestRequest::get("/api/progress/goals?status=completed&page_size=5")
        .bearer(&access)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["goals"][0]["id"], goal_id);
    assert_eq!(body["pagination"]["page_size"], 5);

    let response = AxumTestRequest::post("/api/progress/workout")
        .bearer(&access)
        .json(&json!({ "plan_name": "Two day taster", "total_days": 2 }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 201);
    let run_id = response.json::<Value>()["id"].as_i64().unwrap();

    let response = AxumTestRequest::post(&format!("/api/progress/workout/{run_id}/log"))
        .bearer(&access)
        .json(&json!({ "duration": 35, "rating": 5 }))
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["is_completed"], true);
    assert_eq!(body["completion_percentage"], 100.0);

    let response = AxumTestRequest::get("/api/progress/analytics?period=week&end=2024-06-07")
        .bearer(&access)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["period"], "week");
    assert_eq!(body["start_date"], "2024-06-01");
    assert_eq!(body["total_days"], 7);

    let response = AxumTestRequest::get("/api/progress/analytics?end=June")
        .bearer(&access)
        .send(router.clone())
        .await;
    assert_eq!(response.status(), 400);

    let response = AxumTestRequest::delete(&format!("/api/progress/goals/{goal_id}"))
        .bearer(&access)
        .send(router)
        .await;
    assert_eq!(response.status(), 204);
}
