// ABOUTME: Integration tests for onboarding steps and direct profile merges
// ABOUTME: Runs the profile merge engine against an in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use fittransform_server::errors::ErrorCode;
use fittransform_server::models::{FitnessGoal, FitnessLevel, Gender, SpecificGoal};
use fittransform_server::onboarding::OnboardingStep;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_profile_step_merges_only_present_fields() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "jane@example.com").await;

    let (step, outcome) = resources
        .onboarding
        .apply_step(
            user.id,
            "profile",
            &json!({ "height": 170, "weight": "65.5", "gender": "female", "age": 30 }),
        )
        .await
        .unwrap();
    assert_eq!(step, OnboardingStep::Profile);
    assert_eq!(outcome.user.height, Some(170.0));
    assert_eq!(outcome.user.weight, Some(65.5));
    assert_eq!(outcome.user.gender, Some(Gender::Female));
    assert!(!outcome.user.has_completed_onboarding);

    // A later step with only one field keeps everything else
    let (_, outcome) = resources
        .onboarding
        .apply_step(user.id, "profile", &json!({ "fitness_level": "advanced" }))
        .await
        .unwrap();
    assert_eq!(outcome.user.height, Some(170.0));
    assert_eq!(outcome.user.age, Some(30));
    assert_eq!(outcome.user.fitness_level, FitnessLevel::Advanced);
}

#[tokio::test]
async fn test_goals_step_accepts_frontend_names() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "goals@example.com").await;

    let (_, outcome) = resources
        .onboarding
        .apply_step(
            user.id,
            "goals",
            &json!({ "fitnessGoal": "lose_weight", "specificGoal": "build_muscle" }),
        )
        .await
        .unwrap();
    assert_eq!(outcome.user.fitness_goal, Some(FitnessGoal::LoseWeight));
    assert_eq!(outcome.user.specific_goal, Some(SpecificGoal::BuildMuscle));
}

#[tokio::test]
async fn test_specific_goals_completes_onboarding_with_one_goal_row() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "finish@example.com").await;

    let (_, outcome) = resources
        .onboarding
        .apply_step(
            user.id,
            "specific_goals",
            &json!({ "specificGoal": "weight_loss", "waist": 80, "targetWeight": 60 }),
        )
        .await
        .unwrap();
    assert!(outcome.user.has_completed_onboarding);
    assert_eq!(outcome.user.specific_goal, Some(SpecificGoal::WeightLoss));

    resources
        .onboarding
        .apply_step(user.id, "specific_goals", &json!({ "hips": 95 }))
        .await
        .unwrap();

    let goals = resources
        .database
        .body()
        .get_goal_measurements(user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(goals.target_weight, Some(60.0));
    assert_eq!(goals.measurements.waist, Some(80.0));
    assert_eq!(goals.measurements.hips, Some(95.0));

    let stored = resources.database.users().get_user(user.id).await.unwrap().unwrap();
    assert!(stored.has_completed_onboarding);
}

#[tokio::test]
async fn test_unknown_step_mutates_nothing() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "unknown@example.com").await;

    let err = resources
        .onboarding
        .apply_step(user.id, "warmup", &json!({ "height": 190 }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(err.context.details["field"], "step");

    let stored = resources.database.users().get_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.height, None);
}

#[tokio::test]
async fn test_invalid_value_leaves_no_partial_write() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "partial@example.com").await;

    let err = resources
        .onboarding
        .apply_step(user.id, "profile", &json!({ "height": 180, "gender": "unknown" }))
        .await
        .unwrap_err();
    assert!(err.code.is_client_error());
    assert_eq!(err.context.details["step"], "profile");

    let stored = resources.database.users().get_user(user.id).await.unwrap().unwrap();
    assert_eq!(stored.height, None);
}

#[tokio::test]
async fn test_body_composition_step_keeps_one_row() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "comp@example.com").await;

    resources
        .onboarding
        .apply_step(user.id, "body_composition", &json!({ "bodyFat": 22.5, "bmr": 1500 }))
        .await
        .unwrap();
    let (_, outcome) = resources
        .onboarding
        .apply_step(
            user.id,
            "body_composition",
            &json!({ "muscle_mass": 30, "favouriteColour": "blue" }),
        )
        .await
        .unwrap();
    assert_eq!(outcome.ignored_fields, vec!["favouriteColour".to_owned()]);

    let composition = resources
        .database
        .body()
        .get_body_composition(user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(composition.body_fat, Some(22.5));
    assert_eq!(composition.muscle_mass, Some(30.0));
}

#[tokio::test]
async fn test_body_model_step_writes_current_measurements() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "model@example.com").await;

    let (_, outcome) = resources
        .onboarding
        .apply_step(user.id, "body_model", &json!({ "chest": 100, "leftarm": 35 }))
        .await
        .unwrap();
    let view = outcome.measurements_json();
    assert_eq!(view["chest"], 100.0);
    assert_eq!(view["leftarm"], 35.0);
    assert!(view["waist"].is_null());
}

#[tokio::test]
async fn test_complete_onboarding_and_complete_profile() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "profile@example.com").await;

    let profile = resources
        .onboarding
        .get_complete_profile(user.id)
        .await
        .unwrap()
        .to_json();
    assert!(profile["bodyComposition"].is_null());
    assert!(profile["goalMeasurements"].is_null());
    assert_eq!(profile["hasCompletedOnboarding"], false);

    let completed = resources.onboarding.complete_onboarding(user.id).await.unwrap();
    assert!(completed.has_completed_onboarding);
}

#[tokio::test]
async fn test_update_profile_rejects_negative_weight() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "negative@example.com").await;

    let err = resources
        .onboarding
        .update_profile(user.id, &json!({ "weight": -3 }))
        .await
        .unwrap_err();
    assert!(err.code.is_client_error());
    assert_eq!(err.context.details["field"], "weight");
}

#[tokio::test]
async fn test_missing_user_is_not_found() {
    let resources = common::create_test_resources().await;

    let err = resources
        .onboarding
        .apply_step(Uuid::new_v4(), "goals", &json!({ "fitnessGoal": "maintain" }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}
