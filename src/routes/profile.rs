// ABOUTME: Profile and onboarding route handlers under /api/auth
// ABOUTME: Step submissions, direct profile edits, and body entity merges for the authenticated user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use serde_json::{json, Value};

use super::authenticate;
use crate::errors::{AppError, AppResult};
use crate::onboarding::fields::user_view;
use crate::onboarding::MergeOutcome;
use crate::resources::ServerResources;

/// Split a step submission into its step name and data object
fn step_request(body: &Value) -> AppResult<(&str, Value)> {
    let step = body
        .get("step")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::missing_field("step"))?;
    let data = match body.get("data") {
        None | Some(Value::Null) => json!({}),
        Some(data) => data.clone(),
    };
    Ok((step, data))
}

/// Step response: the principal plus each sub-entity the step wrote
fn step_response(step: &str, outcome: &MergeOutcome) -> Value {
    let mut body = json!({
        "message": format!("{step} step completed successfully"),
        "step": step,
        "user": outcome.user_json(),
        "ignored_fields": outcome.ignored_fields,
    });
    if outcome.body_composition.is_some() {
        body["body_composition"] = outcome.body_composition_json();
    }
    if outcome.measurements.is_some() {
        body["measurements"] = outcome.measurements_json();
    }
    if outcome.goal_measurements.is_some() {
        body["goal_measurements"] = outcome.goal_measurements_json();
    }
    body
}

/// Profile and onboarding routes
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/auth/profile",
                get(Self::handle_get_profile).put(Self::handle_update_profile),
            )
            .route("/api/auth/onboarding/step", post(Self::handle_onboarding_step))
            .route(
                "/api/auth/onboarding/complete",
                post(Self::handle_complete_onboarding),
            )
            .route(
                "/api/auth/body-composition",
                post(Self::handle_body_composition),
            )
            .route("/api/auth/measurements", post(Self::handle_measurements))
            .route(
                "/api/auth/goal-measurements",
                post(Self::handle_goal_measurements),
            )
            .with_state(resources)
    }

    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let profile = resources.onboarding.get_complete_profile(auth.user_id).await?;
        Ok((StatusCode::OK, Json(json!({ "user": profile.to_json() }))).into_response())
    }

    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let outcome = resources.onboarding.update_profile(auth.user_id, &body).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "user": outcome.user_json(),
                "message": "Profile updated successfully",
                "ignored_fields": outcome.ignored_fields,
            })),
        )
            .into_response())
    }

    async fn handle_onboarding_step(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let (step, data) = step_request(&body)?;
        let (step, outcome) = resources
            .onboarding
            .apply_step(auth.user_id, step, &data)
            .await?;
        Ok((StatusCode::OK, Json(step_response(step.as_str(), &outcome))).into_response())
    }

    async fn handle_complete_onboarding(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let user = resources.onboarding.complete_onboarding(auth.user_id).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "message": "Onboarding completed successfully",
                "user": user_view(&user),
            })),
        )
            .into_response())
    }

    async fn handle_body_composition(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let outcome = resources
            .onboarding
            .update_body_composition(auth.user_id, &body)
            .await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "body_composition": outcome.body_composition_json(),
                "message": "Body composition updated successfully",
                "ignored_fields": outcome.ignored_fields,
            })),
        )
            .into_response())
    }

    async fn handle_measurements(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let outcome = resources
            .onboarding
            .update_body_measurements(auth.user_id, &body)
            .await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "measurements": outcome.measurements_json(),
                "message": "Measurements updated successfully",
                "ignored_fields": outcome.ignored_fields,
            })),
        )
            .into_response())
    }

    async fn handle_goal_measurements(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let outcome = resources
            .onboarding
            .update_goal_measurements(auth.user_id, &body)
            .await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "goal_measurements": outcome.goal_measurements_json(),
                "message": "Goal measurements updated successfully",
                "ignored_fields": outcome.ignored_fields,
            })),
        )
            .into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_step_request_requires_step() {
        let err = step_request(&json!({ "data": {} })).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);

        let body = json!({ "step": "basic_info" });
        let (step, data) = step_request(&body).unwrap();
        assert_eq!(step, "basic_info");
        assert_eq!(data, json!({}));
    }
}
