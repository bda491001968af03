// ABOUTME: Workout route handlers under /api/workouts
// ABOUTME: Exercise catalog, session saves and history, stats, and the completed-workout log
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{authenticate, page_request, parse_id};
use crate::errors::AppError;
use crate::pagination::PageQuery;
use crate::resources::ServerResources;

/// Catalog filter
#[derive(Debug, Default, Deserialize)]
pub struct ExerciseQuery {
    /// Muscle group name, e.g. `chest`
    pub muscle_group: Option<String>,
}

/// Workout routes
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/workouts/exercises",
                get(Self::handle_list_exercises).post(Self::handle_create_exercise),
            )
            .route("/api/workouts/progress", post(Self::handle_save_progress))
            .route("/api/workouts/stats", get(Self::handle_stats))
            .route("/api/workouts/history", get(Self::handle_history))
            .route("/api/workouts/sessions/:id", get(Self::handle_get_session))
            .route(
                "/api/workouts/completed",
                get(Self::handle_list_completed).post(Self::handle_log_completed),
            )
            .with_state(resources)
    }

    async fn handle_list_exercises(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ExerciseQuery>,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources).await?;
        let exercises = resources
            .workouts
            .list_exercises(query.muscle_group.as_deref())
            .await?;
        Ok((StatusCode::OK, Json(json!({ "exercises": exercises }))).into_response())
    }

    async fn handle_create_exercise(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources).await?;
        let exercise = resources.workouts.create_exercise(&body).await?;
        Ok((StatusCode::CREATED, Json(exercise)).into_response())
    }

    async fn handle_save_progress(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let saved = resources.workouts.save_progress(auth.user_id, &body).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "message": "Workout progress saved successfully",
                "session_id": saved.session_id,
                "sets_saved": saved.sets_saved,
                "exercises_created": saved.exercises_created,
            })),
        )
            .into_response())
    }

    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let stats = resources.workouts.get_stats(auth.user_id).await?;
        Ok((StatusCode::OK, Json(stats)).into_response())
    }

    async fn handle_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<PageQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let request = page_request(&query, &resources)?;
        let page = resources.workouts.get_history(auth.user_id, request).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "sessions": page.items,
                "pagination": page.pagination,
            })),
        )
            .into_response())
    }

    async fn handle_get_session(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let session_id = parse_id(&id, "session_id")?;
        let session = resources.workouts.get_session(auth.user_id, session_id).await?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }

    async fn handle_list_completed(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<PageQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let request = page_request(&query, &resources)?;
        let page = resources
            .workouts
            .list_completed_workouts(auth.user_id, request)
            .await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "workouts": page.items,
                "pagination": page.pagination,
            })),
        )
            .into_response())
    }

    async fn handle_log_completed(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let workout = resources
            .workouts
            .log_completed_workout(auth.user_id, &body)
            .await?;
        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }
}
