// ABOUTME: Goal and plan-run route handlers under /api/progress/goals and /api/progress/workout
// ABOUTME: CRUD with derived progress fields, plus logging workouts against a plan run
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

/// Goal list filter; read alongside the page parameters
#[derive(Debug, Default, Deserialize)]
pub struct GoalQuery {
    /// `active`, `completed`, or `cancelled`
    pub status: Option<String>,
}

/// Goal and plan-run routes
pub struct GoalRoutes;

impl GoalRoutes {
    /// Create all goal and plan-run routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/progress/goals",
                get(Self::handle_list_goals).post(Self::handle_create_goal),
            )
            .route(
                "/api/progress/goals/:id",
                get(Self::handle_get_goal)
                    .put(Self::handle_update_goal)
                    .delete(Self::handle_delete_goal),
            )
            .route(
                "/api/progress/workout",
                get(Self::handle_list_runs).post(Self::handle_start_run),
            )
            .route(
                "/api/progress/workout/:id",
                get(Self::handle_get_run)
                    .put(Self::handle_update_run)
                    .delete(Self::handle_delete_run),
            )
            .route("/api/progress/workout/:id/log", post(Self::handle_log_workout))
            .with_state(resources)
    }

    async fn handle_list_goals(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(filter): Query<GoalQuery>,
        Query(query): Query<PageQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let request = page_request(&query, &resources)?;
        let page = resources
            .goals
            .list_goals(auth.user_id, filter.status.as_deref(), request)
            .await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "goals": page.items,
                "pagination": page.pagination,
            })),
        )
            .into_response())
    }

    async fn handle_create_goal(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let goal = resources.goals.create_goal(auth.user_id, &body).await?;
        Ok((StatusCode::CREATED, Json(goal)).into_response())
    }

    async fn handle_get_goal(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let goal_id = parse_id(&id, "goal_id")?;
        let goal = resources.goals.get_goal(auth.user_id, goal_id).await?;
        Ok((StatusCode::OK, Json(goal)).into_response())
    }

    async fn handle_update_goal(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let goal_id = parse_id(&id, "goal_id")?;
        let goal = resources.goals.update_goal(auth.user_id, goal_id, &body).await?;
        Ok((StatusCode::OK, Json(goal)).into_response())
    }

    async fn handle_delete_goal(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let goal_id = parse_id(&id, "goal_id")?;
        resources.goals.delete_goal(auth.user_id, goal_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_list_runs(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<PageQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let request = page_request(&query, &resources)?;
        let page = resources
            .goals
            .list_plan_progress(auth.user_id, request)
            .await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "progress": page.items,
                "pagination": page.pagination,
            })),
        )
            .into_response())
    }

    async fn handle_start_run(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let progress = resources.goals.start_plan(auth.user_id, &body).await?;
        Ok((StatusCode::CREATED, Json(progress)).into_response())
    }

    async fn handle_get_run(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let progress_id = parse_id(&id, "progress_id")?;
        let progress = resources
            .goals
            .get_plan_progress(auth.user_id, progress_id)
            .await?;
        Ok((StatusCode::OK, Json(progress)).into_response())
    }

    async fn handle_update_run(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let progress_id = parse_id(&id, "progress_id")?;
        let progress = resources
            .goals
            .update_plan_progress(auth.user_id, progress_id, &body)
            .await?;
        Ok((StatusCode::OK, Json(progress)).into_response())
    }

    async fn handle_delete_run(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let progress_id = parse_id(&id, "progress_id")?;
        resources
            .goals
            .delete_plan_progress(auth.user_id, progress_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_log_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let progress_id = parse_id(&id, "progress_id")?;
        let progress = resources
            .goals
            .log_workout(auth.user_id, progress_id, &body)
            .await?;
        Ok((StatusCode::OK, Json(progress)).into_response())
    }
}
