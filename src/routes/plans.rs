// ABOUTME: Workout plan route handlers under /api/workouts/plans, days, and day-exercises
// ABOUTME: Plan CRUD, day scheduling, and exercise prescriptions for the plan author
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use serde_json::{json, Value};

use super::{authenticate, page_request, parse_id};
use crate::errors::AppError;
use crate::pagination::PageQuery;
use crate::resources::ServerResources;

/// Workout plan routes
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create all workout plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/workouts/plans",
                get(Self::handle_list_plans).post(Self::handle_create_plan),
            )
            .route(
                "/api/workouts/plans/:id",
                get(Self::handle_get_plan)
                    .put(Self::handle_update_plan)
                    .delete(Self::handle_delete_plan),
            )
            .route("/api/workouts/plans/:id/days", post(Self::handle_create_day))
            .route(
                "/api/workouts/days/:id",
                get(Self::handle_get_day)
                    .put(Self::handle_update_day)
                    .delete(Self::handle_delete_day),
            )
            .route("/api/workouts/days/:id/exercises", post(Self::handle_add_exercise))
            .route(
                "/api/workouts/day-exercises/:id",
                delete(Self::handle_delete_exercise),
            )
            .with_state(resources)
    }

    async fn handle_list_plans(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<PageQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let request = page_request(&query, &resources)?;
        let page = resources.plans.list_plans(auth.user_id, request).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "plans": page.items,
                "pagination": page.pagination,
            })),
        )
            .into_response())
    }

    async fn handle_create_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let plan = resources.plans.create_plan(auth.user_id, &body).await?;
        Ok((StatusCode::CREATED, Json(plan)).into_response())
    }

    async fn handle_get_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let plan_id = parse_id(&id, "plan_id")?;
        let plan = resources.plans.get_plan(auth.user_id, plan_id).await?;
        Ok((StatusCode::OK, Json(plan)).into_response())
    }

    async fn handle_update_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let plan_id = parse_id(&id, "plan_id")?;
        let plan = resources.plans.update_plan(auth.user_id, plan_id, &body).await?;
        Ok((StatusCode::OK, Json(plan)).into_response())
    }

    async fn handle_delete_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let plan_id = parse_id(&id, "plan_id")?;
        resources.plans.delete_plan(auth.user_id, plan_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_create_day(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let plan_id = parse_id(&id, "plan_id")?;
        let day = resources.plans.create_day(auth.user_id, plan_id, &body).await?;
        Ok((StatusCode::CREATED, Json(day)).into_response())
    }

    async fn handle_get_day(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let day_id = parse_id(&id, "day_id")?;
        let day = resources.plans.get_day(auth.user_id, day_id).await?;
        Ok((StatusCode::OK, Json(day)).into_response())
    }

    async fn handle_update_day(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let day_id = parse_id(&id, "day_id")?;
        let day = resources.plans.update_day(auth.user_id, day_id, &body).await?;
        Ok((StatusCode::OK, Json(day)).into_response())
    }

    async fn handle_delete_day(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let day_id = parse_id(&id, "day_id")?;
        resources.plans.delete_day(auth.user_id, day_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_add_exercise(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let day_id = parse_id(&id, "day_id")?;
        let prescription = resources.plans.add_exercise(auth.user_id, day_id, &body).await?;
        Ok((StatusCode::CREATED, Json(prescription)).into_response())
    }

    async fn handle_delete_exercise(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let plan_exercise_id = parse_id(&id, "day_exercise_id")?;
        resources
            .plans
            .delete_exercise(auth.user_id, plan_exercise_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
