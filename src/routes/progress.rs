// ABOUTME: Progress snapshot route handlers under /api/progress
// ABOUTME: Save by date, paginated history, single-entry access, stats, and period analytics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{authenticate, page_request, parse_id};
use crate::errors::AppError;
use crate::pagination::PageQuery;
use crate::resources::ServerResources;

/// Analytics window selection
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// `week`, `month`, `quarter`, or `year`
    pub period: Option<String>,
    /// Last day of the window, `YYYY-MM-DD`
    pub end: Option<String>,
}

/// Progress routes
pub struct ProgressRoutes;

impl ProgressRoutes {
    /// Create all progress routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/progress/entries",
                get(Self::handle_history).post(Self::handle_save_entry),
            )
            .route(
                "/api/progress/entries/:id",
                get(Self::handle_get_entry).delete(Self::handle_delete_entry),
            )
            .route("/api/progress/stats", get(Self::handle_stats))
            .route("/api/progress/analytics", get(Self::handle_analytics))
            .with_state(resources)
    }

    async fn handle_save_entry(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let saved = resources.progress.save_entry(auth.user_id, &body).await?;
        let status = if saved.created {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };
        Ok((
            status,
            Json(json!({
                "message": "Progress saved successfully",
                "entry_id": saved.entry.id,
                "created": saved.created,
                "entry": saved.entry,
                "ignored_fields": saved.ignored_fields,
            })),
        )
            .into_response())
    }

    async fn handle_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<PageQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let request = page_request(&query, &resources)?;
        let page = resources.progress.get_history(auth.user_id, request).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "entries": page.items,
                "pagination": page.pagination,
            })),
        )
            .into_response())
    }

    async fn handle_get_entry(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let entry_id = parse_id(&id, "entry_id")?;
        let entry = resources.progress.get_entry(auth.user_id, entry_id).await?;
        Ok((StatusCode::OK, Json(entry)).into_response())
    }

    async fn handle_delete_entry(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let entry_id = parse_id(&id, "entry_id")?;
        resources.progress.delete_entry(auth.user_id, entry_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let stats = resources.progress.get_stats(auth.user_id).await?;
        Ok((StatusCode::OK, Json(stats)).into_response())
    }

    async fn handle_analytics(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<AnalyticsQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources).await?;
        let analytics = resources
            .progress
            .get_analytics(auth.user_id, query.period.as_deref(), query.end.as_deref())
            .await?;
        Ok((StatusCode::OK, Json(analytics)).into_response())
    }
}
