// ABOUTME: Route handler for the dashboard workout-day completion toggle
// ABOUTME: Enforces ownership, rest-day rules, and idempotent writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! Workout day routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::patch,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::ServerResources;
use crate::errors::AppError;

/// Request body for the completion toggle
#[derive(Debug, Deserialize)]
pub struct UpdateWorkoutDayRequest {
    /// Target completion state
    pub is_completed: bool,
}

/// Workout day routes handler
pub struct WorkoutDaysRoutes;

impl WorkoutDaysRoutes {
    /// Create all workout day routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/workout-days/:id", patch(Self::handle_update))
            .with_state(resources)
    }

    /// Handle PATCH /api/workout-days/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(body): Json<UpdateWorkoutDayRequest>,
    ) -> Result<Response, AppError> {
        let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
        let auth = resources.auth_manager.authenticate(auth_header)?;

        // A syntactically invalid id can never match a row; report it the
        // same way as a missing one.
        let day_id = Uuid::parse_str(&id)
            .map_err(|_| AppError::workout_day_not_found().with_resource_id(id.clone()))?;

        let day = resources
            .database
            .plans()
            .set_day_completion(day_id, auth.user_id, body.is_completed, Utc::now())
            .await?;

        Ok((StatusCode::OK, Json(day)).into_response())
    }
}
