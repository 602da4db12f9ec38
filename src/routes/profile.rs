// ABOUTME: Route handlers for survey data readback and record management
// ABOUTME: Serves the stored profile; creates and deletes personal records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! Profile and personal record routes
//!
//! Records created here sit alongside the set captured by the survey; the
//! next generation replaces them all. Deletion is idempotent: removing an
//! id that is already gone succeeds with no content.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::ServerResources;
use crate::errors::AppError;
use crate::models::{Distance, FieldError, RecordInput};

/// Request body for creating a personal record
#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    /// Distance string ("5K", "10K", "Half Marathon", "Marathon")
    pub distance: String,
    /// Finish time in seconds
    pub time_seconds: i64,
}

impl CreateRecordRequest {
    fn parse(&self) -> Result<RecordInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        let distance = Distance::parse(&self.distance);
        if distance.is_none() {
            errors.push(FieldError {
                field: "distance".to_owned(),
                message: "Distance must be one of: 5K, 10K, Half Marathon, Marathon".to_owned(),
            });
        }
        if self.time_seconds < 1 {
            errors.push(FieldError {
                field: "time_seconds".to_owned(),
                message: "time_seconds must be greater than 0".to_owned(),
            });
        }

        match distance {
            Some(distance) if errors.is_empty() => Ok(RecordInput {
                distance,
                time_seconds: self.time_seconds as u32,
            }),
            _ => Err(errors),
        }
    }
}

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/profile", get(Self::handle_get_profile))
            .route(
                "/api/personal-records",
                get(Self::handle_list_records).post(Self::handle_create_record),
            )
            .route(
                "/api/personal-records/:id",
                delete(Self::handle_delete_record),
            )
            .with_state(resources)
    }

    /// Handle GET /api/profile
    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
        let auth = resources.auth_manager.authenticate(auth_header)?;

        let profile = resources
            .database
            .profiles()
            .get(auth.user_id)
            .await?
            .ok_or_else(|| AppError::profile_not_found().with_user_id(auth.user_id))?;

        Ok((StatusCode::OK, Json(profile)).into_response())
    }

    /// Handle GET /api/personal-records
    async fn handle_list_records(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
        let auth = resources.auth_manager.authenticate(auth_header)?;

        let records = resources
            .database
            .personal_records()
            .list(auth.user_id)
            .await?;

        Ok((StatusCode::OK, Json(records)).into_response())
    }

    /// Handle POST /api/personal-records
    async fn handle_create_record(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateRecordRequest>,
    ) -> Result<Response, AppError> {
        let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
        let auth = resources.auth_manager.authenticate(auth_header)?;

        let input = body.parse().map_err(|field_errors| {
            AppError::validation(serde_json::json!({ "fields": field_errors }))
        })?;

        let record = resources
            .database
            .personal_records()
            .insert(auth.user_id, &input, Utc::now())
            .await?;

        info!(
            user_id = %auth.user_id,
            record_id = %record.id,
            distance = record.distance.as_str(),
            "Personal record created"
        );
        Ok((StatusCode::CREATED, Json(record)).into_response())
    }

    /// Handle DELETE /api/personal-records/:id
    ///
    /// Idempotent: an unknown, foreign, or malformed id matches nothing and
    /// still answers 204.
    async fn handle_delete_record(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
        let auth = resources.auth_manager.authenticate(auth_header)?;

        if let Ok(record_id) = Uuid::parse_str(&id) {
            let removed = resources
                .database
                .personal_records()
                .delete(auth.user_id, record_id)
                .await?;
            if removed {
                info!(user_id = %auth.user_id, record_id = %record_id, "Personal record deleted");
            }
        }

        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
