// ABOUTME: Route handlers for training plan generation and active-plan reads
// ABOUTME: Survey validation, replace confirmation, AI generation, and stats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! Training plan routes
//!
//! Generation is synchronous from the client's point of view: the handler
//! validates the survey, calls the AI provider, and persists the plan before
//! responding. Replacing an existing active plan must be confirmed explicitly
//! with `confirm_replace`, otherwise the request is rejected so a misfired
//! resubmit cannot silently destroy progress.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ServerResources;
use crate::auth::AuthResult;
use crate::errors::AppError;
use crate::materializer::PlanMaterializer;
use crate::models::{
    CompletionStats, GenerateTrainingPlanCommand, PlanWithDays, SurveySubmission,
};
use crate::stats::calculate_completion_stats;

/// Request body for plan generation
#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    /// Survey profile and personal records
    #[serde(flatten)]
    pub survey: SurveySubmission,
    /// Must be true to replace an existing active plan
    #[serde(default)]
    pub confirm_replace: bool,
}

/// A plan with its days and derived completion statistics
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    /// The plan row with its workout days
    #[serde(flatten)]
    pub plan: PlanWithDays,
    /// Derived completion statistics
    pub stats: CompletionStats,
}

impl PlanResponse {
    fn build(plan: PlanWithDays) -> Self {
        let stats = calculate_completion_stats(
            &plan.workout_days,
            plan.plan.end_date,
            Utc::now().date_naive(),
        );
        Self { plan, stats }
    }
}

/// Training plan routes handler
pub struct PlansRoutes;

impl PlansRoutes {
    /// Create all training plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/training-plans/generate", post(Self::handle_generate))
            .route("/api/training-plans/active", get(Self::handle_get_active))
            .with_state(resources)
    }

    /// Extract and authenticate the user from the authorization header
    fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthResult, AppError> {
        let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
        resources.auth_manager.authenticate(auth_header)
    }

    /// Handle POST /api/training-plans/generate
    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<GeneratePlanRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let command = GenerateTrainingPlanCommand::parse(&body.survey).map_err(|field_errors| {
            AppError::validation(serde_json::json!({ "fields": field_errors }))
        })?;

        let plans = resources.database.plans();
        if plans.has_active_plan(auth.user_id).await? && !body.confirm_replace {
            return Err(AppError::active_plan_exists().with_user_id(auth.user_id));
        }

        info!(user_id = %auth.user_id, "Generating training plan");
        let descriptors = resources
            .plan_generator
            .generate_plan(&command.profile, &command.personal_records)
            .await?;

        let materializer = PlanMaterializer::new(resources.database.pool().clone());
        let now = Utc::now();
        let plan = materializer
            .materialize(auth.user_id, &command, &descriptors, now.date_naive(), now)
            .await?;

        Ok((StatusCode::CREATED, Json(PlanResponse::build(plan))).into_response())
    }

    /// Handle GET /api/training-plans/active
    async fn handle_get_active(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let plan = resources
            .database
            .plans()
            .get_active_with_days(auth.user_id)
            .await?
            .ok_or_else(|| AppError::no_active_plan().with_user_id(auth.user_id))?;

        Ok((StatusCode::OK, Json(PlanResponse::build(plan))).into_response())
    }
}
