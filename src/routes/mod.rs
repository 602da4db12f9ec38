// ABOUTME: HTTP route assembly and shared server resources
// ABOUTME: Wires plan, workout-day, profile, and health routes into one router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # HTTP Routes
//!
//! REST API surface of the training-plan server:
//!
//! - `POST /api/training-plans/generate` submit the survey, generate a plan
//! - `GET /api/training-plans/active` active plan with completion stats
//! - `PATCH /api/workout-days/:id` toggle a day's completion
//! - `GET /api/profile`, `GET /api/personal-records` survey data readback
//! - `GET /health` liveness for load balancers
//!
//! All `/api` endpoints require JWT bearer authentication.

pub mod plans;
pub mod profile;
pub mod workout_days;

pub use plans::PlansRoutes;
pub use profile::ProfileRoutes;
pub use workout_days::WorkoutDaysRoutes;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::llm::PlanGenerator;
use crate::middleware::setup_cors;

/// Shared state handed to every route handler
pub struct ServerResources {
    /// Database handle
    pub database: Database,
    /// JWT session authentication
    pub auth_manager: AuthManager,
    /// AI plan generation provider
    pub plan_generator: Arc<dyn PlanGenerator>,
    /// Server configuration
    pub config: ServerConfig,
}

/// Build the full application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config);

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(PlansRoutes::routes(resources.clone()))
        .merge(WorkoutDaysRoutes::routes(resources.clone()))
        .merge(ProfileRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes() -> Router {
        use axum::{routing::get, Json};

        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new().route("/health", get(health_handler))
    }
}
