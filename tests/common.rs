// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, auth, router, and stub generator helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! Shared test utilities for `athletica`

use std::sync::{Arc, Once};

use async_trait::async_trait;
use axum::Router;
use uuid::Uuid;

use athletica::{
    auth::AuthManager,
    config::ServerConfig,
    database::Database,
    errors::{AppError, AppResult},
    llm::PlanGenerator,
    models::{DayDescriptor, GenerationProfile, RecordInput, PLAN_LENGTH_DAYS},
    routes::{self, ServerResources},
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory test database with migrations applied
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

/// Auth manager with a fixed test secret
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(b"test-jwt-secret", 24)
}

/// Server configuration for tests
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database_url: "sqlite::memory:".to_owned(),
        jwt_secret: "test-jwt-secret".to_owned(),
        jwt_expiry_hours: 24,
        generation_timeout_secs: 60,
        cors_allowed_origins: "*".to_owned(),
    }
}

/// A fresh user id with a valid bearer token for it
pub fn create_test_user(auth: &AuthManager) -> (Uuid, String) {
    let user_id = Uuid::new_v4();
    let token = auth.generate_token(user_id).expect("Failed to create token");
    (user_id, format!("Bearer {token}"))
}

/// Build the seventy descriptors the stub generator returns; every seventh
/// day is a rest day
pub fn stub_descriptors() -> Vec<DayDescriptor> {
    (1..=PLAN_LENGTH_DAYS)
        .map(|day_number| {
            let is_rest_day = day_number % 7 == 0;
            DayDescriptor {
                day_number,
                workout_description: if is_rest_day {
                    "Odpoczynek".to_owned()
                } else {
                    format!("Bieg spokojny {} km", 4 + day_number % 5)
                },
                is_rest_day,
            }
        })
        .collect()
}

/// Stub AI provider returning a fixed, valid plan
pub struct StubGenerator;

#[async_trait]
impl PlanGenerator for StubGenerator {
    async fn generate_plan(
        &self,
        _profile: &GenerationProfile,
        _personal_records: &[RecordInput],
    ) -> AppResult<Vec<DayDescriptor>> {
        Ok(stub_descriptors())
    }
}

/// Stub AI provider that always fails as unavailable
pub struct UnavailableGenerator;

#[async_trait]
impl PlanGenerator for UnavailableGenerator {
    async fn generate_plan(
        &self,
        _profile: &GenerationProfile,
        _personal_records: &[RecordInput],
    ) -> AppResult<Vec<DayDescriptor>> {
        Err(AppError::ai_unavailable())
    }
}

/// Full router over an in-memory database and the given generator
pub async fn create_test_app(generator: Arc<dyn PlanGenerator>) -> (Router, AuthManager) {
    let database = create_test_database().await;
    let auth_manager = create_test_auth_manager();

    let resources = Arc::new(ServerResources {
        database,
        auth_manager: auth_manager.clone(),
        plan_generator: generator,
        config: test_config(),
    });

    (routes::router(resources), auth_manager)
}

/// A survey body that passes validation
pub fn valid_survey_json() -> serde_json::Value {
    serde_json::json!({
        "profile": {
            "goal_distance": "Half Marathon",
            "weekly_km": 30.0,
            "training_days_per_week": 4,
            "age": 32,
            "weight": 72.5,
            "height": 178,
            "gender": "M"
        },
        "personal_records": [
            { "distance": "5K", "time_seconds": 1350 }
        ]
    })
}
