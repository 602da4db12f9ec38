// ABOUTME: Unified error handling for the Athletica training-plan service
// ABOUTME: Defines error codes, the AppError type, and HTTP response formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # Unified Error Handling System
//!
//! This module provides a centralized error handling system for the Athletica
//! server. It defines standard error types, error codes, and HTTP response
//! formatting so every route reports failures the same way: a machine-readable
//! code for clients, a human-readable message, and server-side-only diagnostic
//! detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication (1000-1999)
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    #[serde(rename = "AUTH_EXPIRED")]
    AuthExpired = 1002,

    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "VALIDATION_FAILED")]
    ValidationFailed = 3001,
    #[serde(rename = "REST_DAY_COMPLETION_NOT_ALLOWED")]
    RestDayCompletion = 3002,

    // Resources (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    #[serde(rename = "NO_ACTIVE_PLAN")]
    NoActivePlan = 4001,
    #[serde(rename = "WORKOUT_DAY_NOT_FOUND")]
    WorkoutDayNotFound = 4002,
    #[serde(rename = "PROFILE_NOT_FOUND")]
    ProfileNotFound = 4003,
    #[serde(rename = "ACTIVE_PLAN_EXISTS")]
    ActivePlanExists = 4004,

    // AI generation service (5000-5999)
    #[serde(rename = "AI_SERVICE_UNAVAILABLE")]
    AiServiceUnavailable = 5000,
    #[serde(rename = "AI_SERVICE_MISCONFIGURED")]
    AiServiceMisconfigured = 5001,
    #[serde(rename = "AI_MALFORMED_RESPONSE")]
    AiMalformedResponse = 5002,
    #[serde(rename = "AI_SERVICE_ERROR")]
    AiServiceError = 5003,

    // Internal (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    #[serde(rename = "DATA_INTEGRITY")]
    DataIntegrity = 9002,
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            Self::InvalidInput | Self::ValidationFailed | Self::RestDayCompletion => {
                StatusCode::BAD_REQUEST
            }

            // 401 Unauthorized - client reaction is redirect to sign-in
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => StatusCode::UNAUTHORIZED,

            // 404 Not Found
            Self::ResourceNotFound
            | Self::NoActivePlan
            | Self::WorkoutDayNotFound
            | Self::ProfileNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict - an active plan would be silently discarded
            Self::ActivePlanExists => StatusCode::CONFLICT,

            // 503 Service Unavailable - retryable, "try later"
            Self::AiServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::AiServiceMisconfigured
            | Self::AiMalformedResponse
            | Self::AiServiceError
            | Self::InternalError
            | Self::DatabaseError
            | Self::DataIntegrity
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::AuthExpired => "The session has expired",
            Self::InvalidInput => "The provided input is invalid",
            Self::ValidationFailed => "Validation failed",
            Self::RestDayCompletion => "Rest days cannot be marked as completed",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::NoActivePlan => "No active training plan found",
            Self::WorkoutDayNotFound => "Workout day not found",
            Self::ProfileNotFound => "Profile not found",
            Self::ActivePlanExists => "An active training plan already exists",
            Self::AiServiceUnavailable => {
                "AI service temporarily unavailable. Please try again later"
            }
            Self::AiServiceMisconfigured => "AI service is not configured",
            Self::AiMalformedResponse => "AI service returned an unusable training plan",
            Self::AiServiceError => "Failed to generate training plan",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::DataIntegrity => "Training plan data is incomplete",
            Self::ConfigError => "Configuration error encountered",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Request ID for tracing
    pub request_id: Option<String>,
    /// User ID if available
    pub user_id: Option<Uuid>,
    /// Resource ID if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            request_id: None,
            user_id: None,
            resource_id: None,
            details: serde_json::Value::Null,
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a user ID to the error context
    #[must_use]
    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.context.user_id = Some(user_id);
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context (returned to the client)
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Error payload body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Structured details (e.g. per-field validation messages)
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    #[serde(default)]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                details: error.context.details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            // Internal diagnostic detail stays server-side; the client only
            // sees code + message.
            error!(
                code = ?self.code,
                message = %self.message,
                source = ?self.source,
                user_id = ?self.context.user_id,
                resource_id = ?self.context.resource_id,
                "request failed"
            );
        }
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Invalid authentication
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authentication expired
    #[must_use]
    pub fn auth_expired() -> Self {
        Self::new(
            ErrorCode::AuthExpired,
            "Session expired. Please sign in again",
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Validation failure with per-field details
    #[must_use]
    pub fn validation(details: serde_json::Value) -> Self {
        Self::new(ErrorCode::ValidationFailed, "Validation failed").with_details(details)
    }

    /// Rest day completion attempt
    #[must_use]
    pub fn rest_day_completion() -> Self {
        Self::new(
            ErrorCode::RestDayCompletion,
            "Rest days cannot be marked as completed",
        )
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// No active training plan exists for the user
    #[must_use]
    pub fn no_active_plan() -> Self {
        Self::new(ErrorCode::NoActivePlan, "No active training plan found")
    }

    /// Workout day missing or not owned by the caller
    #[must_use]
    pub fn workout_day_not_found() -> Self {
        Self::new(ErrorCode::WorkoutDayNotFound, "Workout day not found")
    }

    /// Profile not yet created (user has not completed the survey)
    #[must_use]
    pub fn profile_not_found() -> Self {
        Self::new(ErrorCode::ProfileNotFound, "Profile not found")
    }

    /// Active plan exists and the request did not confirm replacement
    #[must_use]
    pub fn active_plan_exists() -> Self {
        Self::new(
            ErrorCode::ActivePlanExists,
            "An active training plan already exists. Confirm replacement to continue",
        )
    }

    /// AI provider reported rate limiting or unavailability
    #[must_use]
    pub fn ai_unavailable() -> Self {
        Self::new(
            ErrorCode::AiServiceUnavailable,
            "AI service temporarily unavailable. Please try again later",
        )
    }

    /// AI provider credentials are absent
    pub fn ai_misconfigured(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AiServiceMisconfigured, message)
    }

    /// AI payload cannot be parsed or violates the 70-day contract
    pub fn ai_malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AiMalformedResponse, message)
    }

    /// Generic AI provider failure
    pub fn ai_service(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AiServiceError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Persisted plan state violates an invariant (e.g. day count != 70)
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DataIntegrity, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::new(ErrorCode::DatabaseError, error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string()).with_source(error)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(
            ErrorCode::AuthRequired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::RestDayCompletion.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::NoActivePlan.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::ActivePlanExists.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::AiServiceUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::DataIntegrity.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_context() {
        let error = AppError::workout_day_not_found()
            .with_user_id(Uuid::new_v4())
            .with_resource_id("day-1");

        assert_eq!(error.code, ErrorCode::WorkoutDayNotFound);
        assert!(error.context.user_id.is_some());
        assert_eq!(error.context.resource_id.as_deref(), Some("day-1"));
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::validation(serde_json::json!([
            { "field": "profile.age", "message": "Age must be at least 1" }
        ]));
        let response = ErrorResponse::from(error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("VALIDATION_FAILED"));
        assert!(json.contains("profile.age"));
    }

    #[test]
    fn test_details_omitted_when_null() {
        let response = ErrorResponse::from(AppError::no_active_plan());
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("details"));
    }
}
