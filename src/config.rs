// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Ports, database URL, JWT secret, and generation timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # Configuration
//!
//! Environment-driven server configuration. A `.env` file is loaded when
//! present; every value except `JWT_SECRET` has a development default.
//! OpenRouter settings live with the provider itself, see
//! [`crate::llm::OpenRouterProvider::from_env`].

use std::env;

use tracing::warn;

use crate::errors::{AppError, AppResult};

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default SQLite database URL
const DEFAULT_DATABASE_URL: &str = "sqlite:athletica.db";

/// Default session token lifetime
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Default upper bound the UI waits on a generation request
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the API server
    pub http_port: u16,
    /// Database connection URL
    pub database_url: String,
    /// Secret for signing session tokens
    pub jwt_secret: String,
    /// Session token lifetime in hours
    pub jwt_expiry_hours: i64,
    /// Seconds the dashboard waits on plan generation before giving up
    pub generation_timeout_secs: u64,
    /// Comma-separated list of allowed CORS origins, or `*` for any
    pub cors_allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when `JWT_SECRET` is missing or a numeric variable
    /// fails to parse
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if it exists
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {e}");
        }

        let http_port = env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())
            .parse()
            .map_err(|e| AppError::config(format!("Invalid HTTP_PORT value: {e}")))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::config("JWT_SECRET must be set"))?;

        let jwt_expiry_hours = env_var_or("JWT_EXPIRY_HOURS", &DEFAULT_JWT_EXPIRY_HOURS.to_string())
            .parse()
            .map_err(|e| AppError::config(format!("Invalid JWT_EXPIRY_HOURS value: {e}")))?;

        let generation_timeout_secs = env_var_or(
            "GENERATION_TIMEOUT_SECS",
            &DEFAULT_GENERATION_TIMEOUT_SECS.to_string(),
        )
        .parse()
        .map_err(|e| AppError::config(format!("Invalid GENERATION_TIMEOUT_SECS value: {e}")))?;

        Ok(Self {
            http_port,
            database_url: env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            jwt_secret,
            jwt_expiry_hours,
            generation_timeout_secs,
            cors_allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
        })
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
