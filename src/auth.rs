// ABOUTME: JWT session authentication for the HTTP API
// ABOUTME: Issues and validates HS256 bearer tokens carrying the user id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # Authentication
//!
//! Stateless bearer-token authentication. Every API route resolves the
//! `Authorization` header to a user id through [`AuthManager::authenticate`];
//! an expired token is distinguished from an invalid one so clients can
//! redirect to login rather than surface a generic failure.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// JWT claims for user sessions
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authentication result with user context
#[derive(Debug, Clone, Copy)]
pub struct AuthResult {
    /// Authenticated user id
    pub user_id: Uuid,
}

/// Authentication manager for JWT session tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager from the shared secret
    #[must_use]
    pub fn new(secret: &[u8], token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours,
        }
    }

    /// Generate a session token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Validate a bearer token and resolve its user
    ///
    /// # Errors
    ///
    /// - `AUTH_EXPIRED` when the token's expiry has passed
    /// - `AUTH_INVALID` for any other validation failure
    pub fn validate_token(&self, token: &str) -> AppResult<AuthResult> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                warn!("JWT validation failed: {e}");
                if matches!(
                    e.kind(),
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature
                ) {
                    AppError::auth_expired()
                } else {
                    AppError::auth_invalid("Invalid session token")
                }
            })?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|_| AppError::auth_invalid("Token subject is not a valid user id"))?;

        Ok(AuthResult { user_id })
    }

    /// Authenticate an `Authorization: Bearer <token>` header value
    ///
    /// # Errors
    ///
    /// - `AUTH_REQUIRED` when the header is missing or not a bearer scheme
    /// - the `validate_token` errors otherwise
    pub fn authenticate(&self, auth_header: Option<&str>) -> AppResult<AuthResult> {
        let header = auth_header.ok_or_else(AppError::auth_required)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(AppError::auth_required)?;
        self.validate_token(token)
    }
}
