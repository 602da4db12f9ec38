// ABOUTME: AI plan-generation adapter: provider trait and response contract
// ABOUTME: Enforces the exactly-70-day shape before anything touches storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # AI Plan Generator
//!
//! The generation provider is an opaque, fallible function from a validated
//! profile to exactly 70 structured day descriptors. This module defines the
//! [`PlanGenerator`] seam and the shared response validation every provider
//! goes through.
//!
//! Failure taxonomy:
//! - `AI_SERVICE_UNAVAILABLE`: the provider reported rate limiting or
//!   unavailability; the caller may suggest trying later.
//! - `AI_SERVICE_MISCONFIGURED`: provider credentials are absent. Operational,
//!   not user-fixable.
//! - `AI_MALFORMED_RESPONSE`: the payload cannot be parsed as the expected
//!   structure, or the day count is anything other than exactly 70. The 10-week
//!   shape is a domain invariant; there is no partial acceptance, truncation,
//!   or padding.
//!
//! Providers never retry internally: retries are the orchestration's call and
//! are surfaced to the user.

mod openrouter;
mod prompts;

pub use openrouter::{OpenRouterConfig, OpenRouterProvider};
pub use prompts::build_plan_prompt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::models::{DayDescriptor, GenerationProfile, RecordInput, PLAN_LENGTH_DAYS};

/// Seam for the external plan-generation service
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Generate exactly 70 day descriptors for the given profile
    ///
    /// # Errors
    ///
    /// Returns an AI-kind error per the module taxonomy; never a partially
    /// valid plan.
    async fn generate_plan(
        &self,
        profile: &GenerationProfile,
        personal_records: &[RecordInput],
    ) -> AppResult<Vec<DayDescriptor>>;
}

/// Wire shape of the generated plan inside the model's text content
#[derive(Debug, Deserialize)]
struct PlanPayload {
    workout_days: Vec<DayDescriptor>,
}

/// Parse and validate a provider's text content into day descriptors
///
/// The descriptors must number exactly 70 and carry day numbers 1..=70 with no
/// gaps or duplicates. Descriptors are returned ordered by day number.
///
/// # Errors
///
/// Returns `AI_MALFORMED_RESPONSE` for unparseable content or any day-count or
/// day-number violation.
pub fn parse_plan_response(content: &str) -> AppResult<Vec<DayDescriptor>> {
    let payload: PlanPayload = serde_json::from_str(content)
        .map_err(|e| AppError::ai_malformed(format!("Failed to parse AI-generated plan: {e}")))?;

    let mut days = payload.workout_days;
    if days.len() != PLAN_LENGTH_DAYS as usize {
        return Err(AppError::ai_malformed(format!(
            "Expected {PLAN_LENGTH_DAYS} workout days, got {}",
            days.len()
        )));
    }

    days.sort_by_key(|d| d.day_number);
    for (i, day) in days.iter().enumerate() {
        let expected = i as u32 + 1;
        if day.day_number != expected {
            return Err(AppError::ai_malformed(format!(
                "Day numbers must cover 1..={PLAN_LENGTH_DAYS} exactly; expected {expected}, got {}",
                day.day_number
            )));
        }
    }

    Ok(days)
}
