// ABOUTME: Pure completion-statistics derivation from workout day records
// ABOUTME: Recomputed on every read or toggle, never persisted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # Completion Statistics
//!
//! Derives [`CompletionStats`] from a plan's day records. The calculation is
//! deterministic: `today` is an explicit parameter so callers (and tests)
//! control the clock.
//!
//! A plan counts as completed on either of two distinct grounds: every
//! non-rest day has been checked off, or the plan's calendar range has
//! elapsed. The second branch intentionally marks a plan completed even with
//! unfinished days; [`PlanCompletionReason`] records which branch applied.

use chrono::NaiveDate;

use crate::models::{CompletionStats, PlanCompletionReason, WorkoutDay};

/// Compute aggregate progress for a set of day records
///
/// `completion_percentage` is round(100 * completed / total) and defined as 0
/// when the plan has no trainable days at all; such a degenerate plan still
/// reports itself completed, since every one of its zero workouts is done.
#[must_use]
pub fn calculate_completion_stats(
    workout_days: &[WorkoutDay],
    end_date: NaiveDate,
    today: NaiveDate,
) -> CompletionStats {
    let total_workouts = workout_days.iter().filter(|d| !d.is_rest_day).count() as u32;
    let completed_workouts = workout_days
        .iter()
        .filter(|d| !d.is_rest_day && d.is_completed)
        .count() as u32;
    let total_rest_days = workout_days.iter().filter(|d| d.is_rest_day).count() as u32;

    let completion_percentage = if total_workouts > 0 {
        (f64::from(completed_workouts) * 100.0 / f64::from(total_workouts)).round() as u32
    } else {
        0
    };

    // "All done" takes precedence as the reported reason when both hold.
    // A plan with no trainable days at all has nothing left to do, so it
    // counts as completed outright.
    let completion_reason = if completed_workouts == total_workouts {
        Some(PlanCompletionReason::AllWorkoutsDone)
    } else if end_date < today {
        Some(PlanCompletionReason::EndDatePassed)
    } else {
        None
    };

    CompletionStats {
        total_workouts,
        completed_workouts,
        total_rest_days,
        completion_percentage,
        is_plan_completed: completion_reason.is_some(),
        completion_reason,
    }
}
