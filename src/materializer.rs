// ABOUTME: Atomic persistence of a generated training plan
// ABOUTME: Profile, records, plan row, and all 70 days commit or roll back together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # Plan Materialization
//!
//! Turns a validated generation command plus the AI's day descriptors into
//! durable rows. All writes happen inside a single transaction:
//!
//! 1. upsert the user's profile
//! 2. replace the personal record set
//! 3. deactivate the previously active plan
//! 4. insert the new plan row (active, starting today)
//! 5. insert the 70 workout days
//! 6. refetch plan and days, ordered by day number
//!
//! A failure at any step rolls the whole batch back, so the user's prior
//! plan stays active and untouched.

use chrono::{DateTime, Days, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::database::{personal_records, plans, profiles};
use crate::errors::{AppError, AppResult};
use crate::models::{
    DayDescriptor, GenerateTrainingPlanCommand, PlanWithDays, TrainingPlan, WorkoutDay,
    PLAN_LENGTH_DAYS,
};

/// Step names used in materialization logs
#[derive(Debug, Clone, Copy)]
enum MaterializeStep {
    UpsertProfile,
    ReplaceRecords,
    DeactivatePlan,
    InsertPlan,
    InsertDays,
    Refetch,
}

impl MaterializeStep {
    const fn as_str(self) -> &'static str {
        match self {
            Self::UpsertProfile => "upsert_profile",
            Self::ReplaceRecords => "replace_records",
            Self::DeactivatePlan => "deactivate_plan",
            Self::InsertPlan => "insert_plan",
            Self::InsertDays => "insert_days",
            Self::Refetch => "refetch",
        }
    }
}

/// Writes generated plans to the database atomically
pub struct PlanMaterializer {
    pool: SqlitePool,
}

impl PlanMaterializer {
    /// Create a new materializer over the shared pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a generated plan for the user, replacing any active plan
    ///
    /// The plan starts on `today` and ends 69 days later; each day's date is
    /// `today + (day_number - 1)`. Descriptors must already be sorted and
    /// contiguous (the parser guarantees this), but their count and day
    /// number range are re-checked before the first write.
    ///
    /// # Errors
    ///
    /// Returns a data integrity error if the descriptor count or a day
    /// number is out of range, or a database error if any step fails. No
    /// rows change on error.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn materialize(
        &self,
        user_id: Uuid,
        command: &GenerateTrainingPlanCommand,
        descriptors: &[DayDescriptor],
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<PlanWithDays> {
        if descriptors.len() != PLAN_LENGTH_DAYS as usize {
            return Err(AppError::integrity(format!(
                "Refusing to materialize {} descriptors, expected {PLAN_LENGTH_DAYS}",
                descriptors.len()
            )));
        }
        if let Some(bad) = descriptors
            .iter()
            .find(|d| d.day_number == 0 || d.day_number > PLAN_LENGTH_DAYS)
        {
            return Err(AppError::integrity(format!(
                "Refusing to materialize day number {}, expected 1-{PLAN_LENGTH_DAYS}",
                bad.day_number
            )));
        }

        let plan = new_plan_row(user_id, today, now)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        debug!(step = MaterializeStep::UpsertProfile.as_str(), "Materializing plan");
        profiles::upsert_in_tx(&mut tx, user_id, &command.profile, now).await?;

        debug!(step = MaterializeStep::ReplaceRecords.as_str(), "Materializing plan");
        personal_records::replace_all_in_tx(&mut tx, user_id, &command.personal_records, now)
            .await?;

        debug!(step = MaterializeStep::DeactivatePlan.as_str(), "Materializing plan");
        let replaced = plans::deactivate_active_in_tx(&mut tx, user_id).await?;

        debug!(step = MaterializeStep::InsertPlan.as_str(), "Materializing plan");
        plans::insert_plan_in_tx(&mut tx, &plan).await?;

        debug!(step = MaterializeStep::InsertDays.as_str(), "Materializing plan");
        for descriptor in descriptors {
            let day = new_day_row(&plan, descriptor)?;
            plans::insert_day_in_tx(&mut tx, &day).await?;
        }

        debug!(step = MaterializeStep::Refetch.as_str(), "Materializing plan");
        let result = plans::fetch_plan_with_days_in_tx(&mut tx, plan.id).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit plan: {e}")))?;

        info!(
            plan_id = %plan.id,
            start_date = %plan.start_date,
            end_date = %plan.end_date,
            replaced_previous = replaced,
            "Training plan materialized"
        );

        Ok(result)
    }
}

fn new_plan_row(user_id: Uuid, today: NaiveDate, now: DateTime<Utc>) -> AppResult<TrainingPlan> {
    let end_date = today
        .checked_add_days(Days::new(u64::from(PLAN_LENGTH_DAYS - 1)))
        .ok_or_else(|| AppError::internal("Plan end date out of range"))?;

    Ok(TrainingPlan {
        id: Uuid::new_v4(),
        user_id,
        start_date: today,
        end_date,
        is_active: true,
        generated_at: now,
    })
}

fn new_day_row(plan: &TrainingPlan, descriptor: &DayDescriptor) -> AppResult<WorkoutDay> {
    let date = plan
        .start_date
        .checked_add_days(Days::new(u64::from(descriptor.day_number - 1)))
        .ok_or_else(|| AppError::internal("Workout day date out of range"))?;

    Ok(WorkoutDay {
        id: Uuid::new_v4(),
        training_plan_id: plan.id,
        day_number: descriptor.day_number,
        date,
        workout_description: descriptor.workout_description.clone(),
        is_rest_day: descriptor.is_rest_day,
        is_completed: false,
        completed_at: None,
    })
}
