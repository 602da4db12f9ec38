// ABOUTME: Database operations for training plans and their workout days
// ABOUTME: Covers active-plan reads and the dashboard completion toggle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::info;
use uuid::Uuid;

use super::profiles::parse_timestamp;
use crate::errors::{AppError, AppResult};
use crate::models::{PlanWithDays, TrainingPlan, WorkoutDay, PLAN_LENGTH_DAYS};

/// Database operations for training plans and workout days
pub struct PlansManager {
    pool: SqlitePool,
}

impl PlansManager {
    /// Create a new plans manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check whether the user has an active plan
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn has_active_plan(&self, user_id: Uuid) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM training_plans WHERE user_id = $1 AND is_active = 1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check active plan: {e}")))?;

        Ok(row.is_some())
    }

    /// Get the user's active plan with all of its workout days
    ///
    /// Returns `None` when the user has no active plan. A plan whose day set
    /// is not exactly the expected length, or whose days carry inconsistent
    /// completion fields, is reported as a data integrity failure rather
    /// than served as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or the plan's day
    /// records are incomplete
    pub async fn get_active_with_days(&self, user_id: Uuid) -> AppResult<Option<PlanWithDays>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, start_date, end_date, is_active, generated_at
            FROM training_plans
            WHERE user_id = $1 AND is_active = 1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get active plan: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let plan = row_to_plan(&row)?;

        let day_rows = sqlx::query(
            r"
            SELECT id, training_plan_id, day_number, date, workout_description,
                   is_rest_day, is_completed, completed_at
            FROM workout_days
            WHERE training_plan_id = $1
            ORDER BY day_number ASC
            ",
        )
        .bind(plan.id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get workout days: {e}")))?;

        let workout_days: Vec<WorkoutDay> =
            day_rows.iter().map(row_to_workout_day).collect::<AppResult<_>>()?;

        if workout_days.len() != PLAN_LENGTH_DAYS as usize {
            return Err(AppError::integrity(format!(
                "Plan {} has {} workout days, expected {PLAN_LENGTH_DAYS}",
                plan.id,
                workout_days.len()
            ))
            .with_resource_id(plan.id.to_string()));
        }

        Ok(Some(PlanWithDays { plan, workout_days }))
    }

    /// Set the completion state of a workout day owned by the given user
    ///
    /// Writing the value already stored is a no-op that returns the current
    /// row, so replayed toggles cannot flip state twice.
    ///
    /// # Errors
    ///
    /// - `WORKOUT_DAY_NOT_FOUND` when no day with this id belongs to the user
    /// - `REST_DAY_COMPLETION_NOT_ALLOWED` when completing a rest day
    /// - a database error if any query fails
    pub async fn set_day_completion(
        &self,
        day_id: Uuid,
        user_id: Uuid,
        is_completed: bool,
        now: DateTime<Utc>,
    ) -> AppResult<WorkoutDay> {
        // Ownership is enforced in the lookup, not in the update, so a
        // foreign id and a missing id are indistinguishable to the caller.
        let row = sqlx::query(
            r"
            SELECT wd.id, wd.training_plan_id, wd.day_number, wd.date,
                   wd.workout_description, wd.is_rest_day, wd.is_completed, wd.completed_at
            FROM workout_days wd
            JOIN training_plans tp ON tp.id = wd.training_plan_id
            WHERE wd.id = $1 AND tp.user_id = $2
            ",
        )
        .bind(day_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get workout day: {e}")))?;

        let Some(row) = row else {
            return Err(AppError::workout_day_not_found()
                .with_user_id(user_id)
                .with_resource_id(day_id.to_string()));
        };
        let mut day = row_to_workout_day(&row)?;

        if day.is_rest_day && is_completed {
            return Err(AppError::rest_day_completion().with_resource_id(day_id.to_string()));
        }

        if day.is_completed == is_completed {
            return Ok(day);
        }

        let completed_at = is_completed.then_some(now);
        sqlx::query(
            r"
            UPDATE workout_days
            SET is_completed = $1, completed_at = $2
            WHERE id = $3
            ",
        )
        .bind(is_completed)
        .bind(completed_at.map(|t| t.to_rfc3339()))
        .bind(day_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update workout day: {e}")))?;

        info!(
            day_id = %day_id,
            day_number = day.day_number,
            is_completed,
            "Workout day completion updated"
        );

        day.is_completed = is_completed;
        day.completed_at = completed_at;
        Ok(day)
    }
}

// ============================================================================
// Transactional helpers for plan materialization
// ============================================================================

/// Deactivate the user's currently active plan, if any
///
/// # Errors
///
/// Returns an error if the database operation fails
pub(crate) async fn deactivate_active_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: Uuid,
) -> AppResult<bool> {
    let result = sqlx::query(
        "UPDATE training_plans SET is_active = 0 WHERE user_id = $1 AND is_active = 1",
    )
    .bind(user_id.to_string())
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::database(format!("Failed to deactivate plan: {e}")))?;

    Ok(result.rows_affected() > 0)
}

/// Insert a new active plan row
///
/// # Errors
///
/// Returns an error if the database operation fails
pub(crate) async fn insert_plan_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    plan: &TrainingPlan,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO training_plans (id, user_id, start_date, end_date, is_active, generated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(plan.id.to_string())
    .bind(plan.user_id.to_string())
    .bind(plan.start_date.to_string())
    .bind(plan.end_date.to_string())
    .bind(plan.is_active)
    .bind(plan.generated_at.to_rfc3339())
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::database(format!("Failed to insert plan: {e}")))?;

    Ok(())
}

/// Insert one workout day row
///
/// # Errors
///
/// Returns an error if the database operation fails
pub(crate) async fn insert_day_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    day: &WorkoutDay,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO workout_days (
            id, training_plan_id, day_number, date,
            workout_description, is_rest_day, is_completed, completed_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ",
    )
    .bind(day.id.to_string())
    .bind(day.training_plan_id.to_string())
    .bind(i64::from(day.day_number))
    .bind(day.date.to_string())
    .bind(&day.workout_description)
    .bind(day.is_rest_day)
    .bind(day.is_completed)
    .bind(day.completed_at.map(|t| t.to_rfc3339()))
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::database(format!("Failed to insert workout day: {e}")))?;

    Ok(())
}

/// Refetch a plan with its days inside an open transaction, ordered by
/// `day_number`
///
/// # Errors
///
/// Returns an error if the database operation fails or the plan is missing
pub(crate) async fn fetch_plan_with_days_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    plan_id: Uuid,
) -> AppResult<PlanWithDays> {
    let row = sqlx::query(
        r"
        SELECT id, user_id, start_date, end_date, is_active, generated_at
        FROM training_plans
        WHERE id = $1
        ",
    )
    .bind(plan_id.to_string())
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| AppError::database(format!("Failed to refetch plan: {e}")))?
    .ok_or_else(|| AppError::integrity(format!("Plan {plan_id} vanished during creation")))?;

    let plan = row_to_plan(&row)?;

    let day_rows = sqlx::query(
        r"
        SELECT id, training_plan_id, day_number, date, workout_description,
               is_rest_day, is_completed, completed_at
        FROM workout_days
        WHERE training_plan_id = $1
        ORDER BY day_number ASC
        ",
    )
    .bind(plan_id.to_string())
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| AppError::database(format!("Failed to refetch workout days: {e}")))?;

    let workout_days = day_rows.iter().map(row_to_workout_day).collect::<AppResult<_>>()?;

    Ok(PlanWithDays { plan, workout_days })
}

// ============================================================================
// Row mappers
// ============================================================================

fn row_to_plan(row: &SqliteRow) -> AppResult<TrainingPlan> {
    let id_str: String = row.get("id");
    let user_id_str: String = row.get("user_id");
    let start_date_str: String = row.get("start_date");
    let end_date_str: String = row.get("end_date");
    let generated_at_str: String = row.get("generated_at");

    Ok(TrainingPlan {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::integrity(format!("Invalid plan id: {e}")))?,
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| AppError::integrity(format!("Invalid user id in plans: {e}")))?,
        start_date: parse_date(&start_date_str)?,
        end_date: parse_date(&end_date_str)?,
        is_active: row.get("is_active"),
        generated_at: parse_timestamp(&generated_at_str)?,
    })
}

fn row_to_workout_day(row: &SqliteRow) -> AppResult<WorkoutDay> {
    let id_str: String = row.get("id");
    let plan_id_str: String = row.get("training_plan_id");
    let day_number: i64 = row.get("day_number");
    let date_str: String = row.get("date");
    let completed_at_str: Option<String> = row.get("completed_at");

    let day = WorkoutDay {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::integrity(format!("Invalid workout day id: {e}")))?,
        training_plan_id: Uuid::parse_str(&plan_id_str)
            .map_err(|e| AppError::integrity(format!("Invalid plan id in workout days: {e}")))?,
        day_number: day_number as u32,
        date: parse_date(&date_str)?,
        workout_description: row.get("workout_description"),
        is_rest_day: row.get("is_rest_day"),
        is_completed: row.get("is_completed"),
        completed_at: completed_at_str.as_deref().map(parse_timestamp).transpose()?,
    };

    // An inconsistent row is reported, never served.
    day.check_invariants()?;
    Ok(day)
}

fn parse_date(s: &str) -> AppResult<NaiveDate> {
    s.parse()
        .map_err(|e| AppError::integrity(format!("Invalid date: {e}")))
}
