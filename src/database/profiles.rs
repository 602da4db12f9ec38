// ABOUTME: Database operations for survey-derived user profiles
// ABOUTME: One profile row per user, replaced wholesale on every plan generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Distance, Gender, GenerationProfile, Profile};

/// Database operations for user profiles
pub struct ProfilesManager {
    pool: SqlitePool,
}

impl ProfilesManager {
    /// Create a new profiles manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the profile for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let row = sqlx::query(
            r"
            SELECT user_id, goal_distance, weekly_km, training_days_per_week,
                   age, weight, height, gender, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get profile: {e}")))?;

        row.map(|r| row_to_profile(&r)).transpose()
    }
}

/// Insert or fully replace a user's profile inside an open transaction
///
/// # Errors
///
/// Returns an error if the database operation fails
pub(crate) async fn upsert_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: Uuid,
    profile: &GenerationProfile,
    now: DateTime<Utc>,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO profiles (
            user_id, goal_distance, weekly_km, training_days_per_week,
            age, weight, height, gender, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        ON CONFLICT(user_id) DO UPDATE SET
            goal_distance = excluded.goal_distance,
            weekly_km = excluded.weekly_km,
            training_days_per_week = excluded.training_days_per_week,
            age = excluded.age,
            weight = excluded.weight,
            height = excluded.height,
            gender = excluded.gender,
            updated_at = excluded.updated_at
        ",
    )
    .bind(user_id.to_string())
    .bind(profile.goal_distance.as_str())
    .bind(profile.weekly_km)
    .bind(i64::from(profile.training_days_per_week))
    .bind(i64::from(profile.age))
    .bind(profile.weight)
    .bind(i64::from(profile.height))
    .bind(profile.gender.as_str())
    .bind(now.to_rfc3339())
    .execute(&mut **tx)
    .await
    .map_err(|e| AppError::database(format!("Failed to upsert profile: {e}")))?;

    Ok(())
}

fn row_to_profile(row: &SqliteRow) -> AppResult<Profile> {
    let user_id_str: String = row.get("user_id");
    let goal_distance_str: String = row.get("goal_distance");
    let gender_str: String = row.get("gender");
    let training_days: i64 = row.get("training_days_per_week");
    let age: i64 = row.get("age");
    let height: i64 = row.get("height");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Ok(Profile {
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| AppError::integrity(format!("Invalid user id in profiles: {e}")))?,
        goal_distance: Distance::parse(&goal_distance_str).ok_or_else(|| {
            AppError::integrity(format!("Unknown goal distance: {goal_distance_str}"))
        })?,
        weekly_km: row.get("weekly_km"),
        training_days_per_week: training_days as u32,
        age: age as u32,
        weight: row.get("weight"),
        height: height as u32,
        gender: Gender::parse(&gender_str)
            .ok_or_else(|| AppError::integrity(format!("Unknown gender: {gender_str}")))?,
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

pub(crate) fn parse_timestamp(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::integrity(format!("Invalid datetime: {e}")))
}
