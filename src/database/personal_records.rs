// ABOUTME: Database operations for personal best race times
// ABOUTME: Wholesale replacement during generation plus per-record mutations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use super::profiles::parse_timestamp;
use crate::errors::{AppError, AppResult};
use crate::models::{Distance, PersonalRecord, RecordInput};

/// Database operations for personal records
pub struct PersonalRecordsManager {
    pool: SqlitePool,
}

impl PersonalRecordsManager {
    /// Create a new personal records manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all personal records for a user, ordered by creation time
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<PersonalRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, distance, time_seconds, created_at
            FROM personal_records
            WHERE user_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list personal records: {e}")))?;

        rows.iter().map(row_to_personal_record).collect()
    }

    /// Insert a single personal record for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn insert(
        &self,
        user_id: Uuid,
        record: &RecordInput,
        now: DateTime<Utc>,
    ) -> AppResult<PersonalRecord> {
        let created = PersonalRecord {
            id: Uuid::new_v4(),
            user_id,
            distance: record.distance,
            time_seconds: record.time_seconds,
            created_at: now,
        };

        sqlx::query(
            r"
            INSERT INTO personal_records (id, user_id, distance, time_seconds, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(created.id.to_string())
        .bind(created.user_id.to_string())
        .bind(created.distance.as_str())
        .bind(i64::from(created.time_seconds))
        .bind(created.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert personal record: {e}")))?;

        Ok(created)
    }

    /// Delete a personal record owned by the user
    ///
    /// An id that does not exist, or that belongs to another user, matches
    /// no row and the call is a no-op. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, user_id: Uuid, record_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM personal_records WHERE id = $1 AND user_id = $2")
            .bind(record_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete personal record: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Replace a user's entire record set inside an open transaction
///
/// # Errors
///
/// Returns an error if the database operation fails
pub(crate) async fn replace_all_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: Uuid,
    records: &[RecordInput],
    now: DateTime<Utc>,
) -> AppResult<()> {
    sqlx::query("DELETE FROM personal_records WHERE user_id = $1")
        .bind(user_id.to_string())
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to clear personal records: {e}")))?;

    for record in records {
        sqlx::query(
            r"
            INSERT INTO personal_records (id, user_id, distance, time_seconds, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(record.distance.as_str())
        .bind(i64::from(record.time_seconds))
        .bind(now.to_rfc3339())
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert personal record: {e}")))?;
    }

    Ok(())
}

fn row_to_personal_record(row: &SqliteRow) -> AppResult<PersonalRecord> {
    let id_str: String = row.get("id");
    let user_id_str: String = row.get("user_id");
    let distance_str: String = row.get("distance");
    let time_seconds: i64 = row.get("time_seconds");
    let created_at_str: String = row.get("created_at");

    Ok(PersonalRecord {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::integrity(format!("Invalid record id: {e}")))?,
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| AppError::integrity(format!("Invalid user id in records: {e}")))?,
        distance: Distance::parse(&distance_str)
            .ok_or_else(|| AppError::integrity(format!("Unknown distance: {distance_str}")))?,
        time_seconds: time_seconds as u32,
        created_at: parse_timestamp(&created_at_str)?,
    })
}
