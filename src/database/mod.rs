// ABOUTME: SQLite connection management and schema migrations
// ABOUTME: Owns the pool handed to the per-table manager types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # Database Management
//!
//! Connection and schema setup for the training-plan store, plus thin
//! per-table managers:
//!
//! - [`ProfilesManager`] for the survey-derived profile
//! - [`PersonalRecordsManager`] for race personal bests
//! - [`PlansManager`] for training plans and their workout days
//!
//! Multi-row writes that must be atomic (plan materialization) go through
//! [`crate::materializer::PlanMaterializer`] instead, which drives its own
//! transaction over the same pool.

pub(crate) mod personal_records;
pub(crate) mod plans;
pub(crate) mod profiles;

pub use personal_records::PersonalRecordsManager;
pub use plans::PlansManager;
pub use profiles::ProfilesManager;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};

use crate::errors::{AppError, AppResult};

/// Database handle wrapping the SQLite pool
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to SQLite and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or any migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let pool = if database_url.contains(":memory:") {
            // Every pooled connection to :memory: is a distinct database;
            // a single connection keeps the schema visible to all queries.
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect(database_url)
                .await
        } else if database_url.starts_with("sqlite:") {
            // Ensure SQLite creates the database file if it doesn't exist
            SqlitePool::connect(&format!("{database_url}?mode=rwc")).await
        } else {
            SqlitePool::connect(database_url).await
        }
        .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the underlying pool
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Profiles manager over the shared pool
    #[must_use]
    pub fn profiles(&self) -> ProfilesManager {
        ProfilesManager::new(self.pool.clone())
    }

    /// Personal records manager over the shared pool
    #[must_use]
    pub fn personal_records(&self) -> PersonalRecordsManager {
        PersonalRecordsManager::new(self.pool.clone())
    }

    /// Plans manager over the shared pool
    #[must_use]
    pub fn plans(&self) -> PlansManager {
        PlansManager::new(self.pool.clone())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_profiles().await?;
        self.migrate_personal_records().await?;
        self.migrate_training_plans().await?;
        self.migrate_workout_days().await?;
        Ok(())
    }

    async fn migrate_profiles(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                goal_distance TEXT NOT NULL,
                weekly_km REAL NOT NULL,
                training_days_per_week INTEGER NOT NULL,
                age INTEGER NOT NULL,
                weight REAL NOT NULL,
                height INTEGER NOT NULL,
                gender TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_personal_records(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS personal_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                distance TEXT NOT NULL,
                time_seconds INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_personal_records_user
             ON personal_records(user_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_training_plans(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS training_plans (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                generated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Backstop for the one-active-plan rule; the materializer deactivates
        // the previous plan in the same transaction that inserts the new one.
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_training_plans_one_active
             ON training_plans(user_id) WHERE is_active = 1",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_workout_days(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_days (
                id TEXT PRIMARY KEY,
                training_plan_id TEXT NOT NULL REFERENCES training_plans(id) ON DELETE CASCADE,
                day_number INTEGER NOT NULL,
                date TEXT NOT NULL,
                workout_description TEXT NOT NULL,
                is_rest_day BOOLEAN NOT NULL DEFAULT 0,
                is_completed BOOLEAN NOT NULL DEFAULT 0,
                completed_at TEXT,
                UNIQUE(training_plan_id, day_number),
                CHECK (NOT (is_rest_day AND is_completed))
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workout_days_plan
             ON workout_days(training_plan_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
