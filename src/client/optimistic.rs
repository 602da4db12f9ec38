// ABOUTME: Optimistic completion toggling for the dashboard workout board
// ABOUTME: Snapshot-based rollback with per-day pending guards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # Optimistic Toggle Controller
//!
//! Checkbox clicks flip local state immediately and reconcile with the
//! server afterwards. Each day carries a pending flag; a second toggle for
//! the same day while one is in flight is rejected locally, while different
//! days may mutate concurrently. On failure the pre-toggle snapshot is
//! restored exactly, including `completed_at`.
//!
//! A toggle runs in three phases so the board is not borrowed across the
//! network await:
//!
//! 1. [`ToggleController::begin`] validates and applies the optimistic flip
//! 2. the caller awaits [`WorkoutApi::set_completed`]
//! 3. [`ToggleController::resolve`] adopts the server value or rolls back

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{CompletionStats, PlanWithDays, WorkoutDay};
use crate::stats::calculate_completion_stats;

/// Why a persistence attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleFailure {
    /// Session expired or token rejected
    Unauthorized,
    /// Day does not exist or belongs to another user
    NotFound,
    /// Server refused to complete a rest day
    RestDay,
    /// Server-side failure
    Server(String),
    /// Request never reached the server
    Network(String),
}

impl ToggleFailure {
    /// Transient notice shown to the user after a rollback
    #[must_use]
    pub const fn notice(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Sesja wygasła. Zaloguj się ponownie.",
            Self::NotFound => "Nie znaleziono dnia treningowego.",
            Self::RestDay => "Dnia odpoczynku nie można oznaczyć jako ukończonego.",
            Self::Server(_) | Self::Network(_) => {
                "Nie udało się zapisać zmiany. Spróbuj ponownie."
            }
        }
    }
}

/// Persistence boundary the controller talks to
#[async_trait]
pub trait WorkoutApi: Send + Sync {
    /// Persist a day's completion state
    ///
    /// Returns the server-confirmed day when the backend echoes it, `None`
    /// when the write succeeded without a body.
    ///
    /// # Errors
    ///
    /// Returns a [`ToggleFailure`] classifying what went wrong
    async fn set_completed(
        &self,
        day_id: Uuid,
        is_completed: bool,
    ) -> Result<Option<WorkoutDay>, ToggleFailure>;
}

struct BoardEntry {
    day: WorkoutDay,
    pending: bool,
}

/// Per-day state container owned by the dashboard view
pub struct WorkoutBoard {
    entries: HashMap<Uuid, BoardEntry>,
    order: Vec<Uuid>,
    end_date: NaiveDate,
}

impl WorkoutBoard {
    /// Build a board from a fetched plan
    #[must_use]
    pub fn new(plan: &PlanWithDays) -> Self {
        let order = plan.workout_days.iter().map(|d| d.id).collect();
        let entries = plan
            .workout_days
            .iter()
            .map(|d| {
                (
                    d.id,
                    BoardEntry {
                        day: d.clone(),
                        pending: false,
                    },
                )
            })
            .collect();

        Self {
            entries,
            order,
            end_date: plan.plan.end_date,
        }
    }

    /// Look up a day by id
    #[must_use]
    pub fn day(&self, day_id: Uuid) -> Option<&WorkoutDay> {
        self.entries.get(&day_id).map(|e| &e.day)
    }

    /// Whether a toggle is in flight for this day
    #[must_use]
    pub fn is_pending(&self, day_id: Uuid) -> bool {
        self.entries.get(&day_id).is_some_and(|e| e.pending)
    }

    /// All days in plan order
    pub fn days(&self) -> impl Iterator<Item = &WorkoutDay> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|e| &e.day))
    }

    /// Completion statistics over the board's current local state
    #[must_use]
    pub fn stats(&self, today: NaiveDate) -> CompletionStats {
        let days: Vec<WorkoutDay> = self.days().cloned().collect();
        calculate_completion_stats(&days, self.end_date, today)
    }
}

/// An optimistic flip applied locally, awaiting server resolution
#[derive(Debug)]
pub struct PendingToggle {
    /// Day being toggled
    pub day_id: Uuid,
    /// Completion state being requested
    pub target: bool,
    snapshot: WorkoutDay,
}

/// Outcome of a toggle attempt
#[derive(Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Rest days are never toggleable; no request was made
    RestDayRejected,
    /// A toggle for this day is already in flight; no request was made
    AlreadyPending,
    /// The server accepted the write
    Confirmed,
    /// The write failed; the snapshot was restored
    RolledBack(ToggleFailure),
    /// The session is gone; state was rolled back and the caller should
    /// redirect to sign-in
    SessionExpired,
}

/// Drives optimistic toggles against a [`WorkoutApi`]
pub struct ToggleController<A: WorkoutApi> {
    api: A,
}

impl<A: WorkoutApi> ToggleController<A> {
    /// Create a controller over the given API
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Phase 1: validate and apply the optimistic flip
    ///
    /// # Errors
    ///
    /// Returns the local rejection when the day is unknown, a rest day, or
    /// already pending; nothing was changed and no request should be made.
    pub fn begin(
        board: &mut WorkoutBoard,
        day_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PendingToggle, ToggleOutcome> {
        let Some(entry) = board.entries.get_mut(&day_id) else {
            return Err(ToggleOutcome::RolledBack(ToggleFailure::NotFound));
        };
        if entry.day.is_rest_day {
            return Err(ToggleOutcome::RestDayRejected);
        }
        if entry.pending {
            return Err(ToggleOutcome::AlreadyPending);
        }

        let snapshot = entry.day.clone();
        let target = !entry.day.is_completed;
        entry.day.is_completed = target;
        entry.day.completed_at = target.then_some(now);
        entry.pending = true;

        Ok(PendingToggle {
            day_id,
            target,
            snapshot,
        })
    }

    /// Phase 3: reconcile the server's answer with the board
    pub fn resolve(
        board: &mut WorkoutBoard,
        pending: PendingToggle,
        result: Result<Option<WorkoutDay>, ToggleFailure>,
    ) -> ToggleOutcome {
        let Some(entry) = board.entries.get_mut(&pending.day_id) else {
            return ToggleOutcome::RolledBack(ToggleFailure::NotFound);
        };
        entry.pending = false;

        match result {
            Ok(confirmed) => {
                // Server value is authoritative when echoed back.
                if let Some(day) = confirmed {
                    entry.day = day;
                }
                ToggleOutcome::Confirmed
            }
            Err(failure) => {
                entry.day = pending.snapshot;
                if failure == ToggleFailure::Unauthorized {
                    ToggleOutcome::SessionExpired
                } else {
                    ToggleOutcome::RolledBack(failure)
                }
            }
        }
    }

    /// Run a full toggle: flip locally, persist, reconcile
    pub async fn toggle(
        &self,
        board: &mut WorkoutBoard,
        day_id: Uuid,
        now: DateTime<Utc>,
    ) -> ToggleOutcome {
        let pending = match Self::begin(board, day_id, now) {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };

        let result = self.api.set_completed(pending.day_id, pending.target).await;
        Self::resolve(board, pending, result)
    }
}
