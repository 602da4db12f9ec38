// ABOUTME: Client-side engine for the training dashboard
// ABOUTME: Optimistic completion toggling and the generation confirmation flow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # Dashboard Client Engine
//!
//! UI-facing state machines that are independent of any rendering layer.
//! The dashboard view owns a [`WorkoutBoard`] for its lifetime and drives it
//! through a [`ToggleController`]; the survey page drives a
//! [`GenerationFlow`]. Both make their transitions through pure functions so
//! every path is testable without a network.

pub mod generation;
pub mod optimistic;

pub use generation::{
    run_with_timeout, GenerationEvent, GenerationFlow, GenerationState, PendingGeneration,
    WaitOutcome,
};
pub use optimistic::{
    PendingToggle, ToggleController, ToggleFailure, ToggleOutcome, WorkoutApi, WorkoutBoard,
};
