// ABOUTME: Generation flow state machine for the survey page
// ABOUTME: Confirmation gate, 60-second wait bound, and retry transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # Generation Flow
//!
//! Submitting the survey walks through an explicit state machine: an active
//! plan must be confirmed away before generation starts, and the wait on the
//! generation request is bounded so the page never shows an indefinite
//! spinner. Transitions are pure; the async driver only turns a future's
//! outcome into an event.
//!
//! The timeout does not cancel the server-side request: the driver detaches
//! it onto the runtime and only stops waiting. A success that arrives after
//! the timeout was shown is simply ignored: `Succeeded` is not a valid event
//! in the `Timeout` state.

use std::time::Duration;

use tracing::debug;

/// States of the generation flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    /// Nothing in progress
    Idle,
    /// Survey submitted, probing for an active plan
    CheckingActivePlan,
    /// An active plan exists; waiting for the user to confirm replacement
    AwaitingConfirmation,
    /// Generation request in flight
    Generating,
    /// Generation failed; user may retry or close
    Error(String),
    /// The wait bound elapsed; user may retry or close
    Timeout,
}

/// Events driving the generation flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    /// User submitted the survey
    Submit,
    /// The probe found an active plan
    ActivePlanFound,
    /// The probe found no active plan
    NoActivePlan,
    /// User confirmed replacing the active plan
    ConfirmReplace,
    /// User cancelled; the existing plan stays untouched
    CancelReplace,
    /// Generation finished; the dashboard should be shown
    Succeeded,
    /// Generation failed with a user-facing message
    Failed(String),
    /// The wait bound elapsed with no answer
    TimedOut,
    /// User chose to retry from an error or timeout
    Retry,
    /// User dismissed the error or timeout dialog
    Close,
}

/// Generation flow state machine
#[derive(Debug)]
pub struct GenerationFlow {
    state: GenerationState,
}

impl Default for GenerationFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationFlow {
    /// Create a flow in the idle state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GenerationState::Idle,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Apply an event; returns false when the event is not valid in the
    /// current state and was ignored
    pub fn on_event(&mut self, event: GenerationEvent) -> bool {
        match Self::next(&self.state, &event) {
            Some(next) => {
                debug!(from = ?self.state, to = ?next, "Generation flow transition");
                self.state = next;
                true
            }
            None => {
                debug!(state = ?self.state, event = ?event, "Generation flow event ignored");
                false
            }
        }
    }

    /// Pure transition function; `None` means the event is ignored
    fn next(state: &GenerationState, event: &GenerationEvent) -> Option<GenerationState> {
        match (state, event) {
            (GenerationState::Idle, GenerationEvent::Submit) => {
                Some(GenerationState::CheckingActivePlan)
            }
            (GenerationState::CheckingActivePlan, GenerationEvent::ActivePlanFound) => {
                Some(GenerationState::AwaitingConfirmation)
            }
            (GenerationState::CheckingActivePlan, GenerationEvent::NoActivePlan)
            | (GenerationState::AwaitingConfirmation, GenerationEvent::ConfirmReplace)
            | (
                GenerationState::Error(_) | GenerationState::Timeout,
                GenerationEvent::Retry,
            ) => Some(GenerationState::Generating),
            (GenerationState::AwaitingConfirmation, GenerationEvent::CancelReplace)
            | (GenerationState::Generating, GenerationEvent::Succeeded)
            | (
                GenerationState::Error(_) | GenerationState::Timeout,
                GenerationEvent::Close,
            ) => Some(GenerationState::Idle),
            (GenerationState::Generating, GenerationEvent::Failed(message)) => {
                Some(GenerationState::Error(message.clone()))
            }
            (GenerationState::Generating, GenerationEvent::TimedOut) => {
                Some(GenerationState::Timeout)
            }
            _ => None,
        }
    }
}

/// A generation request detached onto the runtime
///
/// The wait bound elapsing does not cancel the request; it keeps running
/// and [`PendingGeneration::late_event`] yields its eventual outcome as an
/// event, which the flow ignores in the `Timeout` state.
#[derive(Debug)]
pub struct PendingGeneration {
    handle: tokio::task::JoinHandle<Result<(), String>>,
}

impl PendingGeneration {
    /// Await the detached request's eventual outcome
    pub async fn late_event(self) -> GenerationEvent {
        settle(self.handle.await)
    }
}

/// Outcome of waiting on a generation request under the flow's wait bound
#[derive(Debug)]
pub enum WaitOutcome {
    /// The request settled within the bound
    Settled(GenerationEvent),
    /// The bound elapsed; the request keeps running detached
    TimedOut(PendingGeneration),
}

impl WaitOutcome {
    /// The event to feed the flow right away
    #[must_use]
    pub fn event(&self) -> GenerationEvent {
        match self {
            Self::Settled(event) => event.clone(),
            Self::TimedOut(_) => GenerationEvent::TimedOut,
        }
    }
}

fn settle(outcome: Result<Result<(), String>, tokio::task::JoinError>) -> GenerationEvent {
    match outcome {
        Ok(Ok(())) => GenerationEvent::Succeeded,
        Ok(Err(message)) => GenerationEvent::Failed(message),
        Err(e) => GenerationEvent::Failed(format!("Generation task failed: {e}")),
    }
}

/// Await a generation request under the flow's wait bound
///
/// The request is spawned onto the runtime before the wait starts, so the
/// bound elapsing only stops the wait. On timeout the returned
/// [`WaitOutcome::TimedOut`] carries the still-running request.
pub async fn run_with_timeout<F>(bound: Duration, request: F) -> WaitOutcome
where
    F: std::future::Future<Output = Result<(), String>> + Send + 'static,
{
    let mut handle = tokio::spawn(request);
    match tokio::time::timeout(bound, &mut handle).await {
        Ok(outcome) => WaitOutcome::Settled(settle(outcome)),
        Err(_) => WaitOutcome::TimedOut(PendingGeneration { handle }),
    }
}
