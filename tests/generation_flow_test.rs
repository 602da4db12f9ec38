// ABOUTME: Integration tests for the survey generation flow state machine
// ABOUTME: Confirmation gate, timeout handling, and retry transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use athletica::client::{
    run_with_timeout, GenerationEvent, GenerationFlow, GenerationState, WaitOutcome,
};

#[test]
fn test_submit_without_active_plan_goes_straight_to_generating() {
    let mut flow = GenerationFlow::new();
    assert!(flow.on_event(GenerationEvent::Submit));
    assert_eq!(flow.state(), &GenerationState::CheckingActivePlan);
    assert!(flow.on_event(GenerationEvent::NoActivePlan));
    assert_eq!(flow.state(), &GenerationState::Generating);
}

#[test]
fn test_cancel_keeps_existing_plan_untouched() {
    let mut flow = GenerationFlow::new();
    flow.on_event(GenerationEvent::Submit);
    flow.on_event(GenerationEvent::ActivePlanFound);
    assert_eq!(flow.state(), &GenerationState::AwaitingConfirmation);

    // Cancelling never reaches Generating, so no write can have happened.
    assert!(flow.on_event(GenerationEvent::CancelReplace));
    assert_eq!(flow.state(), &GenerationState::Idle);
}

#[test]
fn test_confirm_proceeds_to_generating() {
    let mut flow = GenerationFlow::new();
    flow.on_event(GenerationEvent::Submit);
    flow.on_event(GenerationEvent::ActivePlanFound);
    assert!(flow.on_event(GenerationEvent::ConfirmReplace));
    assert_eq!(flow.state(), &GenerationState::Generating);
}

#[test]
fn test_success_returns_to_idle() {
    let mut flow = GenerationFlow::new();
    flow.on_event(GenerationEvent::Submit);
    flow.on_event(GenerationEvent::NoActivePlan);
    assert!(flow.on_event(GenerationEvent::Succeeded));
    assert_eq!(flow.state(), &GenerationState::Idle);
}

#[test]
fn test_failure_carries_message_and_allows_retry() {
    let mut flow = GenerationFlow::new();
    flow.on_event(GenerationEvent::Submit);
    flow.on_event(GenerationEvent::NoActivePlan);
    flow.on_event(GenerationEvent::Failed("AI service unavailable".into()));
    assert_eq!(
        flow.state(),
        &GenerationState::Error("AI service unavailable".into())
    );

    assert!(flow.on_event(GenerationEvent::Retry));
    assert_eq!(flow.state(), &GenerationState::Generating);
}

#[test]
fn test_late_success_after_timeout_is_ignored() {
    let mut flow = GenerationFlow::new();
    flow.on_event(GenerationEvent::Submit);
    flow.on_event(GenerationEvent::NoActivePlan);
    flow.on_event(GenerationEvent::TimedOut);
    assert_eq!(flow.state(), &GenerationState::Timeout);

    // The request eventually succeeded server-side; the displayed state
    // must not change underneath the user.
    assert!(!flow.on_event(GenerationEvent::Succeeded));
    assert_eq!(flow.state(), &GenerationState::Timeout);

    assert!(flow.on_event(GenerationEvent::Close));
    assert_eq!(flow.state(), &GenerationState::Idle);
}

#[test]
fn test_events_out_of_context_are_ignored() {
    let mut flow = GenerationFlow::new();
    assert!(!flow.on_event(GenerationEvent::ConfirmReplace));
    assert!(!flow.on_event(GenerationEvent::Succeeded));
    assert_eq!(flow.state(), &GenerationState::Idle);
}

#[tokio::test]
async fn test_driver_maps_success() {
    let outcome = run_with_timeout(Duration::from_secs(1), async { Ok(()) }).await;
    assert_eq!(outcome.event(), GenerationEvent::Succeeded);
}

#[tokio::test]
async fn test_driver_maps_failure() {
    let outcome =
        run_with_timeout(Duration::from_secs(1), async { Err("boom".to_owned()) }).await;
    assert_eq!(outcome.event(), GenerationEvent::Failed("boom".into()));
}

#[tokio::test(start_paused = true)]
async fn test_driver_times_out_slow_requests() {
    let slow = async {
        tokio::time::sleep(Duration::from_secs(120)).await;
        Ok(())
    };
    let outcome = run_with_timeout(Duration::from_secs(60), slow).await;
    assert_eq!(outcome.event(), GenerationEvent::TimedOut);
}

#[tokio::test(start_paused = true)]
async fn test_driver_does_not_cancel_the_request_on_timeout() {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();
    let slow = async move {
        tokio::time::sleep(Duration::from_secs(120)).await;
        flag.store(true, Ordering::SeqCst);
        Ok(())
    };

    let outcome = run_with_timeout(Duration::from_secs(60), slow).await;
    let WaitOutcome::TimedOut(pending) = outcome else {
        panic!("expected the wait bound to elapse");
    };
    assert!(!finished.load(Ordering::SeqCst));

    let mut flow = GenerationFlow::new();
    flow.on_event(GenerationEvent::Submit);
    flow.on_event(GenerationEvent::NoActivePlan);
    flow.on_event(GenerationEvent::TimedOut);
    assert_eq!(flow.state(), &GenerationState::Timeout);

    // The detached request ran to completion after the timeout was shown;
    // its late success reaches the flow and changes nothing.
    let late = pending.late_event().await;
    assert!(finished.load(Ordering::SeqCst));
    assert_eq!(late, GenerationEvent::Succeeded);
    assert!(!flow.on_event(late));
    assert_eq!(flow.state(), &GenerationState::Timeout);
}
