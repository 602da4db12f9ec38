// ABOUTME: Integration tests for completion statistics derivation
// ABOUTME: Covers percentages, zero guards, and both completion reasons
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

#![allow(clippy::unwrap_used, clippy::expect_used)]

use athletica::models::{PlanCompletionReason, WorkoutDay};
use athletica::stats::calculate_completion_stats;
use chrono::{Days, NaiveDate, Utc};
use uuid::Uuid;

fn day(day_number: u32, is_rest_day: bool, is_completed: bool) -> WorkoutDay {
    let date = NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .checked_add_days(Days::new(u64::from(day_number - 1)))
        .unwrap();
    WorkoutDay {
        id: Uuid::new_v4(),
        training_plan_id: Uuid::new_v4(),
        day_number,
        date,
        workout_description: if is_rest_day {
            "Odpoczynek".to_owned()
        } else {
            "Bieg 8 km".to_owned()
        },
        is_rest_day,
        is_completed,
        completed_at: is_completed.then(Utc::now),
    }
}

#[test]
fn test_week_with_rest_day_fully_completed() {
    // Days 1-6 trained and done, day 7 rest.
    let mut days: Vec<WorkoutDay> = (1..=6).map(|n| day(n, false, true)).collect();
    days.push(day(7, true, false));

    let end_date = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
    let stats = calculate_completion_stats(&days, end_date, today);

    assert_eq!(stats.total_workouts, 6);
    assert_eq!(stats.completed_workouts, 6);
    assert_eq!(stats.total_rest_days, 1);
    assert_eq!(stats.completion_percentage, 100);
    assert!(stats.is_plan_completed);
    assert_eq!(
        stats.completion_reason,
        Some(PlanCompletionReason::AllWorkoutsDone)
    );
}

#[test]
fn test_fresh_plan_reports_zero_progress() {
    let days: Vec<WorkoutDay> = (1..=70)
        .map(|n| day(n, n % 7 == 0, false))
        .collect();

    let end_date = NaiveDate::from_ymd_opt(2025, 8, 9).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let stats = calculate_completion_stats(&days, end_date, today);

    assert_eq!(stats.total_workouts, 60);
    assert_eq!(stats.completed_workouts, 0);
    assert_eq!(stats.total_rest_days, 10);
    assert_eq!(stats.completion_percentage, 0);
    assert!(!stats.is_plan_completed);
    assert_eq!(stats.completion_reason, None);
}

#[test]
fn test_percentage_is_rounded() {
    let days = vec![
        day(1, false, true),
        day(2, false, false),
        day(3, false, false),
    ];

    let end_date = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let stats = calculate_completion_stats(&days, end_date, today);

    // 1/3 rounds to 33, not truncates to 33.33.
    assert_eq!(stats.completion_percentage, 33);

    let days = vec![
        day(1, false, true),
        day(2, false, true),
        day(3, false, false),
    ];
    let stats = calculate_completion_stats(&days, end_date, today);
    assert_eq!(stats.completion_percentage, 67);
}

#[test]
fn test_all_rest_days_guard_against_division_by_zero() {
    let days = vec![day(1, true, false), day(2, true, false)];

    let end_date = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let stats = calculate_completion_stats(&days, end_date, today);

    assert_eq!(stats.total_workouts, 0);
    assert_eq!(stats.completion_percentage, 0);
    // Zero workouts leaves nothing to do, so the plan counts as completed.
    assert!(stats.is_plan_completed);
    assert_eq!(
        stats.completion_reason,
        Some(PlanCompletionReason::AllWorkoutsDone)
    );
}

#[test]
fn test_elapsed_end_date_completes_unfinished_plan() {
    let days = vec![
        day(1, false, true),
        day(2, false, false),
        day(3, true, false),
    ];

    let end_date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let stats = calculate_completion_stats(&days, end_date, today);

    assert_eq!(stats.completion_percentage, 50);
    assert!(stats.is_plan_completed);
    assert_eq!(
        stats.completion_reason,
        Some(PlanCompletionReason::EndDatePassed)
    );
}

#[test]
fn test_end_date_today_is_not_elapsed() {
    let days = vec![day(1, false, false)];

    let today = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
    let stats = calculate_completion_stats(&days, today, today);

    assert!(!stats.is_plan_completed);
    assert_eq!(stats.completion_reason, None);
}
