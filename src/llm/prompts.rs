// ABOUTME: Prompt construction for 10-week running plan generation
// ABOUTME: Embeds profile, rest-day distribution, and personal record paces
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! Prompt builder for the plan-generation request.
//!
//! Workout descriptions are requested in Polish, the product's user-facing
//! language; rest days carry the fixed label "Odpoczynek".

use std::fmt::Write as _;

use crate::models::{GenerationProfile, RecordInput};

/// System message pinning the model to JSON-only output
pub(super) const SYSTEM_PROMPT: &str = "You are an expert running coach creating personalized \
    training plans. You MUST respond ONLY with valid JSON in the exact format requested. Do not \
    ask questions, do not provide explanations, do not use markdown formatting. Output ONLY the \
    JSON object.";

/// Format a record time as M:SS for prompt context
fn format_record(record: &RecordInput) -> String {
    let minutes = record.time_seconds / 60;
    let seconds = record.time_seconds % 60;
    format!("{}: {minutes}:{seconds:02}", record.distance.as_str())
}

/// Build the user prompt for a 70-day progressive plan
#[must_use]
pub fn build_plan_prompt(profile: &GenerationProfile, personal_records: &[RecordInput]) -> String {
    let rest_days_per_week = 7 - profile.training_days_per_week;
    let formatted_records = personal_records
        .iter()
        .map(format_record)
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = String::new();
    let _ = write!(
        prompt,
        "Generate a 10-week (70-day) progressive running training plan in JSON format for a runner.

USER PROFILE:
- Goal: {goal}
- Current weekly volume: {weekly_km} km
- Training days per week: {training_days}
- Rest days per week: {rest_days}
- Age: {age}, Weight: {weight}kg, Height: {height}cm, Gender: {gender}
- Personal Records: {records}

REQUIREMENTS:
1. Create exactly 70 days (10 weeks = 70 days total)
2. Include {rest_days} rest days per week, distributed evenly throughout the week
3. Progressive training: start at or slightly below current volume, build gradually
4. Include variety: easy runs, intervals, tempo runs, long runs, recovery runs
5. Peak training volume in weeks 8-9, then taper in week 10
6. For rest days: use workout_description = \"Odpoczynek\" and is_rest_day = true
7. For training days: provide detailed workout description in Polish language and is_rest_day = false
8. Workout descriptions should include: duration or distance, pace/intensity, any specific workout structure
9. Consider the user's goal race distance when designing workouts
10. Consider the user's personal records to set appropriate training paces

EXAMPLE WORKOUT DESCRIPTIONS (in Polish):
- \"Rozgrzewka 10 min, 5x1000m tempo 10K z 2 min odpoczynku, wychłodzenie 10 min\"
- \"Bieg długi 18 km w tempie rozmowy (5:30-6:00/km)\"
- \"Bieg regeneracyjny 8 km w bardzo łagodnym tempie\"

CRITICAL INSTRUCTIONS:
1. You MUST output ONLY JSON - no markdown, no explanations, no questions
2. Start your response with {{ and end with }}
3. Generate ALL 70 days immediately
4. Use this exact structure:

{{
  \"workout_days\": [
    {{\"day_number\": 1, \"workout_description\": \"Bieg regeneracyjny 8 km w łagodnym tempie\", \"is_rest_day\": false}},
    {{\"day_number\": 2, \"workout_description\": \"Odpoczynek\", \"is_rest_day\": true}},
    ... (ALL 70 days)
  ]
}}

Start generating the JSON NOW (no preamble, no questions):
",
        goal = profile.goal_distance.as_str(),
        weekly_km = profile.weekly_km,
        training_days = profile.training_days_per_week,
        rest_days = rest_days_per_week,
        age = profile.age,
        weight = profile.weight,
        height = profile.height,
        gender = profile.gender.as_str(),
        records = formatted_records,
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Distance, Gender};

    fn profile() -> GenerationProfile {
        GenerationProfile {
            goal_distance: Distance::HalfMarathon,
            weekly_km: 30.0,
            training_days_per_week: 4,
            age: 32,
            weight: 72.5,
            height: 178,
            gender: Gender::M,
        }
    }

    #[test]
    fn test_prompt_includes_profile_and_rest_days() {
        let records = vec![RecordInput {
            distance: Distance::FiveK,
            time_seconds: 1350,
        }];
        let prompt = build_plan_prompt(&profile(), &records);

        assert!(prompt.contains("Goal: Half Marathon"));
        assert!(prompt.contains("Training days per week: 4"));
        assert!(prompt.contains("Rest days per week: 3"));
        // 1350s = 22:30
        assert!(prompt.contains("5K: 22:30"));
    }

    #[test]
    fn test_record_seconds_zero_padded() {
        let record = RecordInput {
            distance: Distance::TenK,
            time_seconds: 45 * 60 + 5,
        };
        assert_eq!(format_record(&record), "10K: 45:05");
    }
}
