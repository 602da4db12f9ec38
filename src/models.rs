// ABOUTME: Core domain types for training plans, workout days, and survey commands
// ABOUTME: Includes constructor-level invariant checks and survey validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Athletica

//! # Domain Models
//!
//! Data structures shared across the server and the client engine: the user
//! profile captured by the survey, personal records, the 10-week training plan
//! with its 70 workout days, and the derived completion statistics.
//!
//! Invariants are enforced where the values are constructed, not only at the
//! storage boundary: a [`WorkoutDay`] cannot be built as a completed rest day,
//! and a [`GenerateTrainingPlanCommand`] only exists for survey input that
//! passed field validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Every plan spans exactly ten weeks
pub const TRAINING_WEEKS: u32 = 10;

/// Number of workout-day rows materialized per plan
pub const PLAN_LENGTH_DAYS: u32 = TRAINING_WEEKS * 7;

/// Race distances supported by the survey and by personal records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    /// 5 kilometers
    #[serde(rename = "5K")]
    FiveK,
    /// 10 kilometers
    #[serde(rename = "10K")]
    TenK,
    /// 21.0975 kilometers
    #[serde(rename = "Half Marathon")]
    HalfMarathon,
    /// 42.195 kilometers
    #[serde(rename = "Marathon")]
    Marathon,
}

impl Distance {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FiveK => "5K",
            Self::TenK => "10K",
            Self::HalfMarathon => "Half Marathon",
            Self::Marathon => "Marathon",
        }
    }

    /// Parse from database or survey string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "5K" => Some(Self::FiveK),
            "10K" => Some(Self::TenK),
            "Half Marathon" => Some(Self::HalfMarathon),
            "Marathon" => Some(Self::Marathon),
            _ => None,
        }
    }
}

/// Gender as captured by the survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Male
    M,
    /// Female
    F,
}

impl Gender {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::M => "M",
            Self::F => "F",
        }
    }

    /// Parse from database or survey string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "M" => Some(Self::M),
            "F" => Some(Self::F),
            _ => None,
        }
    }
}

/// One survey-derived profile per user, fully replaced on every generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Owning user
    pub user_id: Uuid,
    /// Target race distance
    pub goal_distance: Distance,
    /// Current weekly running volume in kilometers
    pub weekly_km: f64,
    /// Training days per week (2-7)
    pub training_days_per_week: u32,
    /// Age in years (1-119)
    pub age: u32,
    /// Weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: u32,
    /// Gender
    pub gender: Gender,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A personal best for one race distance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Race distance
    pub distance: Distance,
    /// Finish time in seconds
    pub time_seconds: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// One row per generation event; at most one active per user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingPlan {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// First day of the plan
    pub start_date: NaiveDate,
    /// Last day of the plan (`start_date` + 69 days, fixed at creation)
    pub end_date: NaiveDate,
    /// Whether this plan governs the dashboard
    pub is_active: bool,
    /// When the plan was generated
    pub generated_at: DateTime<Utc>,
}

/// A single day of a training plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    /// Unique identifier
    pub id: Uuid,
    /// Owning plan
    pub training_plan_id: Uuid,
    /// Position within the plan (1-70, unique per plan)
    pub day_number: u32,
    /// Calendar date (`start_date` + `day_number` - 1)
    pub date: NaiveDate,
    /// Free-text workout description from the generator
    pub workout_description: String,
    /// Rest days are permanently non-completable
    pub is_rest_day: bool,
    /// Completion flag toggled from the dashboard
    pub is_completed: bool,
    /// Mutation time of the last completion, non-null iff `is_completed`
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkoutDay {
    /// Validate the completion invariants of a day record
    ///
    /// # Errors
    ///
    /// Returns an integrity error if a rest day is marked completed, or if
    /// `completed_at` disagrees with `is_completed`.
    pub fn check_invariants(&self) -> AppResult<()> {
        if self.is_rest_day && self.is_completed {
            return Err(AppError::integrity(format!(
                "workout day {} is a completed rest day",
                self.id
            )));
        }
        if self.is_completed != self.completed_at.is_some() {
            return Err(AppError::integrity(format!(
                "workout day {} has completed_at inconsistent with is_completed",
                self.id
            )));
        }
        Ok(())
    }
}

/// An active (or freshly created) plan together with its 70 days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanWithDays {
    /// The plan row
    #[serde(flatten)]
    pub plan: TrainingPlan,
    /// All 70 days, ordered by `day_number`
    pub workout_days: Vec<WorkoutDay>,
}

/// Why a plan counts as completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanCompletionReason {
    /// Every non-rest day has been checked off
    AllWorkoutsDone,
    /// The calendar end date has passed, regardless of unfinished days
    EndDatePassed,
}

/// Aggregate progress derived from day records; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStats {
    /// Count of non-rest days
    pub total_workouts: u32,
    /// Count of non-rest days with `is_completed`
    pub completed_workouts: u32,
    /// Count of rest days
    pub total_rest_days: u32,
    /// round(100 * completed / total), 0 when there are no workouts
    pub completion_percentage: u32,
    /// Whether the plan counts as completed
    pub is_plan_completed: bool,
    /// Which branch made the plan completed, when it is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_reason: Option<PlanCompletionReason>,
}

/// One AI-provided day before persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayDescriptor {
    /// Position within the plan (1-70)
    pub day_number: u32,
    /// Workout description, or the rest-day label
    pub workout_description: String,
    /// Whether this day is a rest day
    pub is_rest_day: bool,
}

// ============================================================================
// Survey input and validation
// ============================================================================

/// Raw survey profile exactly as submitted, prior to validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyProfile {
    /// Goal distance string ("5K", "10K", "Half Marathon", "Marathon")
    pub goal_distance: String,
    /// Weekly kilometers
    pub weekly_km: f64,
    /// Training days per week
    pub training_days_per_week: i64,
    /// Age in years
    pub age: i64,
    /// Weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: i64,
    /// Gender string ("M" or "F")
    pub gender: String,
}

/// Raw personal record exactly as submitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyRecord {
    /// Distance string
    pub distance: String,
    /// Finish time in seconds
    pub time_seconds: i64,
}

/// Full survey submission (profile + personal records)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveySubmission {
    /// Survey profile section
    pub profile: SurveyProfile,
    /// Personal records section
    pub personal_records: Vec<SurveyRecord>,
}

/// A single field-level validation failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field
    pub field: String,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validated profile values carried into generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationProfile {
    /// Target race distance
    pub goal_distance: Distance,
    /// Current weekly running volume in kilometers
    pub weekly_km: f64,
    /// Training days per week (2-7)
    pub training_days_per_week: u32,
    /// Age in years (1-119)
    pub age: u32,
    /// Weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: u32,
    /// Gender
    pub gender: Gender,
}

/// Validated personal record carried into generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordInput {
    /// Race distance
    pub distance: Distance,
    /// Finish time in seconds
    pub time_seconds: u32,
}

/// A validated generation command; constructing one implies the survey passed
/// all field checks
#[derive(Debug, Clone)]
pub struct GenerateTrainingPlanCommand {
    /// New profile values (replace wholesale)
    pub profile: GenerationProfile,
    /// New personal record set (replaces any prior set, at least one)
    pub personal_records: Vec<RecordInput>,
}

impl GenerateTrainingPlanCommand {
    /// Validate a raw survey submission into a command
    ///
    /// # Errors
    ///
    /// Returns every failed field with its message; no side effect has
    /// happened when this fails.
    pub fn parse(survey: &SurveySubmission) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let p = &survey.profile;
        let goal_distance = Distance::parse(&p.goal_distance);
        if goal_distance.is_none() {
            errors.push(FieldError::new(
                "profile.goal_distance",
                "Invalid goal distance. Must be one of: 5K, 10K, Half Marathon, Marathon",
            ));
        }
        if p.weekly_km <= 0.0 {
            errors.push(FieldError::new(
                "profile.weekly_km",
                "Weekly km must be greater than 0",
            ));
        }
        if p.training_days_per_week < 2 {
            errors.push(FieldError::new(
                "profile.training_days_per_week",
                "Minimum 2 training days per week",
            ));
        } else if p.training_days_per_week > 7 {
            errors.push(FieldError::new(
                "profile.training_days_per_week",
                "Maximum 7 training days per week",
            ));
        }
        if p.age < 1 {
            errors.push(FieldError::new("profile.age", "Age must be at least 1"));
        } else if p.age > 119 {
            errors.push(FieldError::new("profile.age", "Age must be less than 120"));
        }
        if p.weight <= 0.0 {
            errors.push(FieldError::new(
                "profile.weight",
                "Weight must be greater than 0",
            ));
        } else if p.weight > 300.0 {
            errors.push(FieldError::new(
                "profile.weight",
                "Weight must be less than 300kg",
            ));
        }
        if p.height < 1 {
            errors.push(FieldError::new(
                "profile.height",
                "Height must be greater than 0",
            ));
        } else if p.height > 300 {
            errors.push(FieldError::new(
                "profile.height",
                "Height must be less than 300cm",
            ));
        }
        let gender = Gender::parse(&p.gender);
        if gender.is_none() {
            errors.push(FieldError::new("profile.gender", "Gender must be M or F"));
        }

        if survey.personal_records.is_empty() {
            errors.push(FieldError::new(
                "personal_records",
                "At least one personal record is required",
            ));
        }
        let mut records = Vec::with_capacity(survey.personal_records.len());
        for (i, record) in survey.personal_records.iter().enumerate() {
            let distance = Distance::parse(&record.distance);
            if distance.is_none() {
                errors.push(FieldError::new(
                    format!("personal_records.{i}.distance"),
                    "Invalid distance. Must be one of: 5K, 10K, Half Marathon, Marathon",
                ));
            }
            if record.time_seconds < 1 {
                errors.push(FieldError::new(
                    format!("personal_records.{i}.time_seconds"),
                    "time_seconds must be greater than 0",
                ));
            }
            if let Some(distance) = distance {
                if record.time_seconds >= 1 {
                    records.push(RecordInput {
                        distance,
                        time_seconds: record.time_seconds as u32,
                    });
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        // All parses succeeded when errors is empty.
        let (Some(goal_distance), Some(gender)) = (goal_distance, gender) else {
            return Err(errors);
        };

        Ok(Self {
            profile: GenerationProfile {
                goal_distance,
                weekly_km: p.weekly_km,
                training_days_per_week: p.training_days_per_week as u32,
                age: p.age as u32,
                weight: p.weight,
                height: p.height as u32,
                gender,
            },
            personal_records: records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_survey() -> SurveySubmission {
        SurveySubmission {
            profile: SurveyProfile {
                goal_distance: "Half Marathon".into(),
                weekly_km: 30.0,
                training_days_per_week: 4,
                age: 32,
                weight: 72.5,
                height: 178,
                gender: "M".into(),
            },
            personal_records: vec![SurveyRecord {
                distance: "5K".into(),
                time_seconds: 1350,
            }],
        }
    }

    #[test]
    fn test_valid_survey_parses() {
        let command = GenerateTrainingPlanCommand::parse(&valid_survey()).unwrap();
        assert_eq!(command.profile.goal_distance, Distance::HalfMarathon);
        assert_eq!(command.profile.training_days_per_week, 4);
        assert_eq!(command.personal_records.len(), 1);
        assert_eq!(command.personal_records[0].time_seconds, 1350);
    }

    #[test]
    fn test_out_of_range_fields_are_all_reported() {
        let mut survey = valid_survey();
        survey.profile.age = 150;
        survey.profile.training_days_per_week = 1;
        survey.profile.weekly_km = 0.0;

        let errors = GenerateTrainingPlanCommand::parse(&survey).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"profile.age"));
        assert!(fields.contains(&"profile.training_days_per_week"));
        assert!(fields.contains(&"profile.weekly_km"));
    }

    #[test]
    fn test_empty_records_rejected() {
        let mut survey = valid_survey();
        survey.personal_records.clear();

        let errors = GenerateTrainingPlanCommand::parse(&survey).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "personal_records");
    }

    #[test]
    fn test_unknown_distance_rejected() {
        let mut survey = valid_survey();
        survey.personal_records[0].distance = "50K".into();

        let errors = GenerateTrainingPlanCommand::parse(&survey).unwrap_err();
        assert_eq!(errors[0].field, "personal_records.0.distance");
    }

    #[test]
    fn test_distance_round_trip() {
        for distance in [
            Distance::FiveK,
            Distance::TenK,
            Distance::HalfMarathon,
            Distance::Marathon,
        ] {
            assert_eq!(Distance::parse(distance.as_str()), Some(distance));
        }
        assert_eq!(Distance::parse("ultra"), None);
    }

    #[test]
    fn test_completed_rest_day_fails_invariants() {
        let day = WorkoutDay {
            id: Uuid::new_v4(),
            training_plan_id: Uuid::new_v4(),
            day_number: 7,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            workout_description: "Odpoczynek".into(),
            is_rest_day: true,
            is_completed: true,
            completed_at: Some(Utc::now()),
        };
        assert!(day.check_invariants().is_err());
    }

    #[test]
    fn test_completed_at_must_match_flag() {
        let day = WorkoutDay {
            id: Uuid::new_v4(),
            training_plan_id: Uuid::new_v4(),
            day_number: 3,
            date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            workout_description: "Bieg regeneracyjny 8 km".into(),
            is_rest_day: false,
            is_completed: true,
            completed_at: None,
        };
        assert!(day.check_invariants().is_err());
    }
}
