// ABOUTME: Workout plan models: plans, scheduled days, and the exercises prescribed on each day
// ABOUTME: Plan length enumeration with database string mapping and day counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{FitnessLevel, Gender, SpecificGoal};
use crate::errors::AppError;

/// Length of a workout plan
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PlanDuration {
    /// Four weeks
    #[default]
    #[serde(rename = "1_month")]
    OneMonth,
    /// Twelve weeks
    #[serde(rename = "3_month")]
    ThreeMonth,
    /// Half a year
    #[serde(rename = "6_month")]
    SixMonth,
}

impl PlanDuration {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneMonth => "1_month",
            Self::ThreeMonth => "3_month",
            Self::SixMonth => "6_month",
        }
    }

    /// Calendar days covered by the plan
    #[must_use]
    pub const fn days(&self) -> i32 {
        match self {
            Self::OneMonth => 30,
            Self::ThreeMonth => 90,
            Self::SixMonth => 180,
        }
    }
}

impl Display for PlanDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanDuration {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1_month" => Ok(Self::OneMonth),
            "3_month" => Ok(Self::ThreeMonth),
            "6_month" => Ok(Self::SixMonth),
            _ => Err(AppError::invalid_input(format!(
                "Invalid plan duration: {s} (expected 1_month, 3_month, or 6_month)"
            ))),
        }
    }
}

/// A reusable training program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Row identifier
    pub id: i64,
    /// Author; the only user allowed to change the plan
    pub created_by: Uuid,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Overall difficulty
    pub difficulty: FitnessLevel,
    /// Program length
    pub duration: PlanDuration,
    /// Goal the plan is designed for
    pub specific_goal: Option<SpecificGoal>,
    /// Intended audience, if restricted
    pub target_gender: Option<Gender>,
    /// Experience expected before starting
    pub min_fitness_level: FitnessLevel,
    /// Visible to every user when true, otherwise only to the author
    pub is_public: bool,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

/// One scheduled day of a plan, unique per (plan, `day_number`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutDay {
    /// Row identifier
    pub id: i64,
    /// Parent plan
    pub plan_id: i64,
    /// Display name, e.g. "Day 1: Chest & Triceps"
    pub name: String,
    /// 1-based position in the schedule
    pub day_number: i32,
    /// No exercises expected
    pub is_rest_day: bool,
    /// Focus of the day, e.g. `upper_body`
    pub focus_area: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

/// An exercise prescribed on a plan day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanExercise {
    /// Row identifier
    pub id: i64,
    /// Parent day
    pub day_id: i64,
    /// Catalog exercise
    pub exercise_id: i64,
    /// Exercise name, joined for display
    pub exercise_name: String,
    /// Prescribed sets
    pub sets: i32,
    /// Prescribed repetitions per set
    pub reps: i32,
    /// Rest between sets in seconds
    pub rest_time: i32,
    /// Load in kilograms
    pub weight: Option<f64>,
    /// Duration in seconds for timed exercises
    pub duration: Option<i32>,
    /// Position within the day, ascending
    #[serde(rename = "order")]
    pub position: i32,
    /// Free-text notes
    pub notes: Option<String>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_duration_strings_and_days() {
        for duration in [
            PlanDuration::OneMonth,
            PlanDuration::ThreeMonth,
            PlanDuration::SixMonth,
        ] {
            assert_eq!(duration.as_str().parse::<PlanDuration>().unwrap(), duration);
            assert_eq!(
                serde_json::to_value(duration).unwrap(),
                serde_json::json!(duration.as_str())
            );
        }
        assert_eq!(PlanDuration::ThreeMonth.days(), 90);
        assert!("2_month".parse::<PlanDuration>().is_err());
    }
}
