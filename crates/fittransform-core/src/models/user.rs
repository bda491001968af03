// ABOUTME: Principal (user account) model with coarse profile fields and onboarding flag
// ABOUTME: Enumerations for gender, fitness level, fitness goal, and specific goal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

// ============================================================================
// Enums
// ============================================================================

/// Self-reported gender
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Other or undisclosed
    Other,
}

impl Gender {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(AppError::invalid_input(format!(
                "Invalid gender: {s} (expected male, female, or other)"
            ))),
        }
    }
}

/// Training experience, shared by users and exercise difficulty
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    /// New to training
    #[default]
    Beginner,
    /// Regular training history
    Intermediate,
    /// Experienced athlete
    Advanced,
}

impl FitnessLevel {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl Display for FitnessLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(AppError::invalid_input(format!(
                "Invalid fitness level: {s} (expected beginner, intermediate, or advanced)"
            ))),
        }
    }
}

/// Broad weight goal chosen during onboarding
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    /// Reduce body weight
    LoseWeight,
    /// Keep current weight
    Maintain,
    /// Increase body weight
    GainWeight,
}

impl FitnessGoal {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LoseWeight => "lose_weight",
            Self::Maintain => "maintain",
            Self::GainWeight => "gain_weight",
        }
    }
}

impl Display for FitnessGoal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessGoal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lose_weight" => Ok(Self::LoseWeight),
            "maintain" => Ok(Self::Maintain),
            "gain_weight" => Ok(Self::GainWeight),
            _ => Err(AppError::invalid_input(format!(
                "Invalid fitness goal: {s} (expected lose_weight, maintain, or gain_weight)"
            ))),
        }
    }
}

/// Specific training objective chosen on the terminal onboarding step
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpecificGoal {
    /// Strength focus
    IncreaseStrength,
    /// Hypertrophy focus
    BuildMuscle,
    /// Fat loss focus
    WeightLoss,
    /// Mass gain focus
    WeightGain,
    /// Coached programme
    PersonalTraining,
}

impl SpecificGoal {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IncreaseStrength => "increase_strength",
            Self::BuildMuscle => "build_muscle",
            Self::WeightLoss => "weight_loss",
            Self::WeightGain => "weight_gain",
            Self::PersonalTraining => "personal_training",
        }
    }
}

impl Display for SpecificGoal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecificGoal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "increase_strength" => Ok(Self::IncreaseStrength),
            "build_muscle" => Ok(Self::BuildMuscle),
            "weight_loss" => Ok(Self::WeightLoss),
            "weight_gain" => Ok(Self::WeightGain),
            "personal_training" => Ok(Self::PersonalTraining),
            _ => Err(AppError::invalid_input(format!(
                "Invalid specific goal: {s}"
            ))),
        }
    }
}

// ============================================================================
// User
// ============================================================================

/// The authenticated account (principal) and its coarse profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Email address, unique
    pub email: String,
    /// Display handle, unique
    pub username: String,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// bcrypt hash; `None` for accounts created through federated login
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Whether the account may authenticate
    pub is_active: bool,
    /// Height in centimetres
    pub height: Option<f64>,
    /// Weight in kilograms
    pub weight: Option<f64>,
    /// Self-reported gender
    pub gender: Option<Gender>,
    /// Age in years
    pub age: Option<i32>,
    /// Training experience
    pub fitness_level: FitnessLevel,
    /// Broad weight goal
    pub fitness_goal: Option<FitnessGoal>,
    /// Specific objective
    pub specific_goal: Option<SpecificGoal>,
    /// Set by the terminal onboarding step or the explicit complete operation
    pub has_completed_onboarding: bool,
    /// Account creation time
    pub created_at: DateTime<Utc>,
    /// Last profile change
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with an empty profile
    #[must_use]
    pub fn new(email: String, username: String, password_hash: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            first_name: None,
            last_name: None,
            password_hash,
            is_active: true,
            height: None,
            weight: None,
            gender: None,
            age: None,
            fitness_level: FitnessLevel::default(),
            fitness_goal: None,
            specific_goal: None,
            has_completed_onboarding: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach given and family names
    #[must_use]
    pub fn with_names(mut self, first_name: Option<String>, last_name: Option<String>) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    /// Whether the account can log in with a password
    #[must_use]
    pub const fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trip_through_str() {
        assert_eq!("FEMALE".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(
            "lose_weight".parse::<FitnessGoal>().unwrap().as_str(),
            "lose_weight"
        );
        assert_eq!(
            SpecificGoal::PersonalTraining.to_string(),
            "personal_training"
        );
        assert!("bulk".parse::<SpecificGoal>().is_err());
    }

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("a@example.com".to_owned(), "a".to_owned(), None);
        assert!(user.is_active);
        assert!(!user.has_completed_onboarding);
        assert!(!user.has_password());
        assert_eq!(user.fitness_level, FitnessLevel::Beginner);
    }
}
