// ABOUTME: Typed partial updates applied by the profile merge engine
// ABOUTME: Every field is optional; `None` means "leave the stored value untouched"
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use serde::{Deserialize, Serialize};

use super::body::Measurements;
use super::user::{FitnessGoal, FitnessLevel, Gender, SpecificGoal};

/// Partial update of the principal's coarse profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    /// Height in centimetres
    pub height: Option<f64>,
    /// Weight in kilograms
    pub weight: Option<f64>,
    /// Self-reported gender
    pub gender: Option<Gender>,
    /// Age in years
    pub age: Option<i32>,
    /// Training experience
    pub fitness_level: Option<FitnessLevel>,
    /// Broad weight goal
    pub fitness_goal: Option<FitnessGoal>,
    /// Specific objective
    pub specific_goal: Option<SpecificGoal>,
    /// Flip `has_completed_onboarding` to true; never flips it back
    pub complete_onboarding: bool,
}

impl ProfilePatch {
    /// True when applying the patch would change nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.height.is_none()
            && self.weight.is_none()
            && self.gender.is_none()
            && self.age.is_none()
            && self.fitness_level.is_none()
            && self.fitness_goal.is_none()
            && self.specific_goal.is_none()
            && !self.complete_onboarding
    }
}

/// Partial update of the body composition snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyCompositionPatch {
    /// Body fat percentage
    pub body_fat: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass: Option<f64>,
    /// Bone mass in kilograms
    pub bone_mass: Option<f64>,
    /// Body water
    pub water_weight: Option<f64>,
    /// Basal metabolic rate
    pub bmr: Option<i32>,
    /// Visceral fat rating
    pub visceral_fat: Option<f64>,
    /// Protein mass
    pub protein_mass: Option<f64>,
    /// Body mass index
    pub bmi: Option<f64>,
    /// Muscle rate percentage
    pub muscle_rate: Option<f64>,
    /// Metabolic age in years
    pub metabolic_age: Option<i32>,
    /// Lean body weight in kilograms
    pub weight_without_fat: Option<f64>,
}

impl BodyCompositionPatch {
    /// True when no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.body_fat.is_none()
            && self.muscle_mass.is_none()
            && self.bone_mass.is_none()
            && self.water_weight.is_none()
            && self.bmr.is_none()
            && self.visceral_fat.is_none()
            && self.protein_mass.is_none()
            && self.bmi.is_none()
            && self.muscle_rate.is_none()
            && self.metabolic_age.is_none()
            && self.weight_without_fat.is_none()
    }
}

/// Partial update of the goal measurements
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalMeasurementsPatch {
    /// Target measurements
    pub measurements: Measurements,
    /// Target weight in kilograms
    pub target_weight: Option<f64>,
}

impl GoalMeasurementsPatch {
    /// True when no field is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty() && self.target_weight.is_none()
    }
}
