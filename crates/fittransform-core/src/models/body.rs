// ABOUTME: One-to-one body-state entities owned by a user
// ABOUTME: Body composition, current body measurements, and goal measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the ten linear body measurements, named by its storage column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    /// Chest circumference
    Chest,
    /// Neck circumference
    Neck,
    /// Waist circumference
    Waist,
    /// Left upper arm
    LeftArm,
    /// Right upper arm
    RightArm,
    /// Left thigh
    LeftThigh,
    /// Right thigh
    RightThigh,
    /// Shoulder width
    Shoulders,
    /// Hip circumference
    Hips,
    /// Calf circumference
    Calves,
}

impl MeasurementField {
    /// Every measurement in column order
    pub const ALL: [Self; 10] = [
        Self::Chest,
        Self::Neck,
        Self::Waist,
        Self::LeftArm,
        Self::RightArm,
        Self::LeftThigh,
        Self::RightThigh,
        Self::Shoulders,
        Self::Hips,
        Self::Calves,
    ];

    /// Storage column and internal field name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Neck => "neck",
            Self::Waist => "waist",
            Self::LeftArm => "left_arm",
            Self::RightArm => "right_arm",
            Self::LeftThigh => "left_thigh",
            Self::RightThigh => "right_thigh",
            Self::Shoulders => "shoulders",
            Self::Hips => "hips",
            Self::Calves => "calves",
        }
    }
}

/// The ten linear measurements, each optional, in centimetres
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    /// Chest circumference
    pub chest: Option<f64>,
    /// Neck circumference
    pub neck: Option<f64>,
    /// Waist circumference
    pub waist: Option<f64>,
    /// Left upper arm
    pub left_arm: Option<f64>,
    /// Right upper arm
    pub right_arm: Option<f64>,
    /// Left thigh
    pub left_thigh: Option<f64>,
    /// Right thigh
    pub right_thigh: Option<f64>,
    /// Shoulder width
    pub shoulders: Option<f64>,
    /// Hip circumference
    pub hips: Option<f64>,
    /// Calf circumference
    pub calves: Option<f64>,
}

impl Measurements {
    /// Read one measurement
    #[must_use]
    pub const fn get(&self, field: MeasurementField) -> Option<f64> {
        match field {
            MeasurementField::Chest => self.chest,
            MeasurementField::Neck => self.neck,
            MeasurementField::Waist => self.waist,
            MeasurementField::LeftArm => self.left_arm,
            MeasurementField::RightArm => self.right_arm,
            MeasurementField::LeftThigh => self.left_thigh,
            MeasurementField::RightThigh => self.right_thigh,
            MeasurementField::Shoulders => self.shoulders,
            MeasurementField::Hips => self.hips,
            MeasurementField::Calves => self.calves,
        }
    }

    /// Write one measurement
    pub fn set(&mut self, field: MeasurementField, value: Option<f64>) {
        let slot = match field {
            MeasurementField::Chest => &mut self.chest,
            MeasurementField::Neck => &mut self.neck,
            MeasurementField::Waist => &mut self.waist,
            MeasurementField::LeftArm => &mut self.left_arm,
            MeasurementField::RightArm => &mut self.right_arm,
            MeasurementField::LeftThigh => &mut self.left_thigh,
            MeasurementField::RightThigh => &mut self.right_thigh,
            MeasurementField::Shoulders => &mut self.shoulders,
            MeasurementField::Hips => &mut self.hips,
            MeasurementField::Calves => &mut self.calves,
        };
        *slot = value;
    }

    /// True when no measurement is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        MeasurementField::ALL
            .iter()
            .all(|field| self.get(*field).is_none())
    }

    /// Number of measurements that are set
    #[must_use]
    pub fn count(&self) -> usize {
        MeasurementField::ALL
            .iter()
            .filter(|field| self.get(**field).is_some())
            .count()
    }
}

/// Body composition snapshot from a smart scale (one per user)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyComposition {
    /// Owner
    pub user_id: Uuid,
    /// Body fat percentage
    pub body_fat: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass: Option<f64>,
    /// Bone mass in kilograms
    pub bone_mass: Option<f64>,
    /// Body water
    pub water_weight: Option<f64>,
    /// Basal metabolic rate in kcal
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
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last merge time
    pub updated_at: DateTime<Utc>,
}

/// Current body measurements (one per user)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurements {
    /// Owner
    pub user_id: Uuid,
    /// The ten measurements
    pub measurements: Measurements,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last merge time
    pub updated_at: DateTime<Utc>,
}

/// Target body measurements and weight (one per user)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalMeasurements {
    /// Owner
    pub user_id: Uuid,
    /// The ten target measurements
    pub measurements: Measurements,
    /// Target weight in kilograms
    pub target_weight: Option<f64>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last merge time
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_cover_every_field() {
        let mut measurements = Measurements::default();
        assert!(measurements.is_empty());

        for (index, field) in MeasurementField::ALL.iter().enumerate() {
            measurements.set(*field, Some(index as f64));
        }

        for (index, field) in MeasurementField::ALL.iter().enumerate() {
            assert_eq!(measurements.get(*field), Some(index as f64));
        }
        assert_eq!(measurements.count(), 10);
    }

    #[test]
    fn test_column_names_are_unique() {
        let mut names: Vec<&str> = MeasurementField::ALL.iter().map(|f| f.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);
    }
}
