// ABOUTME: Static external-to-internal field-name tables for profile and body-state payloads
// ABOUTME: Parses flat payloads into typed patches and renders entities with frontend names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! Field-name translation tables.
//!
//! Each entry lists the accepted payload keys for one internal field. The
//! first alias is the frontend name and is also used when rendering the
//! entity back to the client; the second, where present, is the internal
//! snake-case column name, which clients may send as well.

use std::collections::BTreeSet;

use serde_json::{json, Map, Value};

use crate::errors::AppResult;
use crate::models::{
    BodyComposition, BodyCompositionPatch, BodyMeasurements, GoalMeasurements,
    GoalMeasurementsPatch, MeasurementField, Measurements, ProfilePatch, User,
};
use crate::utils::payload::{
    lookup, read_enum, read_non_negative_f64, read_non_negative_i32, Payload,
};

/// One internal field and the payload keys that address it
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<F: 'static> {
    /// Internal field
    pub field: F,
    /// Accepted payload keys, frontend name first
    pub aliases: &'static [&'static str],
}

impl<F> FieldSpec<F> {
    /// Frontend name used in responses
    #[must_use]
    pub const fn external_name(&self) -> &'static str {
        self.aliases[0]
    }
}

/// Coarse profile fields on the principal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    /// Height
    Height,
    /// Weight
    Weight,
    /// Gender
    Gender,
    /// Age
    Age,
    /// Fitness level
    FitnessLevel,
    /// Fitness goal
    FitnessGoal,
    /// Specific goal
    SpecificGoal,
}

/// Body composition fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionField {
    /// Body fat percentage
    BodyFat,
    /// Muscle mass
    MuscleMass,
    /// Bone mass
    BoneMass,
    /// Water weight
    WaterWeight,
    /// Basal metabolic rate
    Bmr,
    /// Visceral fat
    VisceralFat,
    /// Protein mass
    ProteinMass,
    /// Body mass index
    Bmi,
    /// Muscle rate
    MuscleRate,
    /// Metabolic age
    MetabolicAge,
    /// Weight without fat
    WeightWithoutFat,
}

/// Fields written by the `profile` step
#[rustfmt::skip]
pub const PROFILE_STEP_FIELDS: &[FieldSpec<ProfileField>] = &[
    FieldSpec { field: ProfileField::Height, aliases: &["height"] },
    FieldSpec { field: ProfileField::Weight, aliases: &["weight"] },
    FieldSpec { field: ProfileField::Gender, aliases: &["gender"] },
    FieldSpec { field: ProfileField::Age, aliases: &["age"] },
    FieldSpec { field: ProfileField::FitnessLevel, aliases: &["fitness_level", "fitnessLevel"] },
];

/// Fields written by the `goals` step
#[rustfmt::skip]
pub const GOALS_STEP_FIELDS: &[FieldSpec<ProfileField>] = &[
    FieldSpec { field: ProfileField::FitnessGoal, aliases: &["fitnessGoal", "fitness_goal"] },
    FieldSpec { field: ProfileField::SpecificGoal, aliases: &["specificGoal", "specific_goal"] },
];

/// Principal field written by the `specific_goals` step
pub const SPECIFIC_GOAL_FIELDS: &[FieldSpec<ProfileField>] = &[FieldSpec {
    field: ProfileField::SpecificGoal,
    aliases: &["specificGoal", "specific_goal"],
}];

/// Fields accepted by a direct profile update
#[rustfmt::skip]
pub const PROFILE_UPDATE_FIELDS: &[FieldSpec<ProfileField>] = &[
    FieldSpec { field: ProfileField::Height, aliases: &["height"] },
    FieldSpec { field: ProfileField::Weight, aliases: &["weight"] },
    FieldSpec { field: ProfileField::Gender, aliases: &["gender"] },
    FieldSpec { field: ProfileField::Age, aliases: &["age"] },
    FieldSpec { field: ProfileField::FitnessLevel, aliases: &["fitness_level", "fitnessLevel"] },
    FieldSpec { field: ProfileField::FitnessGoal, aliases: &["fitnessGoal", "fitness_goal"] },
    FieldSpec { field: ProfileField::SpecificGoal, aliases: &["specificGoal", "specific_goal"] },
];

/// Body composition table
#[rustfmt::skip]
pub const COMPOSITION_FIELDS: &[FieldSpec<CompositionField>] = &[
    FieldSpec { field: CompositionField::BodyFat, aliases: &["bodyFat", "body_fat"] },
    FieldSpec { field: CompositionField::MuscleMass, aliases: &["muscleMass", "muscle_mass"] },
    FieldSpec { field: CompositionField::BoneMass, aliases: &["boneMass", "bone_mass"] },
    FieldSpec { field: CompositionField::WaterWeight, aliases: &["waterWeight", "water_weight"] },
    FieldSpec { field: CompositionField::Bmr, aliases: &["bmr"] },
    FieldSpec { field: CompositionField::VisceralFat, aliases: &["visceralFat", "visceral_fat"] },
    FieldSpec { field: CompositionField::ProteinMass, aliases: &["proteinMass", "protein_mass"] },
    FieldSpec { field: CompositionField::Bmi, aliases: &["bmi"] },
    FieldSpec { field: CompositionField::MuscleRate, aliases: &["muscleRate", "muscle_rate"] },
    FieldSpec { field: CompositionField::MetabolicAge, aliases: &["metabolicAge", "metabolic_age"] },
    FieldSpec {
        field: CompositionField::WeightWithoutFat,
        aliases: &["weightWithoutFat", "weight_without_fat"],
    },
];

/// The ten linear measurements, shared by current and goal measurements
#[rustfmt::skip]
pub const MEASUREMENT_FIELDS: &[FieldSpec<MeasurementField>] = &[
    FieldSpec { field: MeasurementField::Chest, aliases: &["chest"] },
    FieldSpec { field: MeasurementField::Neck, aliases: &["neck"] },
    FieldSpec { field: MeasurementField::Waist, aliases: &["waist"] },
    FieldSpec { field: MeasurementField::LeftArm, aliases: &["leftarm", "left_arm"] },
    FieldSpec { field: MeasurementField::RightArm, aliases: &["rightarm", "right_arm"] },
    FieldSpec { field: MeasurementField::LeftThigh, aliases: &["leftthigh", "left_thigh"] },
    FieldSpec { field: MeasurementField::RightThigh, aliases: &["rightthigh", "right_thigh"] },
    FieldSpec { field: MeasurementField::Shoulders, aliases: &["shoulders"] },
    FieldSpec { field: MeasurementField::Hips, aliases: &["hips"] },
    FieldSpec { field: MeasurementField::Calves, aliases: &["calves"] },
];

/// Goal weight keys
pub const TARGET_WEIGHT_ALIASES: &[&str] = &["targetWeight", "target_weight"];

/// Collects the payload keys a parser consumed so the rest can be reported
#[derive(Debug, Default)]
pub struct KeyTracker {
    consumed: BTreeSet<&'static str>,
}

impl KeyTracker {
    /// Look up a field by its aliases, remembering every alias as recognised
    pub fn lookup<'a>(
        &mut self,
        payload: &'a Payload,
        aliases: &[&'static str],
    ) -> Option<(&'static str, &'a Value)> {
        self.consumed.extend(aliases.iter().copied());
        lookup(payload, aliases)
    }

    /// Payload keys no parser recognised, sorted
    #[must_use]
    pub fn ignored(&self, payload: &Payload) -> Vec<String> {
        let mut ignored: Vec<String> = payload
            .keys()
            .filter(|key| !self.consumed.contains(key.as_str()))
            .cloned()
            .collect();
        ignored.sort();
        ignored
    }
}

/// Read the listed profile fields into a patch
///
/// # Errors
///
/// Returns a validation error naming the first rejected field
pub fn parse_profile(
    payload: &Payload,
    fields: &[FieldSpec<ProfileField>],
    tracker: &mut KeyTracker,
) -> AppResult<ProfilePatch> {
    let mut patch = ProfilePatch::default();
    for entry in fields {
        let Some((key, value)) = tracker.lookup(payload, entry.aliases) else {
            continue;
        };
        match entry.field {
            ProfileField::Height => patch.height = read_non_negative_f64(value, key)?,
            ProfileField::Weight => patch.weight = read_non_negative_f64(value, key)?,
            ProfileField::Gender => patch.gender = read_enum(value, key)?,
            ProfileField::Age => patch.age = read_non_negative_i32(value, key)?,
            ProfileField::FitnessLevel => patch.fitness_level = read_enum(value, key)?,
            ProfileField::FitnessGoal => patch.fitness_goal = read_enum(value, key)?,
            ProfileField::SpecificGoal => patch.specific_goal = read_enum(value, key)?,
        }
    }
    Ok(patch)
}

/// Read body composition fields into a patch
///
/// # Errors
///
/// Returns a validation error naming the first rejected field
pub fn parse_composition(
    payload: &Payload,
    tracker: &mut KeyTracker,
) -> AppResult<BodyCompositionPatch> {
    let mut patch = BodyCompositionPatch::default();
    for entry in COMPOSITION_FIELDS {
        let Some((key, value)) = tracker.lookup(payload, entry.aliases) else {
            continue;
        };
        match entry.field {
            CompositionField::BodyFat => patch.body_fat = read_non_negative_f64(value, key)?,
            CompositionField::MuscleMass => patch.muscle_mass = read_non_negative_f64(value, key)?,
            CompositionField::BoneMass => patch.bone_mass = read_non_negative_f64(value, key)?,
            CompositionField::WaterWeight => {
                patch.water_weight = read_non_negative_f64(value, key)?;
            }
            CompositionField::Bmr => patch.bmr = read_non_negative_i32(value, key)?,
            CompositionField::VisceralFat => {
                patch.visceral_fat = read_non_negative_f64(value, key)?;
            }
            CompositionField::ProteinMass => {
                patch.protein_mass = read_non_negative_f64(value, key)?;
            }
            CompositionField::Bmi => patch.bmi = read_non_negative_f64(value, key)?,
            CompositionField::MuscleRate => patch.muscle_rate = read_non_negative_f64(value, key)?,
            CompositionField::MetabolicAge => {
                patch.metabolic_age = read_non_negative_i32(value, key)?;
            }
            CompositionField::WeightWithoutFat => {
                patch.weight_without_fat = read_non_negative_f64(value, key)?;
            }
        }
    }
    Ok(patch)
}

/// Read the ten measurements
///
/// # Errors
///
/// Returns a validation error naming the first rejected field
pub fn parse_measurements(payload: &Payload, tracker: &mut KeyTracker) -> AppResult<Measurements> {
    let mut measurements = Measurements::default();
    for entry in MEASUREMENT_FIELDS {
        if let Some((key, value)) = tracker.lookup(payload, entry.aliases) {
            measurements.set(entry.field, read_non_negative_f64(value, key)?);
        }
    }
    Ok(measurements)
}

/// Read goal measurements and target weight
///
/// # Errors
///
/// Returns a validation error naming the first rejected field
pub fn parse_goal_measurements(
    payload: &Payload,
    tracker: &mut KeyTracker,
) -> AppResult<GoalMeasurementsPatch> {
    let measurements = parse_measurements(payload, tracker)?;
    let target_weight = match tracker.lookup(payload, TARGET_WEIGHT_ALIASES) {
        Some((key, value)) => read_non_negative_f64(value, key)?,
        None => None,
    };
    Ok(GoalMeasurementsPatch {
        measurements,
        target_weight,
    })
}

// ============================================================================
// Response views
// ============================================================================

/// Principal with frontend field names
#[must_use]
pub fn user_view(user: &User) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "username": user.username,
        "first_name": user.first_name,
        "last_name": user.last_name,
        "height": user.height,
        "weight": user.weight,
        "gender": user.gender,
        "age": user.age,
        "fitness_level": user.fitness_level,
        "fitnessGoal": user.fitness_goal,
        "specificGoal": user.specific_goal,
        "hasCompletedOnboarding": user.has_completed_onboarding,
        "created_at": user.created_at,
        "updated_at": user.updated_at,
    })
}

/// Body composition with frontend field names
#[must_use]
pub fn composition_view(composition: &BodyComposition) -> Value {
    let mut map = Map::new();
    for entry in COMPOSITION_FIELDS {
        let value = match entry.field {
            CompositionField::BodyFat => json!(composition.body_fat),
            CompositionField::MuscleMass => json!(composition.muscle_mass),
            CompositionField::BoneMass => json!(composition.bone_mass),
            CompositionField::WaterWeight => json!(composition.water_weight),
            CompositionField::Bmr => json!(composition.bmr),
            CompositionField::VisceralFat => json!(composition.visceral_fat),
            CompositionField::ProteinMass => json!(composition.protein_mass),
            CompositionField::Bmi => json!(composition.bmi),
            CompositionField::MuscleRate => json!(composition.muscle_rate),
            CompositionField::MetabolicAge => json!(composition.metabolic_age),
            CompositionField::WeightWithoutFat => json!(composition.weight_without_fat),
        };
        map.insert(entry.external_name().to_owned(), value);
    }
    map.insert("created_at".to_owned(), json!(composition.created_at));
    map.insert("updated_at".to_owned(), json!(composition.updated_at));
    Value::Object(map)
}

fn measurements_map(measurements: &Measurements) -> Map<String, Value> {
    MEASUREMENT_FIELDS
        .iter()
        .map(|entry| {
            (
                entry.external_name().to_owned(),
                json!(measurements.get(entry.field)),
            )
        })
        .collect()
}

/// Current measurements with frontend field names
#[must_use]
pub fn measurements_view(current: &BodyMeasurements) -> Value {
    let mut map = measurements_map(&current.measurements);
    map.insert("created_at".to_owned(), json!(current.created_at));
    map.insert("updated_at".to_owned(), json!(current.updated_at));
    Value::Object(map)
}

/// Goal measurements with frontend field names
#[must_use]
pub fn goals_view(goals: &GoalMeasurements) -> Value {
    let mut map = measurements_map(&goals.measurements);
    map.insert(
        TARGET_WEIGHT_ALIASES[0].to_owned(),
        json!(goals.target_weight),
    );
    map.insert("created_at".to_owned(), json!(goals.created_at));
    map.insert("updated_at".to_owned(), json!(goals.updated_at));
    Value::Object(map)
}
