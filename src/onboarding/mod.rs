// ABOUTME: Profile merge engine applying step-keyed partial updates to a user's profile and body state
// ABOUTME: Each step or profile edit is parsed up front and committed in a single transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! # Profile Merge Engine
//!
//! Onboarding is five named steps, each writing a different part of the
//! user's state:
//!
//! | Step | Writes |
//! |---|---|
//! | `profile` | height, weight, gender, age, fitness level |
//! | `goals` | fitness goal, specific goal |
//! | `body_composition` | the body composition row |
//! | `body_model` | the current measurements row |
//! | `specific_goals` | goal measurements, specific goal, onboarding flag |
//!
//! A payload is translated through the static tables in [`fields`] into
//! typed patches before any statement runs, so an invalid value or unknown
//! step never leaves partial writes behind. Steps may be called in any order;
//! only `specific_goals` and [`ProfileMergeEngine::complete_onboarding`] set
//! `has_completed_onboarding`.

/// Static field-name tables and response views
pub mod fields;

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::constants::limits::TRANSACTION_MAX_RETRIES;
use crate::database::{begin_immediate, retry_transaction, BodyStateManager, Database, UserManager};
use crate::errors::{AppError, AppResult};
use crate::models::{
    BodyComposition, BodyCompositionPatch, BodyMeasurements, GoalMeasurements,
    GoalMeasurementsPatch, Measurements, ProfilePatch, User,
};
use crate::utils::payload::{as_payload, Payload};
use fields::{
    composition_view, goals_view, measurements_view, parse_composition, parse_goal_measurements,
    parse_measurements, parse_profile, user_view, KeyTracker, GOALS_STEP_FIELDS,
    PROFILE_STEP_FIELDS, PROFILE_UPDATE_FIELDS, SPECIFIC_GOAL_FIELDS,
};

/// Named onboarding stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    /// Coarse body profile
    Profile,
    /// Weight and training goals
    Goals,
    /// Smart-scale composition
    BodyComposition,
    /// Current body measurements
    BodyModel,
    /// Goal measurements; terminal step
    SpecificGoals,
}

impl OnboardingStep {
    /// Every step in the order the client walks through them
    pub const ALL: [Self; 5] = [
        Self::Profile,
        Self::Goals,
        Self::BodyComposition,
        Self::BodyModel,
        Self::SpecificGoals,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Goals => "goals",
            Self::BodyComposition => "body_composition",
            Self::BodyModel => "body_model",
            Self::SpecificGoals => "specific_goals",
        }
    }

    /// Whether completing this step finishes onboarding
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::SpecificGoals)
    }
}

impl Display for OnboardingStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnboardingStep {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(Self::as_str).collect();
                AppError::invalid_input(format!(
                    "Invalid step '{s}'. Must be one of: {}",
                    allowed.join(", ")
                ))
                .with_details(json!({ "field": "step", "allowed": allowed }))
            })
    }
}

/// Typed writes for one unit of work, parsed before the transaction opens
#[derive(Debug, Default)]
struct MergePlan {
    profile: ProfilePatch,
    composition: Option<BodyCompositionPatch>,
    measurements: Option<Measurements>,
    goals: Option<GoalMeasurementsPatch>,
    ignored_fields: Vec<String>,
}

impl MergePlan {
    fn for_step(step: OnboardingStep, data: &Value) -> AppResult<Self> {
        let payload = as_payload(data)?;
        let mut tracker = KeyTracker::default();
        let mut plan = Self::default();

        match step {
            OnboardingStep::Profile => {
                plan.profile = parse_profile(payload, PROFILE_STEP_FIELDS, &mut tracker)?;
            }
            OnboardingStep::Goals => {
                plan.profile = parse_profile(payload, GOALS_STEP_FIELDS, &mut tracker)?;
            }
            OnboardingStep::BodyComposition => {
                plan.composition = Some(parse_composition(payload, &mut tracker)?);
            }
            OnboardingStep::BodyModel => {
                plan.measurements = Some(parse_measurements(payload, &mut tracker)?);
            }
            OnboardingStep::SpecificGoals => {
                plan.profile = parse_profile(payload, SPECIFIC_GOAL_FIELDS, &mut tracker)?;
                plan.profile.complete_onboarding = true;
                plan.goals = Some(parse_goal_measurements(payload, &mut tracker)?);
            }
        }

        plan.ignored_fields = tracker.ignored(payload);
        Ok(plan)
    }
}

/// State after a merge: the principal plus whichever sub-entity was written
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Principal after the merge
    pub user: User,
    /// Body composition, when the merge touched it
    pub body_composition: Option<BodyComposition>,
    /// Current measurements, when the merge touched them
    pub measurements: Option<BodyMeasurements>,
    /// Goal measurements, when the merge touched them
    pub goal_measurements: Option<GoalMeasurements>,
    /// Payload keys that matched no field, sorted
    pub ignored_fields: Vec<String>,
}

impl MergeOutcome {
    /// Principal rendered with frontend field names
    #[must_use]
    pub fn user_json(&self) -> Value {
        user_view(&self.user)
    }

    /// Body composition rendered with frontend field names
    #[must_use]
    pub fn body_composition_json(&self) -> Value {
        self.body_composition
            .as_ref()
            .map_or(Value::Null, composition_view)
    }

    /// Current measurements rendered with frontend field names
    #[must_use]
    pub fn measurements_json(&self) -> Value {
        self.measurements.as_ref().map_or(Value::Null, measurements_view)
    }

    /// Goal measurements rendered with frontend field names
    #[must_use]
    pub fn goal_measurements_json(&self) -> Value {
        self.goal_measurements.as_ref().map_or(Value::Null, goals_view)
    }
}

/// Principal with every one-to-one body entity
#[derive(Debug, Clone)]
pub struct CompleteProfile {
    /// Principal
    pub user: User,
    /// Body composition, if created yet
    pub body_composition: Option<BodyComposition>,
    /// Current measurements, if created yet
    pub current_measurements: Option<BodyMeasurements>,
    /// Goal measurements, if created yet
    pub goal_measurements: Option<GoalMeasurements>,
}

impl CompleteProfile {
    /// Render with frontend field names and nested sub-entities
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut view = user_view(&self.user);
        view["bodyComposition"] = self
            .body_composition
            .as_ref()
            .map_or(Value::Null, composition_view);
        view["currentMeasurements"] = self
            .current_measurements
            .as_ref()
            .map_or(Value::Null, measurements_view);
        view["goalMeasurements"] = self
            .goal_measurements
            .as_ref()
            .map_or(Value::Null, goals_view);
        view
    }
}

/// Applies onboarding steps and profile edits
pub struct ProfileMergeEngine {
    database: Arc<Database>,
}

impl ProfileMergeEngine {
    /// Create an engine over the shared database
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Apply one onboarding step
    ///
    /// The step name is validated before anything else; errors raised while
    /// parsing or writing carry the step in their details.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for an unknown step, a field validation error,
    /// `RESOURCE_NOT_FOUND` if the user is gone, or a database error
    pub async fn apply_step(
        &self,
        user_id: Uuid,
        step: &str,
        data: &Value,
    ) -> AppResult<(OnboardingStep, MergeOutcome)> {
        let step: OnboardingStep = step.parse().inspect_err(|e: &AppError| {
            warn!(user_id = %user_id, error = %e, "Rejected unknown onboarding step");
        })?;

        let outcome = async {
            let plan = MergePlan::for_step(step, data)?;
            self.merge(user_id, plan).await
        }
        .await
        .map_err(|e| {
            log_failure(user_id, step.as_str(), &e);
            e.with_detail("step", step.as_str())
        })?;

        info!(
            user_id = %user_id,
            step = %step,
            terminal = step.is_terminal(),
            ignored_fields = outcome.ignored_fields.len(),
            "Onboarding step applied"
        );
        Ok((step, outcome))
    }

    /// Merge a direct profile edit onto the principal
    ///
    /// # Errors
    ///
    /// Returns a field validation error, `RESOURCE_NOT_FOUND`, or a database error
    pub async fn update_profile(&self, user_id: Uuid, data: &Value) -> AppResult<MergeOutcome> {
        self.merge_payload(user_id, "profile_update", data, |payload, tracker| {
            Ok(MergePlan {
                profile: parse_profile(payload, PROFILE_UPDATE_FIELDS, tracker)?,
                ..MergePlan::default()
            })
        })
        .await
    }

    /// Merge a payload onto the body composition row, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns a field validation error, `RESOURCE_NOT_FOUND`, or a database error
    pub async fn update_body_composition(
        &self,
        user_id: Uuid,
        data: &Value,
    ) -> AppResult<MergeOutcome> {
        self.merge_payload(user_id, "body_composition", data, |payload, tracker| {
            Ok(MergePlan {
                composition: Some(parse_composition(payload, tracker)?),
                ..MergePlan::default()
            })
        })
        .await
    }

    /// Merge a payload onto the current measurements row, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns a field validation error, `RESOURCE_NOT_FOUND`, or a database error
    pub async fn update_body_measurements(
        &self,
        user_id: Uuid,
        data: &Value,
    ) -> AppResult<MergeOutcome> {
        self.merge_payload(user_id, "measurements", data, |payload, tracker| {
            Ok(MergePlan {
                measurements: Some(parse_measurements(payload, tracker)?),
                ..MergePlan::default()
            })
        })
        .await
    }

    /// Merge a payload onto the goal measurements row, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns a field validation error, `RESOURCE_NOT_FOUND`, or a database error
    pub async fn update_goal_measurements(
        &self,
        user_id: Uuid,
        data: &Value,
    ) -> AppResult<MergeOutcome> {
        self.merge_payload(user_id, "goal_measurements", data, |payload, tracker| {
            Ok(MergePlan {
                goals: Some(parse_goal_measurements(payload, tracker)?),
                ..MergePlan::default()
            })
        })
        .await
    }

    /// Mark onboarding complete without touching any other field
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` or a database error
    pub async fn complete_onboarding(&self, user_id: Uuid) -> AppResult<User> {
        let plan = MergePlan {
            profile: ProfilePatch {
                complete_onboarding: true,
                ..ProfilePatch::default()
            },
            ..MergePlan::default()
        };
        let outcome = self.merge(user_id, plan).await.inspect_err(|e| {
            log_failure(user_id, "complete", e);
        })?;
        info!(user_id = %user_id, "Onboarding marked complete");
        Ok(outcome.user)
    }

    /// Principal with every body entity that exists
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the user does not exist, or a database error
    pub async fn get_complete_profile(&self, user_id: Uuid) -> AppResult<CompleteProfile> {
        let user = self
            .database
            .users()
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User").with_user_id(user_id))?;
        let body = self.database.body();

        Ok(CompleteProfile {
            user,
            body_composition: body.get_body_composition(user_id).await?,
            current_measurements: body.get_body_measurements(user_id).await?,
            goal_measurements: body.get_goal_measurements(user_id).await?,
        })
    }

    async fn merge_payload<F>(
        &self,
        user_id: Uuid,
        operation: &'static str,
        data: &Value,
        parse: F,
    ) -> AppResult<MergeOutcome>
    where
        F: FnOnce(&Payload, &mut KeyTracker) -> AppResult<MergePlan>,
    {
        let result = async {
            let payload = as_payload(data)?;
            let mut tracker = KeyTracker::default();
            let mut plan = parse(payload, &mut tracker)?;
            plan.ignored_fields = tracker.ignored(payload);
            self.merge(user_id, plan).await
        }
        .await;

        match result {
            Ok(outcome) => {
                info!(
                    user_id = %user_id,
                    operation,
                    ignored_fields = outcome.ignored_fields.len(),
                    "Profile merge applied"
                );
                Ok(outcome)
            }
            Err(e) => {
                log_failure(user_id, operation, &e);
                Err(e)
            }
        }
    }

    async fn merge(&self, user_id: Uuid, plan: MergePlan) -> AppResult<MergeOutcome> {
        let pool = self.database.pool();
        let writes = &plan;

        let (user, body_composition, measurements, goal_measurements) = retry_transaction(
            || async move {
                let mut guard = begin_immediate(pool).await?;

                // Fail with not-found before any body row references a missing user
                UserManager::get_user_in(guard.executor()?, user_id).await?;

                if !writes.profile.is_empty() {
                    UserManager::apply_profile_patch(guard.executor()?, user_id, &writes.profile)
                        .await?;
                }

                let composition = match &writes.composition {
                    Some(patch) => Some(
                        BodyStateManager::merge_body_composition(guard.executor()?, user_id, patch)
                            .await?,
                    ),
                    None => None,
                };
                let measurements = match &writes.measurements {
                    Some(patch) => Some(
                        BodyStateManager::merge_body_measurements(
                            guard.executor()?,
                            user_id,
                            patch,
                        )
                        .await?,
                    ),
                    None => None,
                };
                let goals = match &writes.goals {
                    Some(patch) => Some(
                        BodyStateManager::merge_goal_measurements(guard.executor()?, user_id, patch)
                            .await?,
                    ),
                    None => None,
                };

                let user = UserManager::get_user_in(guard.executor()?, user_id).await?;
                guard.commit().await?;
                Ok((user, composition, measurements, goals))
            },
            TRANSACTION_MAX_RETRIES,
        )
        .await?;

        Ok(MergeOutcome {
            user,
            body_composition,
            measurements,
            goal_measurements,
            ignored_fields: plan.ignored_fields,
        })
    }
}

fn log_failure(user_id: Uuid, operation: &str, error: &AppError) {
    if error.code.is_client_error() {
        warn!(user_id = %user_id, operation, error = %error, "Profile merge rejected");
    } else {
        error!(user_id = %user_id, operation, error = %error, "Profile merge failed");
    }
}
