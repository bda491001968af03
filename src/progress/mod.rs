// ABOUTME: Progress aggregator for dated body snapshots
// ABOUTME: Upserts one entry per (user, date) and serves stats, period analytics, and history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

/// Trailing-window analytics over snapshots and completed workouts
pub mod analytics;
/// Latest-versus-earliest delta computation
pub mod stats;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

pub use analytics::{analytics_window, compute_analytics, ProgressAnalytics};
pub use stats::{compute_progress_stats, ProgressStats, ProgressSummary};

use crate::database::{Database, ProgressEntryInput};
use crate::errors::{AppError, AppResult};
use crate::models::{AnalyticsPeriod, ProgressEntry};
use crate::onboarding::fields::{parse_measurements, KeyTracker};
use crate::pagination::{Page, PageRequest};
use crate::utils::payload::{as_payload, read_date, read_non_negative_f64, read_text, Payload};

const BODY_FAT_ALIASES: &[&str] = &["body_fat", "bodyFat"];
const MUSCLE_MASS_ALIASES: &[&str] = &["muscle_mass", "muscleMass"];

/// Result of saving a snapshot
#[derive(Debug, Clone)]
pub struct SavedProgressEntry {
    /// Entry after the upsert
    pub entry: ProgressEntry,
    /// Whether no entry existed for that date before
    pub created: bool,
    /// Payload keys that matched no field, sorted
    pub ignored_fields: Vec<String>,
}

/// Parse a progress payload; `date` is required
fn parse_entry(payload: &Payload) -> AppResult<(ProgressEntryInput, Vec<String>)> {
    let mut tracker = KeyTracker::default();

    let date = match tracker.lookup(payload, &["date"]) {
        Some((key, value)) => read_date(value, key)?,
        None => None,
    }
    .ok_or_else(|| AppError::missing_field("date"))?;

    let weight = match tracker.lookup(payload, &["weight"]) {
        Some((key, value)) => read_non_negative_f64(value, key)?,
        None => None,
    };
    let measurements = parse_measurements(payload, &mut tracker)?;
    let body_fat = match tracker.lookup(payload, BODY_FAT_ALIASES) {
        Some((key, value)) => read_non_negative_f64(value, key)?,
        None => None,
    };
    let muscle_mass = match tracker.lookup(payload, MUSCLE_MASS_ALIASES) {
        Some((key, value)) => read_non_negative_f64(value, key)?,
        None => None,
    };
    let bmi = match tracker.lookup(payload, &["bmi"]) {
        Some((key, value)) => read_non_negative_f64(value, key)?,
        None => None,
    };
    let notes = match tracker.lookup(payload, &["notes"]) {
        Some((key, value)) => read_text(value, key)?,
        None => None,
    };

    let input = ProgressEntryInput {
        date,
        weight,
        measurements,
        body_fat,
        muscle_mass,
        bmi,
        notes,
    };
    Ok((input, tracker.ignored(payload)))
}

/// Progress snapshot aggregator
pub struct ProgressAggregator {
    database: Arc<Database>,
}

impl ProgressAggregator {
    /// Create an aggregator over the shared database
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Save the snapshot for the payload's date, merging onto any existing entry
    ///
    /// # Errors
    ///
    /// Returns `MISSING_REQUIRED_FIELD` without a date, a field validation
    /// error, or a database error
    pub async fn save_entry(&self, user_id: Uuid, data: &Value) -> AppResult<SavedProgressEntry> {
        let (input, ignored_fields) = as_payload(data)
            .and_then(parse_entry)
            .inspect_err(|e| {
                warn!(user_id = %user_id, error = %e, "Rejected progress entry");
            })?;

        let progress = self.database.progress();
        let upsert = progress.upsert_entry(user_id, &input).await?;
        let entry = progress
            .get_entry(user_id, upsert.id)
            .await?
            .ok_or_else(|| AppError::internal("Progress entry missing after upsert"))?;

        info!(
            user_id = %user_id,
            entry_id = entry.id,
            date = %entry.date,
            created = upsert.created,
            "Progress entry saved"
        );
        Ok(SavedProgressEntry {
            entry,
            created: upsert.created,
            ignored_fields,
        })
    }

    /// Deltas and current values across all of the user's entries
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_stats(&self, user_id: Uuid) -> AppResult<ProgressStats> {
        let entries = self.database.progress().all_entries_desc(user_id).await?;
        Ok(compute_progress_stats(&entries))
    }

    /// Weight, body-fat, and workout summary for the window ending on `end`
    ///
    /// The period defaults to a month and the end date to today.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_FORMAT` for an unknown period or a malformed date
    pub async fn get_analytics(
        &self,
        user_id: Uuid,
        period: Option<&str>,
        end: Option<&str>,
    ) -> AppResult<ProgressAnalytics> {
        let period = period
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.parse::<AnalyticsPeriod>()
                    .map_err(|e| AppError::invalid_format("period", e.message))
            })
            .transpose()?
            .unwrap_or_default();
        let end = end
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| {
                NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|_| {
                    AppError::invalid_format("end", "end must be a date (YYYY-MM-DD)")
                })
            })
            .transpose()?
            .unwrap_or_else(|| Utc::now().date_naive());

        let (from, to) = analytics_window(period, end);
        let entries = self.database.progress().entries_between(user_id, from, to).await?;
        let workouts = self
            .database
            .workouts()
            .completed_workouts_between(user_id, from, to)
            .await?;
        Ok(compute_analytics(period, end, &entries, &workouts))
    }

    /// One page of entries, newest date first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_history(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Page<ProgressEntry>> {
        let progress = self.database.progress();
        let total = progress.count_entries(user_id).await?;
        let items = progress.list_entries(user_id, page).await?;
        Ok(Page::new(items, page, total))
    }

    /// One entry owned by the user
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` when the entry does not exist or belongs to
    /// someone else
    pub async fn get_entry(&self, user_id: Uuid, entry_id: i64) -> AppResult<ProgressEntry> {
        self.database
            .progress()
            .get_entry(user_id, entry_id)
            .await?
            .ok_or_else(|| entry_not_found(user_id, entry_id))
    }

    /// Delete one entry owned by the user
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` when the entry does not exist or belongs to
    /// someone else
    pub async fn delete_entry(&self, user_id: Uuid, entry_id: i64) -> AppResult<()> {
        if !self.database.progress().delete_entry(user_id, entry_id).await? {
            return Err(entry_not_found(user_id, entry_id));
        }
        info!(user_id = %user_id, entry_id, "Progress entry deleted");
        Ok(())
    }
}

fn entry_not_found(user_id: Uuid, entry_id: i64) -> AppError {
    AppError::not_found("Progress entry")
        .with_user_id(user_id)
        .with_resource_id(entry_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_date_is_required() {
        let body = json!({ "weight": 80 });
        let err = parse_entry(as_payload(&body).unwrap()).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
        assert_eq!(err.context.details["field"], "date");

        let body = json!({ "date": "", "weight": 80 });
        assert!(parse_entry(as_payload(&body).unwrap()).is_err());
    }

    #[test]
    fn test_accepts_both_measurement_spellings() {
        let body = json!({
            "date": "2024-01-01",
            "weight": "80.5",
            "leftarm": 30,
            "right_thigh": 55,
            "bodyFat": 20,
            "notes": "felt strong",
            "mood": "great"
        });
        let (input, ignored) = parse_entry(as_payload(&body).unwrap()).unwrap();

        assert_eq!(input.weight, Some(80.5));
        assert_eq!(input.measurements.left_arm, Some(30.0));
        assert_eq!(input.measurements.right_thigh, Some(55.0));
        assert_eq!(input.body_fat, Some(20.0));
        assert_eq!(input.notes.as_deref(), Some("felt strong"));
        assert_eq!(ignored, vec!["mood"]);
    }
}
