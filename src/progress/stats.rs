// ABOUTME: Longitudinal progress deltas computed from a user's dated snapshots
// ABOUTME: Pure functions over entries ordered newest first; no storage access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{MeasurementField, ProgressEntry};

const NO_DATA_MESSAGE: &str = "No progress data available";

/// Progress summary, or the explicit no-data result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressStats {
    /// False when the user has no entries
    pub has_data: bool,
    /// Number of entries considered
    pub total_entries: usize,
    /// Present only when `has_data` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    /// Deltas and current values; absent when there is no data
    #[serde(flatten)]
    pub summary: Option<ProgressSummary>,
}

/// Latest-versus-earliest comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    /// Date of the most recent entry
    pub latest_date: NaiveDate,
    /// Date of the oldest entry
    pub earliest_date: NaiveDate,
    /// Weight on the latest entry
    pub current_weight: Option<f64>,
    /// Body fat on the latest entry
    pub current_body_fat: Option<f64>,
    /// BMI on the latest entry
    pub current_bmi: Option<f64>,
    /// Latest minus earliest weight, when both exist
    pub weight_change: Option<f64>,
    /// Latest minus earliest per measurement, only where both sides exist
    pub measurement_changes: BTreeMap<&'static str, f64>,
}

impl ProgressStats {
    /// The explicit no-data result
    #[must_use]
    pub const fn no_data() -> Self {
        Self {
            has_data: false,
            total_entries: 0,
            message: Some(NO_DATA_MESSAGE),
            summary: None,
        }
    }
}

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn delta(latest: Option<f64>, earliest: Option<f64>) -> Option<f64> {
    Some(round2(latest? - earliest?))
}

/// Compare the newest entry against the oldest
///
/// `entries` must be ordered by date, newest first. With a single entry the
/// latest and earliest are the same row and every delta is zero.
#[must_use]
pub fn compute_progress_stats(entries: &[ProgressEntry]) -> ProgressStats {
    let (Some(latest), Some(earliest)) = (entries.first(), entries.last()) else {
        return ProgressStats::no_data();
    };

    let measurement_changes = MeasurementField::ALL
        .iter()
        .filter_map(|field| {
            delta(
                latest.measurements.get(*field),
                earliest.measurements.get(*field),
            )
            .map(|change| (field.as_str(), change))
        })
        .collect();

    ProgressStats {
        has_data: true,
        total_entries: entries.len(),
        message: None,
        summary: Some(ProgressSummary {
            latest_date: latest.date,
            earliest_date: earliest.date,
            current_weight: latest.weight,
            current_body_fat: latest.body_fat,
            current_bmi: latest.bmi,
            weight_change: delta(latest.weight, earliest.weight),
            measurement_changes,
        }),
    }
}
