// ABOUTME: Dated progress snapshot model, one row per user per calendar date
// ABOUTME: Holds weight, the ten body measurements, a composition snapshot, and analytics periods
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::body::Measurements;
use crate::errors::AppError;

/// Progress snapshot for one (user, date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// Row identifier
    pub id: i64,
    /// Owner
    pub user_id: Uuid,
    /// Calendar date of the snapshot, unique per owner
    pub date: NaiveDate,
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// The ten body measurements, flattened on the wire
    #[serde(flatten)]
    pub measurements: Measurements,
    /// Body fat percentage
    pub body_fat: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass: Option<f64>,
    /// Body mass index
    pub bmi: Option<f64>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last upsert time
    pub updated_at: DateTime<Utc>,
}

/// Window summarised by the analytics view, ending on a given day
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsPeriod {
    /// Seven days
    Week,
    /// Thirty days
    #[default]
    Month,
    /// Ninety days
    Quarter,
    /// 365 days
    Year,
}

impl AnalyticsPeriod {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Days in the window, including both ends
    #[must_use]
    pub const fn days(&self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
        }
    }
}

impl Display for AnalyticsPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyticsPeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            _ => Err(AppError::invalid_input(format!(
                "Invalid analytics period: {s} (expected week, month, quarter, or year)"
            ))),
        }
    }
}
