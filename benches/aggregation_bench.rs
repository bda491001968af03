// ABOUTME: Criterion benchmarks for progress and workout rollups
// ABOUTME: Measures stats computation over synthetic histories of increasing length
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! Criterion benchmarks for the pure aggregation functions behind the
//! progress and workout stats endpoints.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use chrono::{Days, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fittransform_server::models::{Measurements, ProgressEntry, SessionStatus};
use fittransform_server::progress::stats::compute_progress_stats;
use fittransform_server::workouts::stats::{compute_totals, type_distribution};
use uuid::Uuid;

const HISTORY_SIZES: [usize; 3] = [10, 365, 3650];

#[allow(clippy::cast_precision_loss)]
fn generate_entries(count: usize) -> Vec<ProgressEntry> {
    let user_id = Uuid::new_v4();
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let now = Utc::now();

    // Newest first, as loaded by the progress manager
    (0..count)
        .rev()
        .map(|i| {
            let drift = (i % 40) as f64 * 0.1;
            ProgressEntry {
                id: i as i64,
                user_id,
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                weight: Some(90.0 - drift),
                measurements: Measurements {
                    waist: Some(95.0 - drift),
                    hips: (i % 3 == 0).then_some(100.0 - drift),
                    chest: Some(105.0),
                    ..Measurements::default()
                },
                body_fat: (i % 2 == 0).then_some(24.0 - drift / 2.0),
                muscle_mass: None,
                bmi: Some(27.5 - drift / 4.0),
                notes: None,
                created_at: now,
                updated_at: now,
            }
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn generate_sessions(count: usize) -> Vec<(SessionStatus, Option<i32>)> {
    const STATUSES: [SessionStatus; 4] = [
        SessionStatus::Completed,
        SessionStatus::Completed,
        SessionStatus::InProgress,
        SessionStatus::Cancelled,
    ];
    (0..count)
        .map(|i| (STATUSES[i % STATUSES.len()], (i % 5 != 0).then_some(30 + (i % 60) as i32)))
        .collect()
}

fn generate_types(count: usize) -> Vec<Option<String>> {
    const TYPES: [&str; 4] = ["strength", "cardio", "", "mobility"];
    (0..count)
        .map(|i| (i % 7 != 0).then(|| TYPES[i % TYPES.len()].to_owned()))
        .collect()
}

fn bench_progress_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("progress_stats");

    for size in HISTORY_SIZES {
        let entries = generate_entries(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &entries, |b, entries| {
            b.iter(|| compute_progress_stats(black_box(entries)));
        });
    }

    group.finish();
}

fn bench_workout_totals(c: &mut Criterion) {
    let mut group = c.benchmark_group("workout_totals");

    for size in HISTORY_SIZES {
        let sessions = generate_sessions(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &sessions, |b, sessions| {
            b.iter(|| compute_totals(black_box(sessions)));
        });
    }

    group.finish();
}

fn bench_type_distribution(c: &mut Criterion) {
    let mut group = c.benchmark_group("workout_type_distribution");

    for size in HISTORY_SIZES {
        let types = generate_types(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &types, |b, types| {
            b.iter(|| type_distribution(black_box(types)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_progress_stats,
    bench_workout_totals,
    bench_type_distribution,
);
criterion_main!(benches);
