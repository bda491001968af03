// ABOUTME: Integration tests for progress snapshots, stats, and paginated history
// ABOUTME: Runs the progress aggregator against an in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::NaiveDate;
use fittransform_server::errors::ErrorCode;
use fittransform_server::pagination::PageRequest;
use serde_json::json;

#[tokio::test]
async fn test_same_date_upserts_one_entry() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "upsert@example.com").await;

    let first = resources
        .progress
        .save_entry(user.id, &json!({ "date": "2024-01-01", "weight": 80, "waist": 90 }))
        .await
        .unwrap();
    assert!(first.created);

    let second = resources
        .progress
        .save_entry(user.id, &json!({ "date": "2024-01-01", "weight": 79.5 }))
        .await
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.entry.id, first.entry.id);
    assert_eq!(second.entry.weight, Some(79.5));
    // Fields absent from the second save are kept
    assert_eq!(second.entry.measurements.waist, Some(90.0));

    let history = resources
        .progress
        .get_history(user.id, PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(history.pagination.total_count, 1);
}

#[tokio::test]
async fn test_date_is_required() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "nodate@example.com").await;

    let err = resources
        .progress
        .save_entry(user.id, &json!({ "weight": 80 }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    assert_eq!(err.context.details["field"], "date");
}

#[tokio::test]
async fn test_stats_without_entries_is_no_data() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "empty@example.com").await;

    let stats = resources.progress.get_stats(user.id).await.unwrap();
    assert!(!stats.has_data);
    assert_eq!(stats.total_entries, 0);
    assert!(stats.summary.is_none());
}

#[tokio::test]
async fn test_stats_with_one_entry_has_zero_change() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "single@example.com").await;

    resources
        .progress
        .save_entry(user.id, &json!({ "date": "2024-02-10", "weight": 72 }))
        .await
        .unwrap();

    let stats = resources.progress.get_stats(user.id).await.unwrap();
    let summary = stats.summary.unwrap();
    assert_eq!(summary.weight_change, Some(0.0));
    assert_eq!(summary.current_weight, Some(72.0));
    assert_eq!(summary.latest_date, summary.earliest_date);
}

#[tokio::test]
async fn test_stats_compare_latest_with_earliest() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "delta@example.com").await;

    // Saved out of order: latest first
    resources
        .progress
        .save_entry(user.id, &json!({ "date": "2024-03-01", "weight": 75, "waist": 84 }))
        .await
        .unwrap();
    resources
        .progress
        .save_entry(user.id, &json!({ "date": "2024-01-01", "weight": 80, "waist": 90 }))
        .await
        .unwrap();

    let stats = resources.progress.get_stats(user.id).await.unwrap();
    assert_eq!(stats.total_entries, 2);
    let summary = stats.summary.unwrap();
    assert_eq!(summary.weight_change, Some(-5.0));
    assert_eq!(summary.latest_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(summary.measurement_changes.get("waist"), Some(&-6.0));
}

#[tokio::test]
async fn test_history_pages_over_twenty_five_entries() {
    let resources = common::create_test_resources().await;
    let (user, _) = common::create_test_user(&resources, "pages@example.com").await;

    for day in 1..=25 {
        resources
            .progress
            .save_entry(
                user.id,
                &json!({ "date": format!("2024-01-{day:02}"), "weight": 80 }),
            )
            .await
            .unwrap();
    }

    let page_two = resources
        .progress
        .get_history(user.id, PageRequest::new(2, 10))
        .await
        .unwrap();
    assert_eq!(page_two.items.len(), 10);
    assert!(page_two.pagination.has_next);
    assert_eq!(page_two.pagination.total_count, 25);
    // Newest first: entries 11-20 are Jan 15 down to Jan 6
    assert_eq!(page_two.items[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    assert_eq!(page_two.items[9].date, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());

    let page_three = resources
        .progress
        .get_history(user.id, PageRequest::new(3, 10))
        .await
        .unwrap();
    assert_eq!(page_three.items.len(), 5);
    assert!(!page_three.pagination.has_next);
}

#[tokio::test]
async fn test_entries_are_scoped_to_their_owner() {
    let resources = common::create_test_resources().await;
    let (owner, _) = common::create_test_user(&resources, "owner@example.com").await;
    let (other, _) = common::create_test_user(&resources, "other@example.com").await;

    let saved = resources
        .progress
        .save_entry(owner.id, &json!({ "date": "2024-05-05", "weight": 70 }))
        .await
        .unwrap();

    let err = resources
        .progress
        .get_entry(other.id, saved.entry.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    let err = resources
        .progress
        .delete_entry(other.id, saved.entry.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    resources
        .progress
        .delete_entry(owner.id, saved.entry.id)
        .await
        .unwrap();
    let err = resources
        .progress
        .get_entry(owner.id, saved.entry.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}
