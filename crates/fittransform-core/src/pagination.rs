// ABOUTME: Offset pagination module for page/page_size history views
// ABOUTME: Parses client query strings strictly and computes has_next from the total count
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

use serde::{Deserialize, Serialize};

use crate::constants::pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::errors::{AppError, AppResult};

/// Raw pagination query as received from the client
///
/// Values are kept as strings so that a non-integer page is reported as a
/// validation error naming the parameter instead of a generic extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// 1-indexed page number
    pub page: Option<String>,
    /// Items per page
    pub page_size: Option<String>,
}

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-indexed page number
    pub page: u32,
    /// Items per page
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request without validation (tests and internal callers)
    #[must_use]
    pub const fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Parse page and page size strings
    ///
    /// Absent or empty values take their defaults. Page sizes above `max_page_size`
    /// are clamped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_FORMAT` for non-integer input and `VALUE_OUT_OF_RANGE`
    /// for zero, with the parameter name in the error details
    pub fn parse(
        page: Option<&str>,
        page_size: Option<&str>,
        default_page_size: u32,
        max_page_size: u32,
    ) -> AppResult<Self> {
        let page = parse_positive("page", page)?.unwrap_or(DEFAULT_PAGE);
        let page_size = parse_positive("page_size", page_size)?
            .unwrap_or(default_page_size)
            .min(max_page_size.max(1));
        Ok(Self { page, page_size })
    }

    /// Rows to skip
    #[must_use]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }

    /// Rows to fetch
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

fn parse_positive(name: &str, raw: Option<&str>) -> AppResult<Option<u32>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let value: i64 = raw.parse().map_err(|_| {
        AppError::invalid_format(name, format!("{name} must be an integer, got '{raw}'"))
    })?;

    if value < 1 {
        return Err(AppError::out_of_range(
            name,
            format!("{name} must be at least 1"),
        ));
    }

    Ok(Some(u32::try_from(value).unwrap_or(u32::MAX)))
}

/// Pagination metadata returned with every history view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// Page that was served
    pub page: u32,
    /// Page size that was applied
    pub page_size: u32,
    /// Total rows for the owner
    pub total_count: u64,
    /// Whether another page follows: `page * page_size < total_count`
    pub has_next: bool,
}

impl PaginationInfo {
    /// Compute metadata for a request over `total_count` rows
    #[must_use]
    pub fn new(request: PageRequest, total_count: u64) -> Self {
        let served = u64::from(request.page) * u64::from(request.page_size);
        Self {
            page: request.page,
            page_size: request.page_size,
            total_count,
            has_next: served < total_count,
        }
    }
}

/// One page of items with its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Pagination metadata
    pub pagination: PaginationInfo,
}

impl<T> Page<T> {
    /// Wrap a page of items
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            pagination: PaginationInfo::new(request, total_count),
        }
    }

    /// Convert the items while keeping the metadata
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_defaults_when_absent() {
        let request = PageRequest::parse(None, None, 10, 100).unwrap();
        assert_eq!(request, PageRequest::new(1, 10));
        assert_eq!(request.offset(), 0);

        let empty = PageRequest::parse(Some(""), Some(" "), 10, 100).unwrap();
        assert_eq!(empty, PageRequest::new(1, 10));
    }

    #[test]
    fn test_non_integer_page_is_rejected() {
        let err = PageRequest::parse(Some("two"), None, 10, 100).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.context.details["field"], "page");

        let err = PageRequest::parse(None, Some("1.5"), 10, 100).unwrap_err();
        assert_eq!(err.context.details["field"], "page_size");
    }

    #[test]
    fn test_zero_is_out_of_range() {
        let err = PageRequest::parse(Some("0"), None, 10, 100).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let request = PageRequest::parse(Some("1"), Some("500"), 10, 100).unwrap();
        assert_eq!(request.page_size, 100);
    }

    #[test]
    fn test_has_next_over_twenty_five_rows() {
        let second = PaginationInfo::new(PageRequest::new(2, 10), 25);
        assert!(second.has_next);
        assert_eq!(PageRequest::new(2, 10).offset(), 10);

        let third = PaginationInfo::new(PageRequest::new(3, 10), 25);
        assert!(!third.has_next);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
    }

    #[test]
    fn test_exact_boundary_has_no_next() {
        let info = PaginationInfo::new(PageRequest::new(2, 10), 20);
        assert!(!info.has_next);
    }
}
