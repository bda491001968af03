// ABOUTME: Lenient readers for flat JSON request payloads
// ABOUTME: Accept numbers or numeric strings, treat null and empty strings as absent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTransform

//! Field readers shared by the onboarding, progress, and workout engines.
//!
//! Every reader takes the raw [`Value`] and the external field name, so a
//! rejected value is reported with the name the client actually sent.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Number, Value};

use crate::errors::{AppError, AppResult};

/// Flat key/value request payload
pub type Payload = Map<String, Value>;

/// View a request body as a flat object
///
/// # Errors
///
/// Returns `INVALID_INPUT` if the body is not a JSON object
pub fn as_payload(body: &Value) -> AppResult<&Payload> {
    body.as_object()
        .ok_or_else(|| AppError::invalid_input("Request body must be a JSON object"))
}

/// First present key among aliases, with the alias that matched
#[must_use]
pub fn lookup<'a>(payload: &'a Payload, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|key| payload.get(*key).map(|value| (*key, value)))
}

/// Null or a blank string
fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Read a number, `None` when absent
///
/// # Errors
///
/// Returns `INVALID_FORMAT` for non-numeric or non-finite values
pub fn read_f64(value: &Value, field: &str) -> AppResult<Option<f64>> {
    if is_absent(value) {
        return Ok(None);
    }
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(AppError::invalid_format(
            field,
            format!("{field} must be a number"),
        )),
    }
}

/// Read a number that may not be negative
///
/// # Errors
///
/// Returns `INVALID_FORMAT` for non-numeric values and `VALUE_OUT_OF_RANGE`
/// for negative ones
pub fn read_non_negative_f64(value: &Value, field: &str) -> AppResult<Option<f64>> {
    let number = read_f64(value, field)?;
    if number.is_some_and(|n| n < 0.0) {
        return Err(AppError::out_of_range(
            field,
            format!("{field} must not be negative"),
        ));
    }
    Ok(number)
}

/// Read a whole number, accepting `"42"` and `42.0`
///
/// # Errors
///
/// Returns `INVALID_FORMAT` for fractional or non-numeric values and
/// `VALUE_OUT_OF_RANGE` when the value does not fit in 32 bits
pub fn read_i32(value: &Value, field: &str) -> AppResult<Option<i32>> {
    let Some(number) = read_f64(value, field)? else {
        return Ok(None);
    };
    if number.fract() != 0.0 {
        return Err(AppError::invalid_format(
            field,
            format!("{field} must be a whole number"),
        ));
    }
    if number < f64::from(i32::MIN) || number > f64::from(i32::MAX) {
        return Err(AppError::out_of_range(field, format!("{field} is too large")));
    }
    Ok(Some(number as i32))
}

/// Read a whole number that may not be negative
///
/// # Errors
///
/// Same as [`read_i32`], plus `VALUE_OUT_OF_RANGE` for negative values
pub fn read_non_negative_i32(value: &Value, field: &str) -> AppResult<Option<i32>> {
    let number = read_i32(value, field)?;
    if number.is_some_and(|n| n < 0) {
        return Err(AppError::out_of_range(
            field,
            format!("{field} must not be negative"),
        ));
    }
    Ok(number)
}

/// Read a whole number within an inclusive range
///
/// # Errors
///
/// Same as [`read_i32`], plus `VALUE_OUT_OF_RANGE` outside `min..=max`
pub fn read_ranged_i32(value: &Value, field: &str, min: i32, max: i32) -> AppResult<Option<i32>> {
    let number = read_i32(value, field)?;
    if number.is_some_and(|n| !(min..=max).contains(&n)) {
        return Err(AppError::out_of_range(
            field,
            format!("{field} must be between {min} and {max}"),
        ));
    }
    Ok(number)
}

/// Render a number the way a client would type it; whole floats lose their `.0`
fn render_number(number: &Number) -> String {
    if number.is_f64() {
        if let Some(n) = number.as_f64() {
            if n.fract() == 0.0 && n.abs() < 9.0e15 {
                return (n as i64).to_string();
            }
        }
    }
    number.to_string()
}

/// Read a trimmed string; numbers are accepted and rendered
///
/// # Errors
///
/// Returns `INVALID_FORMAT` for booleans, arrays, and objects
pub fn read_string(value: &Value, field: &str) -> AppResult<Option<String>> {
    if is_absent(value) {
        return Ok(None);
    }
    match value {
        Value::String(s) => Ok(Some(s.trim().to_owned())),
        Value::Number(n) => Ok(Some(render_number(n))),
        _ => Err(AppError::invalid_format(
            field,
            format!("{field} must be a string"),
        )),
    }
}

/// Read a flag, accepting `true`/`false`, `"true"`/`"false"`, and `1`/`0`
///
/// # Errors
///
/// Returns `INVALID_FORMAT` for any other value
pub fn read_bool(value: &Value, field: &str) -> AppResult<Option<bool>> {
    if is_absent(value) {
        return Ok(None);
    }
    let flag = match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    };
    flag.map(Some).ok_or_else(|| {
        AppError::invalid_format(field, format!("{field} must be true or false"))
    })
}

/// Read a free-text value without trimming, keeping empty strings absent
///
/// # Errors
///
/// Returns `INVALID_FORMAT` for non-string values
pub fn read_text(value: &Value, field: &str) -> AppResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(AppError::invalid_format(
            field,
            format!("{field} must be a string"),
        )),
    }
}

/// Read an enumerated value through its `FromStr` implementation
///
/// # Errors
///
/// Returns `INVALID_FORMAT` naming the field when the value is not recognised
pub fn read_enum<T>(value: &Value, field: &str) -> AppResult<Option<T>>
where
    T: FromStr<Err = AppError>,
{
    read_string(value, field)?
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| AppError::invalid_format(field, e.message))
        })
        .transpose()
}

/// Read a `YYYY-MM-DD` calendar date
///
/// # Errors
///
/// Returns `INVALID_FORMAT` when the value is not a valid date
pub fn read_date(value: &Value, field: &str) -> AppResult<Option<NaiveDate>> {
    read_string(value, field)?
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                AppError::invalid_format(field, format!("{field} must be a date (YYYY-MM-DD)"))
            })
        })
        .transpose()
}

/// Read an RFC 3339 timestamp
///
/// # Errors
///
/// Returns `INVALID_FORMAT` when the value is not RFC 3339
pub fn read_timestamp(value: &Value, field: &str) -> AppResult<Option<DateTime<Utc>>> {
    read_string(value, field)?
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| {
                    AppError::invalid_format(field, format!("{field} must be an RFC 3339 timestamp"))
                })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::models::Gender;
    use serde_json::json;

    #[test]
    fn test_numbers_and_numeric_strings() {
        assert_eq!(read_f64(&json!(72.5), "weight").unwrap(), Some(72.5));
        assert_eq!(read_f64(&json!(" 72.5 "), "weight").unwrap(), Some(72.5));
        assert_eq!(read_f64(&json!(null), "weight").unwrap(), None);
        assert_eq!(read_f64(&json!(""), "weight").unwrap(), None);
    }

    #[test]
    fn test_rejections_name_the_field() {
        let err = read_f64(&json!("heavy"), "bodyFat").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.context.details["field"], "bodyFat");

        let err = read_non_negative_f64(&json!(-1), "waist").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.context.details["field"], "waist");

        assert!(read_f64(&json!(true), "weight").is_err());
    }

    #[test]
    fn test_integers() {
        assert_eq!(read_i32(&json!("30"), "age").unwrap(), Some(30));
        assert_eq!(read_i32(&json!(30.0), "age").unwrap(), Some(30));
        assert_eq!(
            read_i32(&json!(30.5), "age").unwrap_err().code,
            ErrorCode::InvalidFormat
        );
        assert_eq!(
            read_i32(&json!(1e12), "age").unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
        assert!(read_ranged_i32(&json!(6), "rating", 1, 5).is_err());
        assert_eq!(read_ranged_i32(&json!(5), "rating", 1, 5).unwrap(), Some(5));
    }

    #[test]
    fn test_enum_and_date_readers() {
        assert_eq!(
            read_enum::<Gender>(&json!("Female"), "gender").unwrap(),
            Some(Gender::Female)
        );
        let err = read_enum::<Gender>(&json!("robot"), "gender").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.context.details["field"], "gender");

        assert_eq!(
            read_date(&json!("2024-03-01"), "date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert!(read_date(&json!("03/01/2024"), "date").is_err());
    }

    #[test]
    fn test_numeric_strings_render_whole_floats_as_integers() {
        assert_eq!(read_string(&json!(7), "exercise_id").unwrap().as_deref(), Some("7"));
        assert_eq!(read_string(&json!(7.0), "exercise_id").unwrap().as_deref(), Some("7"));
        assert_eq!(read_string(&json!(-3.0), "id").unwrap().as_deref(), Some("-3"));
        assert_eq!(read_string(&json!(7.5), "id").unwrap().as_deref(), Some("7.5"));
        assert_eq!(read_string(&json!(" 7 "), "id").unwrap().as_deref(), Some("7"));
    }

    #[test]
    fn test_flags() {
        assert_eq!(read_bool(&json!(true), "is_public").unwrap(), Some(true));
        assert_eq!(read_bool(&json!("False"), "is_public").unwrap(), Some(false));
        assert_eq!(read_bool(&json!(1), "is_public").unwrap(), Some(true));
        assert_eq!(read_bool(&json!(null), "is_public").unwrap(), None);
        let err = read_bool(&json!("yes"), "is_rest_day").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.context.details["field"], "is_rest_day");
    }

    #[test]
    fn test_lookup_prefers_first_alias() {
        let payload = json!({ "left_arm": 30, "leftarm": 31 });
        let payload = as_payload(&payload).unwrap();
        let (key, value) = lookup(payload, &["leftarm", "left_arm"]).unwrap();
        assert_eq!(key, "leftarm");
        assert_eq!(value, &json!(31));
        assert!(lookup(payload, &["chest"]).is_none());
        assert!(as_payload(&json!([1, 2])).is_err());
    }
}
