//! Field-level validators shared by request DTOs.
//!
//! The `validate_*` functions plug into `#[validate(custom(function = ...))]`
//! and carry the user-facing message of the constraint they check.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::Error as _, Deserialize, Deserializer};
use uuid::Uuid;
use validator::ValidationError;

use crate::constants::messages;
use crate::models::MeasureType;

/// Base64 data URL for common raster/vector image types. Only the prefix is anchored.
static IMAGE_DATA_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^data:image/(?:gif|png|jpeg|bmp|webp|svg\+xml)(?:;charset=utf-8)?;base64,(?:[A-Za-z0-9]|[+/])+={0,2}",
    )
    .expect("image data URL pattern is valid")
});

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn is_image_data_url(value: &str) -> bool {
    IMAGE_DATA_URL.is_match(value)
}

/// Hyphenated UUID, case-insensitive
pub fn is_uuid(value: &str) -> bool {
    value.len() == 36 && Uuid::parse_str(value).is_ok()
}

/// Parse a capture timestamp. Offsets are honoured; naive values are read as UTC.
pub fn parse_measure_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Some(parsed) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(parsed.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn validate_image(value: &str) -> Result<(), ValidationError> {
    if is_image_data_url(value) {
        Ok(())
    } else {
        Err(failure("image", messages::INVALID_IMAGE))
    }
}

pub fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    if is_uuid(value) {
        Ok(())
    } else {
        Err(failure("uuid", messages::INVALID_UUID))
    }
}

pub fn validate_measure_datetime(value: &str) -> Result<(), ValidationError> {
    match parse_measure_datetime(value) {
        Some(_) => Ok(()),
        None => Err(failure("date", messages::INVALID_DATE)),
    }
}

pub fn validate_measure_type(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<MeasureType>()
        .map(|_| ())
        .map_err(|_| failure("measure_type", messages::INVALID_MEASURE_TYPE))
}

/// Deserialize a JSON number with no fractional part, so `3` and `3.0` are both 3
pub fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }

    // i64::MIN is exact as f64; i64::MAX rounds up to 2^63
    match number.as_f64() {
        Some(value)
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(D::Error::custom(messages::NOT_AN_INTEGER)),
    }
}
