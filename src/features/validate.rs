use std::ops::RangeInclusive;

use thiserror::Error;

use super::Feature;
use crate::models::{FeatureSet, RawFlightInput};

/// A raw input field that failed the feature contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: Feature,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: Feature, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

pub const MONTH_RANGE: RangeInclusive<i64> = 1..=12;
pub const DAY_OF_MONTH_RANGE: RangeInclusive<i64> = 1..=31;
/// 1 = Monday, 7 = Sunday.
pub const DAY_OF_WEEK_RANGE: RangeInclusive<i64> = 1..=7;
pub const DEPARTURE_TIME_RANGE: RangeInclusive<i64> = 0..=2359;
pub const CARRIER_CODE_LEN: RangeInclusive<usize> = 2..=3;
pub const AIRPORT_CODE_LEN: RangeInclusive<usize> = 3..=4;

/// Check every field of `raw` and produce a [`FeatureSet`].
///
/// Fields are checked in declaration order and the first failure is
/// returned. Codes are trimmed and upper-cased.
pub fn validate(raw: &RawFlightInput) -> Result<FeatureSet, ValidationError> {
    let month = int_in_range(Feature::Month, raw.month, MONTH_RANGE)?;
    let day_of_month = int_in_range(Feature::DayOfMonth, raw.day_of_month, DAY_OF_MONTH_RANGE)?;
    let day_of_week = int_in_range(Feature::DayOfWeek, raw.day_of_week, DAY_OF_WEEK_RANGE)?;
    let carrier_code = code(Feature::CarrierCode, &raw.op_unique_carrier, CARRIER_CODE_LEN)?;
    let origin_airport = code(Feature::OriginAirport, &raw.origin, AIRPORT_CODE_LEN)?;
    let destination_airport = code(Feature::DestinationAirport, &raw.dest, AIRPORT_CODE_LEN)?;
    let scheduled_departure_time = hhmm(raw.crs_dep_time)?;

    if !raw.dep_delay.is_finite() {
        return Err(ValidationError::new(
            Feature::DepartureDelayMinutes,
            "must be a finite number",
        ));
    }
    if !raw.distance.is_finite() || raw.distance < 0.0 {
        return Err(ValidationError::new(
            Feature::DistanceMiles,
            format!("{} is not a non-negative distance", raw.distance),
        ));
    }

    Ok(FeatureSet {
        month: month as u8,
        day_of_month: day_of_month as u8,
        day_of_week: day_of_week as u8,
        carrier_code,
        origin_airport,
        destination_airport,
        scheduled_departure_time: scheduled_departure_time as u16,
        departure_delay_minutes: raw.dep_delay,
        distance_miles: raw.distance,
    })
}

fn int_in_range(
    field: Feature,
    value: i64,
    range: RangeInclusive<i64>,
) -> Result<i64, ValidationError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::new(
            field,
            format!("{value} is outside {}-{}", range.start(), range.end()),
        ))
    }
}

fn hhmm(value: i64) -> Result<i64, ValidationError> {
    let field = Feature::ScheduledDepartureTime;
    let value = int_in_range(field, value, DEPARTURE_TIME_RANGE)?;
    if value % 100 >= 60 {
        return Err(ValidationError::new(
            field,
            format!("{value} is not a valid HHMM time"),
        ));
    }
    Ok(value)
}

fn code(field: Feature, value: &str, len: RangeInclusive<usize>) -> Result<String, ValidationError> {
    let code = value.trim().to_ascii_uppercase();
    if code.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::new(
            field,
            format!("'{code}' must contain only letters and digits"),
        ));
    }
    if !len.contains(&code.len()) {
        return Err(ValidationError::new(
            field,
            format!("'{code}' must be {}-{} characters", len.start(), len.end()),
        ));
    }
    Ok(code)
}
