use serde::{Deserialize, Serialize};

use crate::features::{Feature, ValidationError};

/// Flight details exactly as a client sent them to `POST /predict`.
///
/// Integer fields are `i64` so out-of-range values reach validation and get a
/// field-specific message instead of a generic deserialization error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFlightInput {
    pub month: i64,
    pub day_of_month: i64,
    pub day_of_week: i64,
    pub op_unique_carrier: String,
    pub origin: String,
    pub dest: String,
    pub crs_dep_time: i64,
    pub dep_delay: f64,
    pub distance: f64,
}

/// A validated set of flight features. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSet {
    pub month: u8,
    pub day_of_month: u8,
    pub day_of_week: u8,
    #[serde(rename = "op_unique_carrier")]
    pub carrier_code: String,
    #[serde(rename = "origin")]
    pub origin_airport: String,
    #[serde(rename = "dest")]
    pub destination_airport: String,
    #[serde(rename = "crs_dep_time")]
    pub scheduled_departure_time: u16,
    #[serde(rename = "dep_delay")]
    pub departure_delay_minutes: f64,
    #[serde(rename = "distance")]
    pub distance_miles: f64,
}

// ---------------------------------------------------------------------------
// Form input
// ---------------------------------------------------------------------------

/// Urlencoded body of the HTML form. Every widget posts text, so parsing into
/// typed values happens here and names the field that failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightForm {
    pub month: String,
    pub day_of_month: String,
    pub day_of_week: String,
    pub op_unique_carrier: String,
    pub origin: String,
    pub dest: String,
    pub crs_dep_time: String,
    pub dep_delay: String,
    pub distance: String,
}

impl Default for FlightForm {
    fn default() -> Self {
        Self {
            month: "1".into(),
            day_of_month: "15".into(),
            day_of_week: "3".into(),
            op_unique_carrier: "WN".into(),
            origin: "LAX".into(),
            dest: "SFO".into(),
            crs_dep_time: "1400".into(),
            dep_delay: "-5.0".into(),
            distance: "337.0".into(),
        }
    }
}

impl FlightForm {
    /// Submitted text for a field, used to re-populate the form.
    pub fn value(&self, feature: Feature) -> &str {
        match feature {
            Feature::Month => &self.month,
            Feature::DayOfMonth => &self.day_of_month,
            Feature::DayOfWeek => &self.day_of_week,
            Feature::CarrierCode => &self.op_unique_carrier,
            Feature::OriginAirport => &self.origin,
            Feature::DestinationAirport => &self.dest,
            Feature::ScheduledDepartureTime => &self.crs_dep_time,
            Feature::DepartureDelayMinutes => &self.dep_delay,
            Feature::DistanceMiles => &self.distance,
        }
    }
}

fn parse_int(feature: Feature, text: &str) -> Result<i64, ValidationError> {
    text.trim()
        .parse()
        .map_err(|_| ValidationError::new(feature, format!("'{}' is not a whole number", text.trim())))
}

fn parse_float(feature: Feature, text: &str) -> Result<f64, ValidationError> {
    text.trim()
        .parse()
        .map_err(|_| ValidationError::new(feature, format!("'{}' is not a number", text.trim())))
}

impl TryFrom<&FlightForm> for RawFlightInput {
    type Error = ValidationError;

    fn try_from(form: &FlightForm) -> Result<Self, Self::Error> {
        Ok(Self {
            month: parse_int(Feature::Month, &form.month)?,
            day_of_month: parse_int(Feature::DayOfMonth, &form.day_of_month)?,
            day_of_week: parse_int(Feature::DayOfWeek, &form.day_of_week)?,
            op_unique_carrier: form.op_unique_carrier.clone(),
            origin: form.origin.clone(),
            dest: form.dest.clone(),
            crs_dep_time: parse_int(Feature::ScheduledDepartureTime, &form.crs_dep_time)?,
            dep_delay: parse_float(Feature::DepartureDelayMinutes, &form.dep_delay)?,
            distance: parse_float(Feature::DistanceMiles, &form.distance)?,
        })
    }
}
