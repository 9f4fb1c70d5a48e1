use std::fmt;

use serde::Serialize;

use super::{ColumnOrder, Feature};
use crate::models::FeatureSet;

/// A single cell of the classifier's input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FeatureValue {
    /// Numeric view of the cell. Text cells have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }

    /// Key used for one-hot lookups. Floats have no category key.
    pub fn category_key(&self) -> Option<String> {
        match self {
            FeatureValue::Int(v) => Some(v.to_string()),
            FeatureValue::Text(s) => Some(s.clone()),
            FeatureValue::Float(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{v}"),
            FeatureValue::Float(v) => write!(f, "{v:?}"),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

impl FeatureSet {
    pub fn value(&self, feature: Feature) -> FeatureValue {
        match feature {
            Feature::Month => FeatureValue::Int(self.month.into()),
            Feature::DayOfMonth => FeatureValue::Int(self.day_of_month.into()),
            Feature::DayOfWeek => FeatureValue::Int(self.day_of_week.into()),
            Feature::CarrierCode => FeatureValue::Text(self.carrier_code.clone()),
            Feature::OriginAirport => FeatureValue::Text(self.origin_airport.clone()),
            Feature::DestinationAirport => FeatureValue::Text(self.destination_airport.clone()),
            Feature::ScheduledDepartureTime => {
                FeatureValue::Int(self.scheduled_departure_time.into())
            }
            Feature::DepartureDelayMinutes => FeatureValue::Float(self.departure_delay_minutes),
            Feature::DistanceMiles => FeatureValue::Float(self.distance_miles),
        }
    }

    /// Lay the features out in the artifact's column order.
    pub fn to_row(&self, columns: &ColumnOrder) -> FeatureRow {
        FeatureRow {
            columns: columns.clone(),
            values: columns.features().iter().map(|f| self.value(*f)).collect(),
        }
    }
}

/// One ordered input row, the only thing a classifier ever sees.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: ColumnOrder,
    values: Vec<FeatureValue>,
}

impl FeatureRow {
    /// Positional values, in column order.
    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    pub fn columns(&self) -> &ColumnOrder {
        &self.columns
    }

    /// Look a value up by name through the recorded column order.
    pub fn get(&self, feature: Feature) -> Option<&FeatureValue> {
        self.columns.position(feature).and_then(|i| self.values.get(i))
    }

    /// `(column name, value)` pairs in column order, for echoing input back.
    pub fn entries(&self) -> impl Iterator<Item = (Feature, &FeatureValue)> {
        self.columns.features().iter().copied().zip(self.values.iter())
    }
}
