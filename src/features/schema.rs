use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

/// How a feature's value is represented in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Integer,
    Float,
    Categorical,
}

/// The nine named inputs the classifier consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Feature {
    Month,
    DayOfMonth,
    DayOfWeek,
    CarrierCode,
    OriginAirport,
    DestinationAirport,
    ScheduledDepartureTime,
    DepartureDelayMinutes,
    DistanceMiles,
}

impl Feature {
    /// Declaration order. Only used for display and tests; rows are always
    /// built from a loaded [`ColumnOrder`].
    pub const ALL: [Feature; 9] = [
        Feature::Month,
        Feature::DayOfMonth,
        Feature::DayOfWeek,
        Feature::CarrierCode,
        Feature::OriginAirport,
        Feature::DestinationAirport,
        Feature::ScheduledDepartureTime,
        Feature::DepartureDelayMinutes,
        Feature::DistanceMiles,
    ];

    /// Column name used by the trained model and on the wire.
    pub fn column_name(&self) -> &'static str {
        match self {
            Feature::Month => "month",
            Feature::DayOfMonth => "day_of_month",
            Feature::DayOfWeek => "day_of_week",
            Feature::CarrierCode => "op_unique_carrier",
            Feature::OriginAirport => "origin",
            Feature::DestinationAirport => "dest",
            Feature::ScheduledDepartureTime => "crs_dep_time",
            Feature::DepartureDelayMinutes => "dep_delay",
            Feature::DistanceMiles => "distance",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }

    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Month
            | Feature::DayOfMonth
            | Feature::DayOfWeek
            | Feature::ScheduledDepartureTime => FeatureKind::Integer,
            Feature::DepartureDelayMinutes | Feature::DistanceMiles => FeatureKind::Float,
            Feature::CarrierCode | Feature::OriginAirport | Feature::DestinationAirport => {
                FeatureKind::Categorical
            }
        }
    }

    /// Human-readable label for form widgets.
    pub fn label(&self) -> &'static str {
        match self {
            Feature::Month => "Month",
            Feature::DayOfMonth => "Day of Month",
            Feature::DayOfWeek => "Day of Week",
            Feature::CarrierCode => "Carrier Code",
            Feature::OriginAirport => "Origin Airport",
            Feature::DestinationAirport => "Destination Airport",
            Feature::ScheduledDepartureTime => "Scheduled Departure Time (HHMM)",
            Feature::DepartureDelayMinutes => "Departure Delay (minutes)",
            Feature::DistanceMiles => "Distance (miles)",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// ColumnOrder
// ---------------------------------------------------------------------------

/// Column list rejected at load time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColumnOrderError {
    #[error("unknown column '{0}'")]
    Unknown(String),

    #[error("duplicate column '{0}'")]
    Duplicate(String),

    #[error("missing column(s): {0}")]
    Missing(String),
}

/// The column sequence recorded in the model artifact.
///
/// Always a permutation of [`Feature::ALL`]. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOrder(Arc<[Feature]>);

impl ColumnOrder {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ColumnOrderError> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let feature =
                Feature::from_column(name).ok_or_else(|| ColumnOrderError::Unknown(name.into()))?;
            if columns.contains(&feature) {
                return Err(ColumnOrderError::Duplicate(name.into()));
            }
            columns.push(feature);
        }
        Self::from_features(columns)
    }

    pub fn from_features(columns: Vec<Feature>) -> Result<Self, ColumnOrderError> {
        let missing: Vec<&str> = Feature::ALL
            .iter()
            .filter(|f| !columns.contains(f))
            .map(|f| f.column_name())
            .collect();
        if !missing.is_empty() {
            return Err(ColumnOrderError::Missing(missing.join(", ")));
        }
        if let Some(dup) = columns
            .iter()
            .enumerate()
            .find(|(i, f)| columns[..*i].contains(f))
            .map(|(_, f)| f)
        {
            return Err(ColumnOrderError::Duplicate(dup.column_name().into()));
        }
        Ok(Self(columns.into()))
    }

    pub fn features(&self) -> &[Feature] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn position(&self, feature: Feature) -> Option<usize> {
        self.0.iter().position(|f| *f == feature)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|f| f.column_name()).collect()
    }
}
