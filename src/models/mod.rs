pub mod flight;
pub mod prediction;

pub use flight::{FeatureSet, FlightForm, RawFlightInput};
pub use prediction::{PredictionResponse, PredictionResult};
