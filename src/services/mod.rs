pub mod prediction;

pub use prediction::{PredictionError, PredictionService};
