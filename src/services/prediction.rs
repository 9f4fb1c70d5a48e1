use std::time::Instant;

use metrics::{counter, histogram};
use thiserror::Error;

use crate::classifier::{ArtifactError, InferenceError, LoadedModel};
use crate::features::{self, ColumnOrder, FeatureRow, ValidationError};
use crate::models::{FeatureSet, PredictionResult, RawFlightInput};

/// Allowed deviation of `p_on_time + p_delayed` from 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}

impl PredictionError {
    /// Metric label for this failure.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::ModelUnavailable(_) => "model_unavailable",
            PredictionError::Validation(_) => "validation",
            PredictionError::Inference(_) => "inference",
        }
    }
}

enum ModelState {
    Ready(LoadedModel),
    Unavailable { reason: String },
}

/// Serves predictions from a model loaded once at startup.
///
/// Constructed in `main` and shared read-only through the router state. When
/// the artifact failed to load the service stays up in an unavailable state
/// and refuses every request without touching a classifier.
pub struct PredictionService {
    state: ModelState,
}

impl PredictionService {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            state: ModelState::Ready(model),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: ModelState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    /// Wrap the outcome of the startup load. A load failure is logged and
    /// turns into the unavailable state.
    pub fn from_load(result: Result<LoadedModel, ArtifactError>) -> Self {
        match result {
            Ok(model) => Self::new(model),
            Err(e) => {
                tracing::error!(error = %e, "Model could not be loaded; predictions disabled");
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    /// Why the model is unavailable, if it is.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            ModelState::Ready(_) => None,
            ModelState::Unavailable { reason } => Some(reason),
        }
    }

    pub fn columns(&self) -> Option<&ColumnOrder> {
        match &self.state {
            ModelState::Ready(model) => Some(model.columns()),
            ModelState::Unavailable { .. } => None,
        }
    }

    fn model(&self) -> Result<&LoadedModel, PredictionError> {
        match &self.state {
            ModelState::Ready(model) => Ok(model),
            ModelState::Unavailable { reason } => {
                Err(PredictionError::ModelUnavailable(reason.clone()))
            }
        }
    }

    /// Refuse early when no model is loaded. The refusal is counted like any
    /// other failed prediction.
    pub fn ensure_available(&self) -> Result<(), PredictionError> {
        self.model().map(|_| ()).map_err(|e| {
            self.record_failure(&e);
            e
        })
    }

    /// Count a request whose body could not be read as a flight at all.
    pub fn record_malformed(&self, detail: &str) {
        counter!("prediction_errors_total", "kind" => "malformed").increment(1);
        tracing::debug!(detail, "Malformed prediction request");
    }

    /// Count and log a failed prediction.
    pub fn record_failure(&self, e: &PredictionError) {
        counter!("prediction_errors_total", "kind" => e.kind()).increment(1);
        match e {
            PredictionError::Inference(_) => tracing::error!(error = %e, "Prediction failed"),
            _ => tracing::debug!(error = %e, "Prediction rejected"),
        }
    }

    /// Run the classifier on one validated feature set.
    pub fn predict(&self, features: &FeatureSet) -> Result<PredictionResult, PredictionError> {
        let model = self.model()?;
        infer(model, &features.to_row(model.columns()))
    }

    /// Availability check, then validation, then inference. Returns the row
    /// the classifier saw alongside the result so callers can echo it.
    pub fn validate_and_predict(
        &self,
        raw: &RawFlightInput,
    ) -> Result<(FeatureRow, PredictionResult), PredictionError> {
        let outcome = self.model().and_then(|model| {
            let set = features::validate(raw)?;
            let row = set.to_row(model.columns());
            let result = infer(model, &row)?;
            Ok((set, row, result))
        });

        match outcome {
            Ok((set, row, result)) => {
                counter!("predictions_total", "label" => result.label_text()).increment(1);
                tracing::info!(
                    carrier = %set.carrier_code,
                    origin = %set.origin_airport,
                    dest = %set.destination_airport,
                    delayed = result.delayed,
                    confidence = result.confidence(),
                    "Prediction served"
                );
                Ok((row, result))
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }
}

fn infer(model: &LoadedModel, row: &FeatureRow) -> Result<PredictionResult, PredictionError> {
    let classifier = model.classifier();

    let started = Instant::now();
    let label = classifier.classify(row.values())?;
    let [on_time, delayed] = classifier.score(row.values())?;
    histogram!("inference_latency_seconds").record(started.elapsed().as_secs_f64());

    let delayed_label = match label {
        0 => false,
        1 => true,
        other => return Err(InferenceError::UnexpectedLabel(other).into()),
    };
    check_probabilities(on_time, delayed)?;

    Ok(PredictionResult {
        delayed: delayed_label,
        confidence_on_time: on_time,
        confidence_delayed: delayed,
    })
}

fn check_probabilities(on_time: f64, delayed: f64) -> Result<(), InferenceError> {
    let in_unit = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
    if in_unit(on_time) && in_unit(delayed) && (on_time + delayed - 1.0).abs() <= PROBABILITY_TOLERANCE
    {
        Ok(())
    } else {
        Err(InferenceError::InvalidProbabilities { on_time, delayed })
    }
}
