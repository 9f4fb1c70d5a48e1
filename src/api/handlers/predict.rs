use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::models::{PredictionResponse, RawFlightInput};
use crate::AppState;

/// POST /predict: predict whether a flight will be delayed.
///
/// Prediction `0` means on time, `1` means delayed. The model's availability
/// is checked before the body is looked at, so a missing model always yields
/// the same 503 payload.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<RawFlightInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    state.predictor.ensure_available()?;

    let Json(raw) =
        payload.inspect_err(|rejection| state.predictor.record_malformed(&rejection.body_text()))?;
    let (_, result) = state.predictor.validate_and_predict(&raw)?;

    Ok(Json(PredictionResponse::from(&result)))
}
