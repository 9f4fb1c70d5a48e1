use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.predictor.is_available() {
        (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "model_loaded": true })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "model_loaded": false })),
        )
    }
}
