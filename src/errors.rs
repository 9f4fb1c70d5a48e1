use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::prediction::PredictionError;

pub const MODEL_NOT_LOADED: &str = "Model is not loaded. Check server logs.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// The body could not be read as a flight request at all.
    #[error("Bad request: {message}")]
    BadRequest { status: StatusCode, message: String },

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, field) = match &self {
            AppError::ModelUnavailable(reason) => {
                tracing::warn!(reason = %reason, "Prediction requested while model is unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, MODEL_NOT_LOADED.to_string(), None)
            }
            AppError::BadRequest { status, message } => (*status, message.clone(), None),
            AppError::Validation { field, .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string(), Some(*field))
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into(), None)
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
                field,
            }),
        )
            .into_response()
    }
}

impl From<PredictionError> for AppError {
    fn from(e: PredictionError) -> Self {
        match e {
            PredictionError::ModelUnavailable(reason) => AppError::ModelUnavailable(reason),
            PredictionError::Validation(v) => AppError::Validation {
                field: v.field.column_name(),
                reason: v.reason,
            },
            PredictionError::Inference(e) => AppError::Internal(e.into()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
