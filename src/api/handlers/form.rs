use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;

use crate::api::pages::{self, Page};
use crate::models::{FlightForm, RawFlightInput};
use crate::services::prediction::PredictionError;
use crate::AppState;

/// GET /: the prediction form, pre-filled with an example flight.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let form = FlightForm::default();
    Html(pages::render(&Page {
        form: &form,
        model_available: state.predictor.is_available(),
        error: None,
        result: None,
    }))
}

/// POST /: submit the form and render the prediction below it.
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<FlightForm>, FormRejection>,
) -> Response {
    let model_available = state.predictor.is_available();
    let page = |status: StatusCode, form: &FlightForm, error: Option<String>| {
        let html = pages::render(&Page {
            form,
            model_available,
            error,
            result: None,
        });
        (status, Html(html)).into_response()
    };

    if state.predictor.ensure_available().is_err() {
        return page(StatusCode::SERVICE_UNAVAILABLE, &FlightForm::default(), None);
    }

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            state.predictor.record_malformed(&rejection.body_text());
            return page(
                rejection.status(),
                &FlightForm::default(),
                Some(rejection.body_text()),
            )
        }
    };

    let outcome = RawFlightInput::try_from(&form)
        .map_err(PredictionError::from)
        .inspect_err(|e| state.predictor.record_failure(e))
        .and_then(|raw| state.predictor.validate_and_predict(&raw));

    match outcome {
        Ok((row, result)) => Html(pages::render(&Page {
            form: &form,
            model_available,
            error: None,
            result: Some((&result, &row)),
        }))
        .into_response(),
        Err(PredictionError::Validation(e)) => {
            page(StatusCode::UNPROCESSABLE_ENTITY, &form, Some(e.to_string()))
        }
        Err(PredictionError::ModelUnavailable(_)) => {
            page(StatusCode::SERVICE_UNAVAILABLE, &form, None)
        }
        Err(e @ PredictionError::Inference(_)) => {
            tracing::error!(error = %e, "Form prediction failed");
            page(
                StatusCode::INTERNAL_SERVER_ERROR,
                &form,
                Some("Prediction failed. Please try again later.".into()),
            )
        }
    }
}
