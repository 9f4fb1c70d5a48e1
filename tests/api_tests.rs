mod common;

use axum::http::StatusCode;

use metrics_exporter_prometheus::PrometheusBuilder;

use flight_delay::metrics::register_metrics;
use flight_delay::services::PredictionService;

use common::{
    body_json, body_text, build_test_app, build_test_app_with_metrics, bundled_service,
    example_body, get, post_form, post_json, stub_service, CountingClassifier,
};

const EXAMPLE_FORM: &str = "month=1&day_of_month=15&day_of_week=3&op_unique_carrier=WN\
    &origin=LAX&dest=SFO&crs_dep_time=1400&dep_delay=-5.0&distance=337.0";

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_predict_example_is_well_formed() {
    let app = build_test_app(bundled_service());

    let resp = post_json(app, "/predict", &example_body()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let prediction = json["prediction"].as_u64().unwrap();
    assert!(prediction <= 1);
    let expected_label = if prediction == 1 { "Delayed" } else { "On Time" };
    assert_eq!(json["prediction_label"], expected_label);

    let on_time: f64 = json["confidence_on_time"].as_str().unwrap().parse().unwrap();
    let delayed: f64 = json["confidence_delayed"].as_str().unwrap().parse().unwrap();
    assert!((0.0..=1.0).contains(&on_time));
    assert!((0.0..=1.0).contains(&delayed));
    assert!((on_time + delayed - 1.0).abs() < 1e-3);
    assert_eq!(json["confidence_on_time"].as_str().unwrap().len(), 6);
}

#[tokio::test]
async fn test_predict_passes_stub_output_through() {
    let stub = CountingClassifier::new(1, [0.25, 0.75]);
    let app = build_test_app(stub_service(stub.clone()));

    let json = body_json(post_json(app, "/predict", &example_body()).await).await;
    assert_eq!(json["prediction"], 1);
    assert_eq!(json["prediction_label"], "Delayed");
    assert_eq!(json["confidence_on_time"], "0.2500");
    assert_eq!(json["confidence_delayed"], "0.7500");
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_predict_missing_field_never_reaches_classifier() {
    let stub = CountingClassifier::new(0, [0.9, 0.1]);
    let app = build_test_app(stub_service(stub.clone()));

    let mut body = example_body();
    body.as_object_mut().unwrap().remove("distance");

    let resp = post_json(app, "/predict", &body).await;
    assert!(resp.status().is_client_error());

    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("distance"));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_predict_wrong_type_rejected() {
    let stub = CountingClassifier::new(0, [0.9, 0.1]);
    let app = build_test_app(stub_service(stub.clone()));

    let mut body = example_body();
    body["month"] = serde_json::json!("January");

    let resp = post_json(app, "/predict", &body).await;
    assert!(resp.status().is_client_error());
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_predict_month_out_of_range() {
    let stub = CountingClassifier::new(0, [0.9, 0.1]);
    let app = build_test_app(stub_service(stub.clone()));

    let mut body = example_body();
    body["month"] = 13.into();

    let resp = post_json(app, "/predict", &body).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["field"], "month");
    assert_eq!(json["error"], "Invalid month: 13 is outside 1-12");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_predict_ignores_unknown_fields() {
    let app = build_test_app(bundled_service());

    let mut body = example_body();
    body["tail_number"] = "N123WN".into();

    let resp = post_json(app, "/predict", &body).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_predict_model_unavailable() {
    let app = build_test_app(PredictionService::unavailable("model artifact not found"));

    let resp = post_json(app, "/predict", &example_body()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Model is not loaded. Check server logs.");
}

#[tokio::test]
async fn test_predict_inference_error_is_generic() {
    let stub = CountingClassifier::new(7, [0.5, 0.5]);
    let app = build_test_app(stub_service(stub));

    let resp = post_json(app, "/predict", &example_body()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(resp).await;
    assert_eq!(json["error"], "Internal server error");
}

// ---------------------------------------------------------------------------
// Form UI
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_landing_page_prefills_form() {
    let app = build_test_app(bundled_service());

    let resp = get(app, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = body_text(resp).await;
    assert!(html.contains("Flight Delay Predictor"));
    assert!(html.contains(r#"name="op_unique_carrier" type="text" maxlength="3" value="WN""#));
    assert!(html.contains(r#"<button type="submit">Predict Delay</button>"#));
}

#[tokio::test]
async fn test_landing_page_warns_when_model_missing() {
    let app = build_test_app(PredictionService::unavailable("missing"));

    let html = body_text(get(app, "/").await).await;
    assert!(html.contains("model files are missing"));
    assert!(html.contains(r#"<button type="submit" disabled>"#));
}

#[tokio::test]
async fn test_form_submit_renders_result() {
    let stub = CountingClassifier::new(1, [0.1234, 0.8766]);
    let app = build_test_app(stub_service(stub.clone()));

    let resp = post_form(app, EXAMPLE_FORM).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = body_text(resp).await;
    assert!(html.contains("Flight will be DELAYED"));
    assert!(html.contains("Confidence: 87.66%"));
    assert!(html.contains("Show Input Data"));
    assert!(html.contains("<td>LAX</td>"));
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_form_submit_with_bundled_model() {
    let app = build_test_app(bundled_service());

    let html = body_text(post_form(app, EXAMPLE_FORM).await).await;
    assert!(html.contains("Prediction Result"));
}

#[tokio::test]
async fn test_form_invalid_field_rerenders_with_message() {
    let stub = CountingClassifier::new(0, [0.9, 0.1]);
    let app = build_test_app(stub_service(stub.clone()));

    let body = EXAMPLE_FORM.replace("crs_dep_time=1400", "crs_dep_time=soon");
    let resp = post_form(app, &body).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_text(resp).await;
    assert!(html.contains("invalid crs_dep_time"));
    assert!(html.contains(r#"value="soon""#));
    assert!(!html.contains("Prediction Result"));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_form_submit_refused_when_model_missing() {
    let app = build_test_app(PredictionService::unavailable("missing"));

    let resp = post_form(app, EXAMPLE_FORM).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let html = body_text(resp).await;
    assert!(html.contains("model files are missing"));
    assert!(!html.contains("Prediction Result"));
}

// ---------------------------------------------------------------------------
// Operational endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_check() {
    let resp = get(build_test_app(bundled_service()), "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], true);

    let resp = get(build_test_app(PredictionService::unavailable("missing")), "/health").await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "degraded");
}

#[tokio::test]
async fn test_metrics_endpoint_counts_served_requests() {
    // The current-thread test runtime keeps every handler on this thread,
    // so a thread-local recorder sees all of them.
    let recorder = PrometheusBuilder::new().build_recorder();
    let _guard = metrics::set_default_local_recorder(&recorder);
    register_metrics(true);

    let stub = CountingClassifier::new(1, [0.25, 0.75]);
    let app = build_test_app_with_metrics(stub_service(stub), recorder.handle());

    let resp = post_json(app.clone(), "/predict", &example_body()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let mut body = example_body();
    body["month"] = serde_json::json!(13);
    let resp = post_json(app.clone(), "/predict", &body).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let mut body = example_body();
    body.as_object_mut().unwrap().remove("dest");
    let resp = post_json(app.clone(), "/predict", &body).await;
    assert!(resp.status().is_client_error());

    let resp = get(app, "/metrics").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = body_text(resp).await;
    assert!(text.contains(r#"predictions_total{label="Delayed"} 1"#));
    assert!(text.contains(r#"predictions_total{label="On Time"} 0"#));
    assert!(text.contains(r#"prediction_errors_total{kind="validation"} 1"#));
    assert!(text.contains(r#"prediction_errors_total{kind="malformed"} 1"#));
    assert!(text.contains(r#"prediction_errors_total{kind="model_unavailable"} 0"#));
    assert!(text.contains("model_loaded 1"));
}

#[tokio::test]
async fn test_metrics_count_refusals_without_model() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let _guard = metrics::set_default_local_recorder(&recorder);
    register_metrics(false);

    let app = build_test_app_with_metrics(
        PredictionService::unavailable("missing"),
        recorder.handle(),
    );

    let resp = post_json(app.clone(), "/predict", &example_body()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let resp = post_form(app.clone(), EXAMPLE_FORM).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let text = body_text(get(app, "/metrics").await).await;
    assert!(text.contains(r#"prediction_errors_total{kind="model_unavailable"} 2"#));
    assert!(text.contains("model_loaded 0"));
}
