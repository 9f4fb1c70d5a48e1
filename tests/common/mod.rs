use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

use flight_delay::api::router::create_router;
use flight_delay::classifier::{load_model, Classifier, InferenceError, LoadedModel};
use flight_delay::features::{ColumnOrder, Feature, FeatureValue};
use flight_delay::services::PredictionService;
use flight_delay::AppState;

/// Classifier with fixed outputs that counts every call.
#[allow(dead_code)]
pub struct CountingClassifier {
    label: i64,
    proba: [f64; 2],
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingClassifier {
    pub fn new(label: i64, proba: [f64; 2]) -> Arc<Self> {
        Arc::new(Self {
            label,
            proba,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for CountingClassifier {
    fn kind(&self) -> &str {
        "counting_stub"
    }

    fn input_width(&self) -> usize {
        Feature::ALL.len()
    }

    fn classify(&self, _row: &[FeatureValue]) -> Result<i64, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.label)
    }

    fn score(&self, _row: &[FeatureValue]) -> Result<[f64; 2], InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.proba)
    }
}

#[allow(dead_code)]
pub fn bundled_model_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("model/flight_delay_model.json")
}

#[allow(dead_code)]
pub fn bundled_service() -> PredictionService {
    PredictionService::new(load_model(&bundled_model_path()).expect("bundled model loads"))
}

#[allow(dead_code)]
pub fn stub_service(stub: Arc<CountingClassifier>) -> PredictionService {
    let columns = ColumnOrder::from_features(Feature::ALL.to_vec()).unwrap();
    PredictionService::new(LoadedModel::new(columns, stub).unwrap())
}

#[allow(dead_code)]
pub fn build_test_app(predictor: PredictionService) -> axum::Router {
    build_test_app_with_metrics(predictor, flight_delay::metrics::detached_handle())
}

#[allow(dead_code)]
pub fn build_test_app_with_metrics(
    predictor: PredictionService,
    metrics_handle: PrometheusHandle,
) -> axum::Router {
    let state = AppState {
        predictor: Arc::new(predictor),
        metrics_handle,
    };
    create_router(state)
}

/// The documented example request.
#[allow(dead_code)]
pub fn example_body() -> serde_json::Value {
    serde_json::json!({
        "month": 1,
        "day_of_month": 15,
        "day_of_week": 3,
        "op_unique_carrier": "WN",
        "origin": "LAX",
        "dest": "SFO",
        "crs_dep_time": 1400,
        "dep_delay": -5.0,
        "distance": 337.0
    })
}

#[allow(dead_code)]
pub async fn post_json(app: axum::Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn post_form(app: axum::Router, body: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn get(app: axum::Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[allow(dead_code)]
pub async fn body_text(resp: Response<Body>) -> String {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
