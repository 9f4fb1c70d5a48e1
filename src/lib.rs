pub mod api;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod features;
pub mod metrics;
pub mod models;
pub mod services;

use std::sync::Arc;

use crate::services::prediction::PredictionService;

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<PredictionService>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
