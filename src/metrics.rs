use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Failure kinds counted under `prediction_errors_total`.
pub const ERROR_KINDS: [&str; 4] = ["model_unavailable", "malformed", "validation", "inference"];

/// Install the Prometheus exporter as the global recorder and register all
/// application metrics. Returns a `PrometheusHandle` whose `render()` method
/// produces the text/plain Prometheus scrape payload.
///
/// Only one recorder can be installed per process.
pub fn init_metrics(model_loaded: bool) -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics(model_loaded);
    Ok(handle)
}

/// Register every series on the current recorder so they appear even before
/// the first increment.
pub fn register_metrics(model_loaded: bool) {
    for label in ["On Time", "Delayed"] {
        counter!("predictions_total", "label" => label).absolute(0);
    }
    for kind in ERROR_KINDS {
        counter!("prediction_errors_total", "kind" => kind).absolute(0);
    }

    gauge!("model_loaded").set(if model_loaded { 1.0 } else { 0.0 });

    // Histogram is lazily created on first record; force creation.
    histogram!("inference_latency_seconds").record(0.0);
}

/// A handle backed by a recorder that is not installed globally. Renders an
/// empty payload; used where the global recorder is already taken.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
