use std::sync::Arc;

use flight_delay::api::router::create_router;
use flight_delay::classifier::load_model;
use flight_delay::config::{AppConfig, LogFormat};
use flight_delay::services::PredictionService;
use flight_delay::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    // The model is loaded exactly once. A failed load keeps the server up
    // in a degraded state instead of exiting.
    tracing::info!(path = %config.model_path.display(), "Loading model...");
    let predictor = PredictionService::from_load(load_model(&config.model_path));
    if !predictor.is_available() {
        tracing::warn!("Serving without a model; /predict will return 503");
    }

    let metrics_handle = flight_delay::metrics::init_metrics(predictor.is_available())?;

    let addr = config.bind_addr();
    let state = AppState {
        predictor: Arc::new(predictor),
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}
