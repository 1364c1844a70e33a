use std::sync::Arc;

use simpgpt::server::{self, AppState};
use simpgpt::{AppConfig, AppError, telemetry};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let _guard = telemetry::init_subscriber(config.telemetry.clone())?;

    let http_client = reqwest::Client::builder()
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;
    let invokers = config.build_invokers(http_client);
    if config.openai.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; generation requests will fail");
    }
    tracing::info!(
        primary = invokers.primary.provider_name(),
        fallback = invokers.secondary.as_ref().map(|s| s.provider_name()),
        "providers configured"
    );

    let state = Arc::new(AppState::new(invokers, config.vision_model.clone()));
    let app = server::router(state, config.body_limit);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    server::serve(listener, app).await
}
