use fortuneapi::{
    api,
    core::prelude::*,
    generator::{FortuneGenerator, GenerationParams, GroqClient},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fortuneapi=info")),
        )
        .init();

    let config = Config::load()?;
    info!(model = %config.model, base_url = %config.base_url, "configuration loaded");

    let backend = Arc::new(GroqClient::from_config(&config));
    let generator = FortuneGenerator::new(backend, GenerationParams::from(&config));
    let app = api::router(AppState::new(generator));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
