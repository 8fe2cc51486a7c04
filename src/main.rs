use gaptime_api::api::{create_router, AppState};
use gaptime_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gaptime_api=info,tower_http=warn".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        location = %config.location_label,
        "Starting gaptime-api"
    );

    let state = AppState::from_config(&config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("Server running on http://{}:{}", config.host, config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
