use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fairshare::config::AppConfig;
use fairshare::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG wins; `log` records from the library are captured too
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, &config.cors_origin)?;

    let addr = config.socket_addr()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
