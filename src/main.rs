use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use parking_state::{api, db, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Config::from_env();

    // Decided once; the stores never re-evaluate it
    let backend = db::select_backend(config.remote.as_ref());
    tracing::info!(
        backend = %backend.mode(),
        state_file = %config.state_file.display(),
        tokens_file = %config.tokens_file.display(),
        static_dir = %config.static_dir.display(),
        "Storage backend selected"
    );

    let bind_address = config.bind_address.clone();
    let app = api::router(Arc::new(AppState::new(config, backend)));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Parking server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
