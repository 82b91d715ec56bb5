use std::sync::Arc;
use tokio::net::TcpListener;

use backend_lib::{config::Settings, router, seed, storage::MemStorage, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration, trying the alternate location before
    // falling back to built-in defaults.
    let settings = Settings::load().or_else(|_| Settings::load_from("./config/default"))?;
    settings.validate()?;

    // Initialize tracing from the configured log level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Create storage and seed the playground user
    let storage = MemStorage::new();
    seed::seed_default_user(&storage).await?;

    let bind_addr = settings.bind_addr;
    let state = Arc::new(AppState::new(storage, settings));
    let app = router::create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
