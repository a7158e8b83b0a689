mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lingoclip::db::Database;
use lingoclip::{HeyGenProvider, MediaStorage, StubProvider, TranslationProvider};

use config::ServerConfig;
use state::AppState;

fn init_tracing() {
    // Route `log` records from the core library through tracing.
    tracing_log::LogTracer::init().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_provider(config: &ServerConfig) -> Arc<dyn TranslationProvider> {
    match &config.heygen_api_key {
        Some(key) => match HeyGenProvider::new(key.clone()) {
            Ok(provider) => {
                info!("Translation provider: heygen");
                Arc::new(provider)
            }
            Err(e) => {
                tracing::warn!("Failed to build HeyGen provider ({}), using stub", e);
                Arc::new(StubProvider::new())
            }
        },
        None => {
            tracing::warn!("HEYGEN_API_KEY not set, using stub provider");
            Arc::new(StubProvider::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting lingoclip-server v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env();
    let db = Database::open(&config.database_path)?;
    let provider = build_provider(&config);
    let storage = MediaStorage::new(&config.upload_dir);

    let state = AppState::new(db, provider, storage);
    let app = routes::router(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
