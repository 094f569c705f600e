use std::sync::Arc;

use catalog_api::config;
use catalog_api::handlers;
use catalog_api::state::AppState;
use catalog_api::store::postgres::PgProductStore;
use catalog_api::upload::UploadSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Catalog API in {:?} mode", config.environment);

    let store = PgProductStore::connect(&config.database).await?;

    let uploads = UploadSettings::from_config(&config.upload);
    tokio::fs::create_dir_all(&uploads.root).await?;

    let app = handlers::app(AppState {
        store: Arc::new(store),
        uploads,
    });

    // Allow deployments to override the port via env
    let port = std::env::var("CATALOG_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Catalog API listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
