use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use receptionist::config::AppConfig;
use receptionist::db::{self, LocalStorage};
use receptionist::routes;
use receptionist::services::backend::http::HttpBackend;
use receptionist::services::session::spawn_expiry_watcher;
use receptionist::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let storage = LocalStorage::new(conn);

    tracing::info!("using assistant backend at {}", config.api_base_url);
    let backend = HttpBackend::new(config.api_base_url.clone());

    let state = Arc::new(AppState::new(config.clone(), storage, Box::new(backend))?);

    let initial = state.session.init()?;
    tracing::info!(session = ?initial, "session loaded");
    spawn_expiry_watcher(
        Arc::clone(&state.session),
        Duration::from_secs(config.session_check_secs),
    );

    let app = routes::app(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
