//! HTTP surface of the menu ingestion pipeline.
//!
//! - `GET|POST /api/scrape` runs one ingestion pass (cron trigger)
//! - `GET /api/dining-halls` lists registered halls
//! - `GET /api/dining-halls/{id}/menu?meal=lunch` lists stored menu items
//! - `GET /api/dining-halls/{id}/schedule` lists stored meal windows

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal::ctrl_c};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::ServerConfig;
use error::StartupError;
use routes::{dining_halls_handler, menu_handler, schedule_handler, scrape_handler};
use state::AppState;

pub async fn start_server() -> Result<(), StartupError> {
    let server_config = ServerConfig::load()?;
    init_logging(server_config.log_json)?;
    server_config.report();

    info!("Initializing state...");
    let state = AppState::new(&server_config)?;

    let address = format!("0.0.0.0:{}", server_config.port);
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    info!("Server shut down");
    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/scrape", get(scrape_handler).post(scrape_handler))
        .route("/api/dining-halls", get(dining_halls_handler))
        .route("/api/dining-halls/{id}/menu", get(menu_handler))
        .route("/api/dining-halls/{id}/schedule", get(schedule_handler))
        .with_state(state)
}

/// Installs the global subscriber and routes `log` records into it.
fn init_logging(json: bool) -> Result<(), StartupError> {
    tracing_log::LogTracer::init().map_err(|e| StartupError::Logging(e.to_string()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.map_err(|e| StartupError::Logging(e.to_string()))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
