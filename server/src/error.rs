use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use menu_ingest::{ConfigError, DatabaseError, IngestError};

/// Failures while booting the server.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidEnv { key: &'static str, reason: String },

    #[error("Failed to install logger: {0}")]
    Logging(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No database path configured and no home directory found")]
    NoDatabasePath,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Request-level failures, rendered as `{ "error": ... }`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("Unknown dining hall '{0}'")]
    UnknownDiningHall(String),

    #[error("Failed to scrape and save menu data")]
    Ingest(#[from] IngestError),

    #[error("Failed to read menu data")]
    Database(#[from] DatabaseError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownDiningHall(_) => StatusCode::NOT_FOUND,
            AppError::Ingest(e) => {
                error!(error = %e, "Ingestion run failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Database(e) => {
                error!(error = %e, "Database query failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
