use std::path::PathBuf;
use thiserror::Error;

use crate::ingest::SourceError;
use crate::store::PersistenceError;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetcher setup failed: {0}")]
    Fetcher(#[from] crate::fetch::FetchError),

    #[error("All {count} dining hall sources failed; first error: {first}")]
    AllSourcesFailed {
        count: usize,
        #[source]
        first: SourceError,
    },

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config is not valid JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("{message}")]
    Validation { message: String },

    #[error("Config does not match schema: {errors}")]
    SchemaValidation { errors: String },

    #[error("Duplicate dining hall id '{id}'")]
    DuplicateDiningHall { id: String },

    #[error("Invalid source URL for dining hall '{id}': {url}")]
    InvalidUrl { id: String, url: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
