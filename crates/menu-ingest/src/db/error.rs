use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot create database directory '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema step `version` failed; the database stays at the previous version.
    #[error("Schema upgrade to version {version} failed: {reason}")]
    Migration { version: u32, reason: String },

    #[error("Column {column} holds an unreadable value {reason}")]
    InvalidData { column: &'static str, reason: String },

    #[error("Connection mutex poisoned by a panicking writer")]
    LockPoisoned,
}
