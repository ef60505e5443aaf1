use std::{env, path::PathBuf};

use secrecy::SecretString;
use tracing::{info, warn};

use crate::error::StartupError;

pub struct ServerConfig {
    pub port: u16,
    /// JSON config for the ingestion pipeline; built-in defaults when unset.
    pub config_path: Option<PathBuf>,
    /// Bearer token required by the trigger endpoint.
    pub cron_secret: Option<SecretString>,
    pub log_json: bool,
}

impl ServerConfig {
    pub fn load() -> Result<Self, StartupError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StartupError> {
        let port = match non_empty(lookup("PORT")) {
            Some(value) => value.parse().map_err(|e| StartupError::InvalidEnv {
                key: "PORT",
                reason: format!("'{value}': {e}"),
            })?,
            None => 8080,
        };

        let log_json = match non_empty(lookup("LOG_FORMAT")).as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(StartupError::InvalidEnv {
                    key: "LOG_FORMAT",
                    reason: format!("'{other}', expected 'text' or 'json'"),
                })
            }
        };

        Ok(Self {
            port,
            config_path: non_empty(lookup("MENU_INGEST_CONFIG")).map(PathBuf::from),
            cron_secret: non_empty(lookup("CRON_SECRET")).map(SecretString::from),
            log_json,
        })
    }

    /// Logs the effective settings. Called once logging is installed.
    pub fn report(&self) {
        match &self.config_path {
            Some(path) => info!("Using config file {}", path.display()),
            None => info!("MENU_INGEST_CONFIG not set, using built-in dining halls"),
        }
        if self.cron_secret.is_none() {
            warn!("CRON_SECRET not set, /api/scrape is open to anyone");
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
