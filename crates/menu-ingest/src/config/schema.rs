use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::registry::{default_dining_halls, DiningHallSource, SourceRegistry};
use crate::error::ConfigError;
use crate::time::UtcOffset;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// Fixed offset appended to every schedule timestamp.
    #[serde(default)]
    pub utc_offset: UtcOffset,
    #[serde(default)]
    pub fetch: FetchConfig,
    /// SQLite file; defaults to `~/.menu-ingest/data/menu.db`.
    #[serde(default)]
    pub database_path: Option<String>,
    #[serde(default = "default_dining_halls")]
    pub dining_halls: Vec<DiningHallSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            utc_offset: UtcOffset::default(),
            fetch: FetchConfig::default(),
            database_path: None,
            dining_halls: default_dining_halls(),
        }
    }
}

impl Config {
    pub fn registry(&self) -> Result<SourceRegistry, ConfigError> {
        SourceRegistry::new(self.dining_halls.clone())
    }

    pub fn database_path(&self) -> Option<PathBuf> {
        match &self.database_path {
            Some(path) => Some(PathBuf::from(path)),
            None => crate::db::default_database_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Whole-request timeout per dining hall page.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("menu-ingest/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
