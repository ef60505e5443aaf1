use std::sync::Arc;

use secrecy::SecretString;
use tracing::info;

use menu_ingest::config::{load_config, Config};
use menu_ingest::db::{dining_hall_repo, Database};
use menu_ingest::Ingestor;

use super::{config::ServerConfig, error::StartupError};

pub struct AppState {
    pub ingestor: Ingestor,
    pub db: Database,
    pub cron_secret: Option<SecretString>,
}

impl AppState {
    pub fn new(server: &ServerConfig) -> Result<Arc<Self>, StartupError> {
        let config = match &server.config_path {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };

        let db_path = config.database_path().ok_or(StartupError::NoDatabasePath)?;
        let db = Database::open(&db_path)?;

        let ingestor = Ingestor::from_config(&config, Arc::new(db.clone()))?;
        let synced = dining_hall_repo::sync_registry(&db, ingestor.registry())?;
        info!("Registered {synced} dining halls");

        Ok(Arc::new(Self {
            ingestor,
            db,
            cron_secret: server.cron_secret.clone(),
        }))
    }
}
