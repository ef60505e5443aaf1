pub mod aggregate;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod ingest;
pub mod model;
pub mod store;
pub mod time;

pub use aggregate::{aggregate, Aggregation, MenuAggregator};
pub use config::{load_config, Config, DiningHallSource, FetchConfig, SourceRegistry};
pub use db::{Database, DatabaseError};
pub use error::{ConfigError, IngestError, Result};
pub use extract::{DaypartScraper, ExtractionError, MenuScraper};
pub use fetch::{FetchError, HttpFetcher, PageFetcher};
pub use ingest::{Ingestor, IngestionSummary, SourceError, SourceFailure};
pub use model::{MealPeriod, MealScheduleRecord, MenuItemRecord, RawMealBlock};
pub use store::{MenuStore, PersistenceError};
pub use time::{is_timestamp, normalize, split_time_window, UtcOffset};
