use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::aggregate::{aggregate, Aggregation};
use crate::config::{Config, DiningHallSource, SourceRegistry};
use crate::error::IngestError;
use crate::extract::{DaypartScraper, MenuScraper};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::model::RawMealBlock;
use crate::store::{MenuStore, PersistenceError};
use crate::time::UtcOffset;

use super::error::SourceError;
use super::summary::{IngestionSummary, SourceFailure};

/// Drives one ingestion run: fetch every hall, extract, aggregate, persist.
pub struct Ingestor {
    registry: SourceRegistry,
    offset: UtcOffset,
    fetch_timeout: Duration,
    fetcher: Arc<dyn PageFetcher>,
    scraper: Arc<dyn MenuScraper>,
    store: Arc<dyn MenuStore>,
}

impl Ingestor {
    /// Production constructor: HTTP fetcher and Bon Appetit scraper.
    pub fn from_config(config: &Config, store: Arc<dyn MenuStore>) -> Result<Self, IngestError> {
        let registry = config.registry()?;
        let fetcher = HttpFetcher::new(&config.fetch)?;

        Ok(Self::new(
            registry,
            config.utc_offset,
            config.fetch.timeout(),
            Arc::new(fetcher),
            Arc::new(DaypartScraper::new()),
            store,
        ))
    }

    pub fn new(
        registry: SourceRegistry,
        offset: UtcOffset,
        fetch_timeout: Duration,
        fetcher: Arc<dyn PageFetcher>,
        scraper: Arc<dyn MenuScraper>,
        store: Arc<dyn MenuStore>,
    ) -> Self {
        Self {
            registry,
            offset,
            fetch_timeout,
            fetcher,
            scraper,
            store,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub async fn run(&self) -> Result<IngestionSummary, IngestError> {
        self.run_at(Utc::now()).await
    }

    /// Runs with `now` as record generation time; the reference date is
    /// `now`'s calendar date in the configured offset.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<IngestionSummary, IngestError> {
        let span = info_span!("ingest", dining_halls = self.registry.len());

        async move {
            let (per_hall, mut failures) = self.collect_sources().await;

            if per_hall.is_empty() && !failures.is_empty() {
                let count = failures.len();
                let (_, first) = failures.swap_remove(0);
                return Err(IngestError::AllSourcesFailed { count, first });
            }

            let reference_date = self.offset.local_date(now);
            let aggregation = aggregate(&per_hall, reference_date, self.offset, now);
            info!(
                %reference_date,
                menu_items = aggregation.menu_items.len(),
                meal_schedules = aggregation.meal_schedules.len(),
                "Aggregated menus"
            );

            let (menu_items_saved, meal_schedules_saved) = self.persist(&aggregation).await?;

            let summary = IngestionSummary {
                dining_halls_processed: per_hall.len(),
                menu_items_saved,
                meal_schedules_saved,
                failed_sources: failures
                    .into_iter()
                    .map(|(dining_hall_id, e)| SourceFailure {
                        dining_hall_id,
                        error: e.to_string(),
                    })
                    .collect(),
                timestamp: Utc::now(),
            };

            info!(
                processed = summary.dining_halls_processed,
                failed = summary.failed_sources.len(),
                menu_items = summary.menu_items_saved,
                meal_schedules = summary.meal_schedules_saved,
                "Ingestion complete"
            );
            Ok(summary)
        }
        .instrument(span)
        .await
    }

    /// Fetches and extracts every hall concurrently and waits for all of them.
    async fn collect_sources(
        &self,
    ) -> (BTreeMap<String, Vec<RawMealBlock>>, Vec<(String, SourceError)>) {
        let tasks = self.registry.iter().map(|source| {
            let span = info_span!("source", dining_hall = %source.id);
            async move { (source.id.clone(), self.scrape_source(source).await) }.instrument(span)
        });

        let mut per_hall = BTreeMap::new();
        let mut failures = Vec::new();
        for (id, result) in join_all(tasks).await {
            match result {
                Ok(blocks) => {
                    per_hall.insert(id, blocks);
                }
                Err(e) => {
                    warn!(dining_hall = %id, error = %e, "Skipping dining hall");
                    failures.push((id, e));
                }
            }
        }

        (per_hall, failures)
    }

    async fn scrape_source(&self, source: &DiningHallSource) -> Result<Vec<RawMealBlock>, SourceError> {
        let html = tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(&source.url))
            .await
            .map_err(|_| SourceError::Timeout {
                timeout: self.fetch_timeout,
            })??;

        let blocks = self.scraper.extract(&html)?;
        debug!(blocks = blocks.len(), "Extracted meal blocks");
        Ok(blocks)
    }

    /// Runs both upserts concurrently; both are always attempted.
    async fn persist(&self, aggregation: &Aggregation) -> Result<(usize, usize), PersistenceError> {
        let (items, schedules) = tokio::join!(
            self.store.upsert_menu_items(&aggregation.menu_items),
            self.store.upsert_meal_schedules(&aggregation.meal_schedules),
        );

        if let Err(e) = &items {
            error!(error = %e, "Menu item upsert failed");
        }
        if let Err(e) = &schedules {
            error!(error = %e, "Meal schedule upsert failed");
        }

        Ok((items?, schedules?))
    }
}
