use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionSummary {
    /// Halls whose page was fetched and extracted.
    pub dining_halls_processed: usize,
    pub menu_items_saved: usize,
    pub meal_schedules_saved: usize,
    /// Halls skipped this run, in registry order.
    pub failed_sources: Vec<SourceFailure>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFailure {
    pub dining_hall_id: String,
    pub error: String,
}
