//! In-memory collaborators for the ingestion pipeline.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use menu_ingest::fetch::{FetchError, PageFetcher};
use menu_ingest::model::{MealScheduleRecord, MenuItemRecord};
use menu_ingest::store::{MenuStore, PersistenceError};

/// Serves fixed pages by URL. Unknown URLs answer HTTP 404, URLs in
/// `stalled` never answer.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    stalled: Vec<String>,
    pub calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn stall(mut self, url: impl Into<String>) -> Self {
        self.stalled.push(url.into());
        self
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.stalled.iter().any(|u| u == url) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Store that keeps every upserted batch and can be told to fail.
#[derive(Default)]
pub struct MemoryStore {
    pub menu_items: Mutex<Vec<Vec<MenuItemRecord>>>,
    pub meal_schedules: Mutex<Vec<Vec<MealScheduleRecord>>>,
    pub fail_menu_items: bool,
    pub fail_meal_schedules: bool,
}

impl MemoryStore {
    pub fn last_menu_items(&self) -> Vec<MenuItemRecord> {
        self.menu_items.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn last_meal_schedules(&self) -> Vec<MealScheduleRecord> {
        self.meal_schedules
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn upsert_menu_items(&self, records: &[MenuItemRecord]) -> Result<usize, PersistenceError> {
        if self.fail_menu_items {
            return Err(PersistenceError::MenuItems("menu_item table unavailable".into()));
        }
        self.menu_items.lock().unwrap().push(records.to_vec());
        Ok(records.len())
    }

    async fn upsert_meal_schedules(
        &self,
        records: &[MealScheduleRecord],
    ) -> Result<usize, PersistenceError> {
        if self.fail_meal_schedules {
            return Err(PersistenceError::MealSchedules(
                "meal_schedule table unavailable".into(),
            ));
        }
        self.meal_schedules.lock().unwrap().push(records.to_vec());
        Ok(records.len())
    }
}
