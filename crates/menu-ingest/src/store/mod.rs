//! Persistence collaborator for canonical menu records.

pub mod error;
pub mod sqlite;

use async_trait::async_trait;

pub use error::PersistenceError;

use crate::model::{MealScheduleRecord, MenuItemRecord};

/// Idempotent bulk upserts for the two canonical record sets.
///
/// `upsert_menu_items` conflicts on `(name, dining_hall_id)` and updates
/// `meal_periods` and `updated_at`. `upsert_meal_schedules` conflicts on
/// `(dining_hall_id, meal_period)` and replaces both times and `created_at`.
/// Both return the number of records written.
#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn upsert_menu_items(&self, records: &[MenuItemRecord]) -> Result<usize, PersistenceError>;

    async fn upsert_meal_schedules(
        &self,
        records: &[MealScheduleRecord],
    ) -> Result<usize, PersistenceError>;
}
