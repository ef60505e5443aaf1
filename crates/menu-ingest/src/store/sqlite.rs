//! [`MenuStore`] backed by the local SQLite [`Database`].

use async_trait::async_trait;

use super::{MenuStore, PersistenceError};
use crate::db::{meal_schedule_repo, menu_item_repo, Database};
use crate::model::{MealScheduleRecord, MenuItemRecord};

#[async_trait]
impl MenuStore for Database {
    async fn upsert_menu_items(&self, records: &[MenuItemRecord]) -> Result<usize, PersistenceError> {
        menu_item_repo::upsert_many(self, records).map_err(|e| PersistenceError::MenuItems(e.into()))
    }

    async fn upsert_meal_schedules(
        &self,
        records: &[MealScheduleRecord],
    ) -> Result<usize, PersistenceError> {
        meal_schedule_repo::upsert_many(self, records)
            .map_err(|e| PersistenceError::MealSchedules(e.into()))
    }
}
