//! Menu item repository: bulk upsert and per-hall lookups for `menu_item`.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::Serialize;

use super::{parse_timestamp, Database, DatabaseError};
use crate::model::{MealPeriod, MenuItemRecord};

/// A stored menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRow {
    pub id: i64,
    pub name: String,
    pub dining_hall: String,
    pub meal_types: BTreeSet<MealPeriod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inserts or updates every record in one transaction.
///
/// Conflicts on `(name, dining_hall)` replace `meal_types` and `updated_at`;
/// `created_at` keeps its first value.
pub fn upsert_many(db: &Database, records: &[MenuItemRecord]) -> Result<usize, DatabaseError> {
    if records.is_empty() {
        return Ok(0);
    }

    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO menu_item (name, dining_hall, meal_types, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(name, dining_hall) DO UPDATE SET
                   meal_types = excluded.meal_types,
                   updated_at = excluded.updated_at",
            )?;
            for record in records {
                let meal_types = serde_json::to_string(&record.meal_periods).map_err(|e| {
                    DatabaseError::InvalidData {
                        column: "meal_types",
                        reason: e.to_string(),
                    }
                })?;
                stmt.execute(params![
                    record.name,
                    record.dining_hall_id,
                    meal_types,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    })
}

/// Menu items of one dining hall ordered by name, optionally only those
/// served during `meal`.
pub fn find_by_dining_hall(
    db: &Database,
    dining_hall: &str,
    meal: Option<MealPeriod>,
) -> Result<Vec<MenuItemRow>, DatabaseError> {
    db.with_conn(|conn| {
        let raw = match meal {
            Some(meal) => {
                let mut stmt = conn.prepare(
                    "SELECT id, name, dining_hall, meal_types, created_at, updated_at
                     FROM menu_item
                     WHERE dining_hall = ?1
                       AND EXISTS (SELECT 1 FROM json_each(menu_item.meal_types)
                                   WHERE json_each.value = ?2)
                     ORDER BY name",
                )?;
                let rows = stmt
                    .query_map(params![dining_hall, meal.as_str()], raw_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, name, dining_hall, meal_types, created_at, updated_at
                     FROM menu_item WHERE dining_hall = ?1 ORDER BY name",
                )?;
                let rows = stmt
                    .query_map(params![dining_hall], raw_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        raw.into_iter().map(RawMenuItemRow::decode).collect()
    })
}

/// Column values before JSON/timestamp decoding.
struct RawMenuItemRow {
    id: i64,
    name: String,
    dining_hall: String,
    meal_types: String,
    created_at: String,
    updated_at: String,
}

fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawMenuItemRow> {
    Ok(RawMenuItemRow {
        id: row.get(0)?,
        name: row.get(1)?,
        dining_hall: row.get(2)?,
        meal_types: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

impl RawMenuItemRow {
    fn decode(self) -> Result<MenuItemRow, DatabaseError> {
        let meal_types: BTreeSet<MealPeriod> =
            serde_json::from_str(&self.meal_types).map_err(|e| DatabaseError::InvalidData {
                column: "meal_types",
                reason: e.to_string(),
            })?;
        Ok(MenuItemRow {
            id: self.id,
            name: self.name,
            dining_hall: self.dining_hall,
            meal_types,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}
