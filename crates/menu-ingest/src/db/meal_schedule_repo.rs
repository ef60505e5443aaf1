//! Meal schedule repository for the `meal_schedule` table.

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::Serialize;

use super::{parse_timestamp, Database, DatabaseError};
use crate::model::{MealPeriod, MealScheduleRecord};

/// A stored serving window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealScheduleRow {
    pub dining_hall: String,
    pub meal_type: MealPeriod,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
}

/// Inserts or replaces the window of each `(dining_hall, meal_type)`.
pub fn upsert_many(db: &Database, records: &[MealScheduleRecord]) -> Result<usize, DatabaseError> {
    if records.is_empty() {
        return Ok(0);
    }

    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO meal_schedule (dining_hall, meal_type, start_time, end_time, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(dining_hall, meal_type) DO UPDATE SET
                   start_time = excluded.start_time,
                   end_time = excluded.end_time,
                   created_at = excluded.created_at",
            )?;
            for record in records {
                stmt.execute(params![
                    record.dining_hall_id,
                    record.meal_period.as_str(),
                    record.start_time,
                    record.end_time,
                    record.created_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    })
}

/// Windows of one dining hall, in serving order.
pub fn find_by_dining_hall(
    db: &Database,
    dining_hall: &str,
) -> Result<Vec<MealScheduleRow>, DatabaseError> {
    let raw: Vec<(String, String, String, String, String)> = db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT dining_hall, meal_type, start_time, end_time, created_at
             FROM meal_schedule WHERE dining_hall = ?1 ORDER BY start_time",
        )?;
        let rows = stmt
            .query_map(params![dining_hall], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })?;

    raw.into_iter()
        .map(|(dining_hall, meal_type, start_time, end_time, created_at)| {
            let meal_type = meal_type
                .parse::<MealPeriod>()
                .map_err(|e| DatabaseError::InvalidData {
                    column: "meal_type",
                    reason: e.to_string(),
                })?;
            Ok(MealScheduleRow {
                dining_hall,
                meal_type,
                start_time,
                end_time,
                created_at: parse_timestamp("created_at", &created_at)?,
            })
        })
        .collect()
}
