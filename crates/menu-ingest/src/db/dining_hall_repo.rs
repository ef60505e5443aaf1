//! Dining hall repository. Rows mirror the configured source registry and
//! anchor the `dining_hall` foreign keys of menu items and schedules.

use chrono::Utc;
use rusqlite::params;

use super::{Database, DatabaseError};
use crate::config::{DiningHallSource, SourceRegistry};

/// Inserts or refreshes one row per registered dining hall.
pub fn sync_registry(db: &Database, registry: &SourceRegistry) -> Result<usize, DatabaseError> {
    let now = Utc::now().to_rfc3339();
    db.with_conn(|conn| {
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO dining_hall (id, url, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET url = excluded.url, updated_at = excluded.updated_at",
            )?;
            for source in registry.iter() {
                stmt.execute(params![source.id, source.url, now])?;
            }
        }
        tx.commit()?;
        Ok(registry.len())
    })
}

/// Lists every stored dining hall ordered by id.
pub fn list(db: &Database) -> Result<Vec<DiningHallSource>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT id, url FROM dining_hall ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(DiningHallSource {
                    id: row.get(0)?,
                    url: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn exists(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM dining_hall WHERE id = ?1",
            params![id],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    })
}
