//! Schema upgrades keyed on SQLite's `user_version` pragma.
//!
//! Step `n` moves the schema from version `n - 1` to `n` inside its own
//! transaction, so a failed step leaves the previous version intact.

use rusqlite::Connection;

use super::error::DatabaseError;

const STEPS: &[(&str, &str)] = &[
    ("dining halls", include_str!("sql/001_create_dining_halls.sql")),
    ("menu items", include_str!("sql/002_create_menu_items.sql")),
    ("meal schedules", include_str!("sql/003_create_meal_schedules.sql")),
];

/// Schema version after every step has been applied.
pub const LATEST_VERSION: u32 = STEPS.len() as u32;

pub fn schema_version(conn: &Connection) -> Result<u32, DatabaseError> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

/// Brings `conn` up to [`LATEST_VERSION`]. Already applied steps are skipped.
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    let from = schema_version(conn)?;
    if from > LATEST_VERSION {
        return Err(DatabaseError::Migration {
            version: from,
            reason: format!("database is newer than this build (max {})", LATEST_VERSION),
        });
    }

    for (version, (name, sql)) in (1u32..).zip(STEPS.iter()).skip(from as usize) {
        log::info!("Upgrading schema to v{} ({})", version, name);

        let step = |conn: &Connection| -> rusqlite::Result<()> {
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", version)?;
            tx.commit()
        };
        step(conn).map_err(|e| DatabaseError::Migration {
            version,
            reason: e.to_string(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        stmt.query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_fresh_database_reaches_latest_version() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);

        run_all(&conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), LATEST_VERSION);
        assert_eq!(tables(&conn), vec!["dining_hall", "meal_schedule", "menu_item"]);
    }

    #[test]
    fn test_rerun_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();
        run_all(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), LATEST_VERSION);
    }

    #[test]
    fn test_partial_schema_is_completed() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(STEPS[0].1).unwrap();
        conn.pragma_update(None, "user_version", 1u32).unwrap();

        run_all(&conn).unwrap();

        assert_eq!(tables(&conn).len(), STEPS.len());
    }

    #[test]
    fn test_newer_database_is_refused() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", LATEST_VERSION + 1).unwrap();
        assert!(matches!(
            run_all(&conn),
            Err(DatabaseError::Migration { .. })
        ));
    }

    #[test]
    fn test_meal_type_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();
        conn.execute(
            "INSERT INTO dining_hall (id, url, updated_at) VALUES ('a', 'https://a', 'now')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO meal_schedule (dining_hall, meal_type, start_time, end_time, created_at)
             VALUES ('a', 'late night', 's', 'e', 'now')",
            [],
        );
        assert!(result.is_err());
    }
}
