//! Database schema migrations for unhooked.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current migration
//! version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations to bring the database to the current
/// schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// v1: trackers and unlocked_badges tables.
///
/// The UNIQUE constraint on (tracker_id, badge_id) backs the
/// at-most-one-record-per-pair invariant at the storage level.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS trackers (
            id              TEXT PRIMARY KEY,
            name            TEXT NOT NULL,
            start_date      TEXT NOT NULL,
            current_streak  INTEGER NOT NULL DEFAULT 0,
            is_active       INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS unlocked_badges (
            id            TEXT PRIMARY KEY,
            badge_id      TEXT NOT NULL,
            tracker_id    TEXT NOT NULL,
            unlocked_date TEXT NOT NULL,
            UNIQUE(tracker_id, badge_id)
        );

        CREATE INDEX IF NOT EXISTS idx_unlocked_badges_tracker
            ON unlocked_badges(tracker_id);",
    )?;
    set_schema_version(conn, 1)
}

/// v2: urge-defeat counter on trackers.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let has_column = conn
        .prepare("SELECT urges_defeated FROM trackers LIMIT 1")
        .is_ok();
    if !has_column {
        conn.execute_batch(
            "ALTER TABLE trackers ADD COLUMN urges_defeated INTEGER NOT NULL DEFAULT 0;",
        )?;
    }
    set_schema_version(conn, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_fresh_database() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);

        // Full current schema is queryable.
        conn.prepare("SELECT id, name, start_date, current_streak, is_active, urges_defeated, created_at FROM trackers")
            .unwrap();
        conn.prepare("SELECT id, badge_id, tracker_id, unlocked_date FROM unlocked_badges")
            .unwrap();
    }

    #[test]
    fn test_migrate_is_reentrant() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
    }

    #[test]
    fn test_migrate_from_v1() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 1);

        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
        conn.prepare("SELECT urges_defeated FROM trackers").unwrap();
    }

    #[test]
    fn test_unique_pair_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn.execute(
            "INSERT INTO unlocked_badges (id, badge_id, tracker_id, unlocked_date)
             VALUES ('1', 'day7', 't1', '2024-01-01T00:00:00+00:00')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO unlocked_badges (id, badge_id, tracker_id, unlocked_date)
             VALUES ('2', 'day7', 't1', '2024-01-02T00:00:00+00:00')",
            [],
        );
        assert!(dup.is_err());
    }
}
