//! SQLite-backed store for trackers and unlocked badges.
//!
//! Timestamps are stored as RFC3339 TEXT. Badge unlocks are idempotent
//! at the storage level via the UNIQUE(tracker_id, badge_id) constraint
//! plus a DO NOTHING upsert, and tracker deletion cascades over badge
//! records inside one transaction.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::migrations;
use super::{data_dir, Store};
use crate::error::DatabaseError;
use crate::tracker::{Tracker, UnlockedBadge};

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Build a Tracker from a database row
fn row_to_tracker(row: &rusqlite::Row) -> Result<Tracker, rusqlite::Error> {
    let start_date: String = row.get(2)?;
    let created_at: String = row.get(6)?;
    Ok(Tracker {
        id: row.get(0)?,
        name: row.get(1)?,
        start_date: parse_datetime_fallback(&start_date),
        current_streak: row.get(3)?,
        is_active: row.get::<_, i64>(4)? != 0,
        urges_defeated: row.get(5)?,
        created_at: parse_datetime_fallback(&created_at),
    })
}

/// Build an UnlockedBadge from a database row
fn row_to_unlocked_badge(row: &rusqlite::Row) -> Result<UnlockedBadge, rusqlite::Error> {
    let unlocked_date: String = row.get(3)?;
    Ok(UnlockedBadge {
        id: row.get(0)?,
        badge_id: row.get(1)?,
        tracker_id: row.get(2)?,
        unlocked_date: parse_datetime_fallback(&unlocked_date),
    })
}

/// SQLite database holding all tracker state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/unhooked/unhooked.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("unhooked.db");
        let conn = Connection::open(path)?;
        migrations::migrate(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open_in_memory()?;
        migrations::migrate(&conn)?;
        Ok(Self { conn })
    }
}

impl Store for Database {
    fn load_trackers(&self) -> Result<Vec<Tracker>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, start_date, current_streak, is_active, urges_defeated, created_at
             FROM trackers ORDER BY created_at",
        )?;
        let trackers = stmt
            .query_map([], row_to_tracker)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(trackers)
    }

    fn get_tracker(&self, id: &str) -> Result<Option<Tracker>, DatabaseError> {
        let tracker = self
            .conn
            .query_row(
                "SELECT id, name, start_date, current_streak, is_active, urges_defeated, created_at
                 FROM trackers WHERE id = ?1",
                params![id],
                row_to_tracker,
            )
            .optional()?;
        Ok(tracker)
    }

    fn save_tracker(&self, tracker: &Tracker) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO trackers (id, name, start_date, current_streak, is_active, urges_defeated, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 start_date = excluded.start_date,
                 current_streak = excluded.current_streak,
                 is_active = excluded.is_active,
                 urges_defeated = excluded.urges_defeated",
            params![
                tracker.id,
                tracker.name,
                tracker.start_date.to_rfc3339(),
                tracker.current_streak,
                if tracker.is_active { 1 } else { 0 },
                tracker.urges_defeated,
                tracker.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn delete_tracker(&self, id: &str) -> Result<usize, DatabaseError> {
        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        let result: Result<usize, rusqlite::Error> = (|| {
            let removed = self.conn.execute(
                "DELETE FROM unlocked_badges WHERE tracker_id = ?1",
                params![id],
            )?;
            self.conn
                .execute("DELETE FROM trackers WHERE id = ?1", params![id])?;
            Ok(removed)
        })();
        match result {
            Ok(removed) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(removed)
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err.into())
            }
        }
    }

    fn set_active_tracker(&self, id: &str) -> Result<bool, DatabaseError> {
        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        let result: Result<bool, rusqlite::Error> = (|| {
            let exists: bool = self
                .conn
                .query_row(
                    "SELECT 1 FROM trackers WHERE id = ?1",
                    params![id],
                    |_| Ok(true),
                )
                .optional()?
                .unwrap_or(false);
            if !exists {
                return Ok(false);
            }
            self.conn
                .execute("UPDATE trackers SET is_active = 0 WHERE is_active = 1", [])?;
            self.conn.execute(
                "UPDATE trackers SET is_active = 1 WHERE id = ?1",
                params![id],
            )?;
            Ok(true)
        })();
        match result {
            Ok(changed) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(changed)
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err.into())
            }
        }
    }

    fn load_unlocked_badges(&self, tracker_id: &str) -> Result<Vec<UnlockedBadge>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, badge_id, tracker_id, unlocked_date
             FROM unlocked_badges WHERE tracker_id = ?1
             ORDER BY unlocked_date",
        )?;
        let badges = stmt
            .query_map(params![tracker_id], row_to_unlocked_badge)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(badges)
    }

    fn save_unlocked_badge(&self, badge: &UnlockedBadge) -> Result<(), DatabaseError> {
        // DO NOTHING keeps the original record (and its unlocked_date)
        // when the pair already exists.
        self.conn.execute(
            "INSERT INTO unlocked_badges (id, badge_id, tracker_id, unlocked_date)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(tracker_id, badge_id) DO NOTHING",
            params![
                badge.id,
                badge.badge_id,
                badge.tracker_id,
                badge.unlocked_date.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn remove_badge(&self, badge_id: &str, tracker_id: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "DELETE FROM unlocked_badges WHERE badge_id = ?1 AND tracker_id = ?2",
            params![badge_id, tracker_id],
        )?;
        Ok(())
    }
}
