//! SQLite-backed persistence.
//!
//! The app state is one JSON snapshot stored in a key-value table, same
//! shape as the web app's export. The kv table also holds small pieces of
//! engine state the CLI wants to survive between invocations.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::warn;

use super::{data_dir, SessionStore, Snapshot};
use crate::error::{Result, StorageError};
use crate::timer::TimerSession;

/// kv key under which the application snapshot lives.
pub const SNAPSHOT_KEY: &str = "focusly-data";

/// SQLite database holding the application snapshot.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/focusly/focusly.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("focusly.db");
        let conn = Connection::open(&path)
            .map_err(|source| StorageError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    // ── Snapshot ─────────────────────────────────────────────

    /// Load the application snapshot, or a default one when none is stored.
    ///
    /// A snapshot that fails to parse is logged and replaced by the default;
    /// a damaged store should not brick the whole app.
    pub fn load_snapshot(&self) -> Result<Snapshot> {
        let Some(raw) = self.kv_get(SNAPSHOT_KEY)? else {
            return Ok(Snapshot::default());
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!("stored snapshot is unreadable, starting fresh: {e}");
                Ok(Snapshot::default())
            }
        }
    }

    /// Persist the snapshot, stamping `lastSync` with the current time.
    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let mut stamped = snapshot.clone();
        stamped.last_sync = Utc::now();
        let raw = serde_json::to_string(&stamped)?;
        self.kv_set(SNAPSHOT_KEY, &raw)
    }

    /// Drop the stored snapshot. The next load starts from defaults.
    pub fn clear_snapshot(&self) -> Result<()> {
        self.kv_delete(SNAPSHOT_KEY)
    }

    // ── Key-value store ──────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl SessionStore for Database {
    fn append_session(&mut self, session: TimerSession) -> Result<()> {
        let mut snapshot = self.load_snapshot()?;
        snapshot.timer_sessions.push(session);
        self.save_snapshot(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Priority;
    use crate::timer::SessionType;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn missing_snapshot_loads_default() {
        let db = Database::open_memory().unwrap();
        let snapshot = db.load_snapshot().unwrap();
        assert!(snapshot.tasks.is_empty());
        assert_eq!(snapshot.settings.pomodoro.focus_time, 25);
    }

    #[test]
    fn snapshot_roundtrip() {
        let db = Database::open_memory().unwrap();
        let mut snapshot = db.load_snapshot().unwrap();
        snapshot
            .add_task("Water plants", None, Priority::Low, None, Utc::now())
            .unwrap();
        let before = snapshot.last_sync;
        db.save_snapshot(&snapshot).unwrap();

        let loaded = db.load_snapshot().unwrap();
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].title, "Water plants");
        assert!(loaded.last_sync >= before);
    }

    #[test]
    fn corrupt_snapshot_degrades_to_default() {
        let db = Database::open_memory().unwrap();
        db.kv_set(SNAPSHOT_KEY, "{not json at all").unwrap();
        let snapshot = db.load_snapshot().unwrap();
        assert!(snapshot.timer_sessions.is_empty());
    }

    #[test]
    fn append_session_accumulates() {
        let mut db = Database::open_memory().unwrap();
        let now = Utc::now();
        let session = TimerSession::begin(SessionType::Focus, 25, now);
        db.append_session(session.finish(true, now)).unwrap();
        db.append_session(TimerSession::begin(SessionType::Break, 5, now).finish(true, now))
            .unwrap();

        let snapshot = db.load_snapshot().unwrap();
        assert_eq!(snapshot.timer_sessions.len(), 2);
        assert!(snapshot.timer_sessions[0].completed);
        assert_eq!(snapshot.timer_sessions[1].session_type, SessionType::Break);
    }

    #[test]
    fn clear_snapshot_resets() {
        let db = Database::open_memory().unwrap();
        let mut snapshot = db.load_snapshot().unwrap();
        snapshot
            .add_task("Ephemeral", None, Priority::Medium, None, Utc::now())
            .unwrap();
        db.save_snapshot(&snapshot).unwrap();
        db.clear_snapshot().unwrap();
        assert!(db.load_snapshot().unwrap().tasks.is_empty());
    }
}
