mod database;
mod snapshot;

pub use database::{Database, SNAPSHOT_KEY};
pub use snapshot::{
    Frequency, Mood, MoodEntry, Priority, Recurring, Snapshot, SubTask, Task, TaskFilter,
    TaskSort,
};

use std::path::PathBuf;

use crate::error::{Result, StorageError};
use crate::timer::TimerSession;

/// Where completed timer sessions go. The engine appends through this trait
/// so tests can capture sessions without touching a database.
pub trait SessionStore {
    fn append_session(&mut self, session: TimerSession) -> Result<()>;
}

/// Returns `~/.config/focusly[-dev]/`, creating it if needed.
///
/// FOCUSLY_DATA_DIR overrides the location entirely. Set FOCUSLY_ENV=dev to
/// keep development data separate from the real thing.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FOCUSLY_DATA_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir)
            .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSLY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusly-dev")
    } else {
        base_dir.join("focusly")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
