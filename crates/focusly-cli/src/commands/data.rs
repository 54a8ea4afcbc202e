//! Backup and restore of the whole data snapshot.

use clap::Subcommand;
use std::path::PathBuf;

use focusly_core::storage::{data_dir, Database, Snapshot};

#[derive(Subcommand)]
pub enum DataAction {
    /// Export all data as JSON
    Export {
        /// Output file path (default: the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import a previously exported JSON file, replacing current data
    Import {
        /// File produced by `data export`
        file: PathBuf,
    },
    /// Delete all stored data
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        DataAction::Export { output } => {
            let snapshot = db.load_snapshot()?;
            let json = serde_json::to_string_pretty(&snapshot)?;

            let output_path = output.unwrap_or_else(|| {
                data_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join("focusly-export.json")
            });
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output_path, json)?;

            println!("Data exported to: {}", output_path.display());
            println!("Tasks: {}", snapshot.tasks.len());
            println!("Timer sessions: {}", snapshot.timer_sessions.len());
        }
        DataAction::Import { file } => {
            let json = std::fs::read_to_string(&file)?;
            let snapshot: Snapshot = serde_json::from_str(&json)?;
            snapshot.settings.validate()?;
            db.save_snapshot(&snapshot)?;

            println!("Data imported from: {}", file.display());
            println!("Tasks: {}", snapshot.tasks.len());
            println!("Timer sessions: {}", snapshot.timer_sessions.len());
            println!("Mood entries: {}", snapshot.mood_entries.len());
            println!("Game scores: {}", snapshot.brain_game_scores.len());
            println!("Meditation sessions: {}", snapshot.meditation_sessions.len());
        }
        DataAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear all data without --yes".into());
            }
            db.clear_snapshot()?;
            db.kv_delete(super::timer::ENGINE_KEY)?;
            println!("All data cleared.");
        }
    }
    Ok(())
}
