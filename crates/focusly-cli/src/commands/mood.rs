//! Mood tracking commands.

use chrono::{Duration, Utc};
use clap::Subcommand;
use focusly_core::storage::{Database, Mood};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record today's mood (a second check-in replaces the first)
    Add {
        /// One of very-sad, sad, neutral, happy, very-happy
        mood: String,
        /// Energy level 1-10
        #[arg(long, default_value = "5")]
        energy: u32,
        /// Stress level 1-10
        #[arg(long, default_value = "5")]
        stress: u32,
        /// Free-form note
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show today's check-in
    Today,
    /// Mood history, newest first
    List {
        /// How many days back to include
        #[arg(long, default_value = "30")]
        days: i64,
    },
    /// Things worth trying in the current (or a given) mood
    Suggest {
        /// Mood to get suggestions for; defaults to today's check-in
        mood: Option<String>,
    },
}

pub fn run(action: MoodAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut snapshot = db.load_snapshot()?;
    let now = Utc::now();

    match action {
        MoodAction::Add { mood, energy, stress, notes } => {
            let mood: Mood = mood.parse()?;
            let entry = snapshot.record_mood(mood, energy, stress, notes.as_deref(), now)?;
            db.save_snapshot(&snapshot)?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        MoodAction::Today => match snapshot.today_mood(now) {
            Some(entry) => println!("{}", serde_json::to_string_pretty(entry)?),
            None => println!("No mood recorded today."),
        },
        MoodAction::List { days } => {
            let cutoff = now - Duration::days(days);
            let mut history: Vec<_> = snapshot
                .mood_entries
                .iter()
                .filter(|e| e.date >= cutoff)
                .collect();
            history.sort_by(|a, b| b.date.cmp(&a.date));
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        MoodAction::Suggest { mood } => {
            let mood: Mood = match mood {
                Some(raw) => raw.parse()?,
                None => snapshot
                    .today_mood(now)
                    .map(|e| e.mood)
                    .ok_or("no mood recorded today; name one explicitly")?,
            };
            println!("{} {}", mood.emoji(), mood.label());
            for suggestion in mood.suggestions() {
                println!("  - {suggestion}");
            }
        }
    }
    Ok(())
}
