//! Guided meditation commands.

use chrono::Utc;
use clap::Subcommand;
use focusly_core::meditation::{
    BreathingPattern, MeditationKind, MeditationTimer, BREATHING_PATTERNS,
};
use focusly_core::stats::TimeRange;
use focusly_core::storage::Database;

#[derive(Subcommand)]
pub enum MeditateAction {
    /// List the guided programs
    Programs,
    /// List the breathing patterns
    Patterns,
    /// Run a session in the foreground
    Run {
        /// Practice: breathing, mindfulness or body-scan
        kind: String,
        /// Session length in minutes; must be one the program offers
        #[arg(long)]
        minutes: Option<u32>,
        /// Breathing pattern key, e.g. 4-7-8 (breathing practice only)
        #[arg(long)]
        pattern: Option<String>,
        /// End early after this many seconds; the session still counts
        #[arg(long)]
        max_secs: Option<u32>,
    },
    /// Completed meditation per practice
    Log {
        /// Reporting window: 7d, 30d or 90d
        #[arg(long, default_value = "30d")]
        range: String,
    },
}

pub fn run(action: MeditateAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MeditateAction::Programs => {
            for kind in MeditationKind::ALL {
                let program = kind.program();
                println!("{} {} ({})", program.emoji, program.title, kind);
                println!("   {}", program.description);
                println!("   durations: {:?} minutes", program.durations);
                for instruction in program.instructions {
                    println!("   - {instruction}");
                }
            }
        }
        MeditateAction::Patterns => {
            for pattern in &BREATHING_PATTERNS {
                println!(
                    "{:<6} {:<12} inhale {}s, hold {}s, exhale {}s",
                    pattern.key, pattern.name, pattern.inhale, pattern.hold, pattern.exhale
                );
            }
        }
        MeditateAction::Run { kind, minutes, pattern, max_secs } => {
            let kind: MeditationKind = kind.parse()?;
            let program = kind.program();
            let minutes = minutes.unwrap_or(program.durations[0]);
            let pattern = match pattern {
                Some(key) => Some(
                    BreathingPattern::find(&key)
                        .ok_or_else(|| format!("unknown breathing pattern: {key}"))?,
                ),
                None => None,
            };

            let mut timer = MeditationTimer::start(kind, minutes, pattern, Utc::now())?;
            println!(
                "{} {} for {} minutes. Ctrl-C abandons the session.",
                program.emoji, program.title, minutes
            );

            let mut record = None;
            let mut elapsed = 0u32;
            while record.is_none() && !timer.done() {
                if let Some(cap) = max_secs {
                    if elapsed >= cap {
                        record = timer.end();
                        break;
                    }
                }
                std::thread::sleep(std::time::Duration::from_secs(1));
                elapsed += 1;
                record = timer.tick();

                if let Some(cycle) = timer.breathing() {
                    eprint!(
                        "\r{:<11} {}s   (cycle {}, {}s left)      ",
                        cycle.phase().label(),
                        cycle.phase_left(),
                        cycle.cycle() + 1,
                        timer.time_left()
                    );
                } else if timer.time_left() % 60 == 0 && timer.time_left() > 0 {
                    eprintln!("{} minutes left", timer.time_left() / 60);
                }
            }
            eprintln!();

            if let Some(record) = record {
                let db = Database::open()?;
                let mut snapshot = db.load_snapshot()?;
                snapshot.meditation_sessions.push(record.clone());
                db.save_snapshot(&snapshot)?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
        }
        MeditateAction::Log { range } => {
            let range: TimeRange = range.parse()?;
            let db = Database::open()?;
            let snapshot = db.load_snapshot()?;
            let summaries =
                focusly_core::stats::meditation_summaries(&snapshot, range.days(), Utc::now());
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
    }
    Ok(())
}
