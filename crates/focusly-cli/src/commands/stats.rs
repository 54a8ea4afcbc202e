use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use focusly_core::stats::{self, DailyFocus, DailyMood, DailyTasks, TimeRange};
use focusly_core::storage::Database;
use serde::Serialize;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's activity
    Today,
    /// All-time totals
    All,
    /// Full report over a range
    Report {
        /// Reporting window: 7d, 30d or 90d
        #[arg(long, default_value = "30d")]
        range: String,
    },
}

/// Today's slice of every per-day series.
#[derive(Serialize)]
struct TodayStats {
    date: NaiveDate,
    mood: Option<DailyMood>,
    focus: Option<DailyFocus>,
    tasks: Option<DailyTasks>,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let snapshot = db.load_snapshot()?;
    let now = Utc::now();

    match action {
        StatsAction::Today => {
            let today = TodayStats {
                date: now.date_naive(),
                mood: stats::mood_by_day(&snapshot, 1, now).pop(),
                focus: stats::focus_by_day(&snapshot, 1, now).pop(),
                tasks: stats::tasks_by_day(&snapshot, 1, now).pop(),
            };
            println!("{}", serde_json::to_string_pretty(&today)?);
        }
        StatsAction::All => {
            let totals = stats::totals(&snapshot);
            println!("{}", serde_json::to_string_pretty(&totals)?);
        }
        StatsAction::Report { range } => {
            let range: TimeRange = range.parse()?;
            let report = stats::report(&snapshot, range, now);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
