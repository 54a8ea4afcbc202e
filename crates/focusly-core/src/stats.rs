//! Analytics over the application snapshot.
//!
//! Mood, focus and task histories are bucketed per calendar day (UTC) with
//! empty days skipped; game and meditation activity is summarized per type
//! across the whole range. Day series come back oldest first, ready to be
//! printed as a timeline.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::games::GameType;
use crate::meditation::MeditationKind;
use crate::storage::Snapshot;
use crate::timer::SessionType;

/// Reporting window counted back from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "90d")]
    Days90,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Days7, TimeRange::Days30, TimeRange::Days90];

    pub fn days(&self) -> u32 {
        match self {
            TimeRange::Days7 => 7,
            TimeRange::Days30 => 30,
            TimeRange::Days90 => 90,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Days7 => "7d",
            TimeRange::Days30 => "30d",
            TimeRange::Days90 => "90d",
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "7d" => Ok(TimeRange::Days7),
            "30d" => Ok(TimeRange::Days30),
            "90d" => Ok(TimeRange::Days90),
            other => Err(format!("unknown range: {other} (expected 7d, 30d or 90d)")),
        }
    }
}

/// Average mood, energy and stress for one day, each rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMood {
    pub day: NaiveDate,
    /// 1-5 scale.
    pub mood: f64,
    /// 1-10 scale.
    pub energy: f64,
    /// 1-10 scale.
    pub stress: f64,
}

/// Completed focus work for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFocus {
    pub day: NaiveDate,
    pub sessions: u32,
    pub minutes: u32,
    pub avg_session: u32,
}

/// Task churn for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTasks {
    pub day: NaiveDate,
    pub created: u32,
    pub completed: u32,
    /// Percent of that day's created tasks that are done, 0 when none were
    /// created.
    pub completion_rate: u32,
}

/// Play volume for one game type over the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_type: GameType,
    pub games: u32,
    pub avg_score: u32,
}

/// Completed meditation per practice over the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeditationSummary {
    pub kind: MeditationKind,
    pub sessions: u32,
    pub minutes: u32,
}

/// All-time counters across every domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub focus_sessions: u32,
    pub focus_minutes: u32,
    pub break_sessions: u32,
    pub break_minutes: u32,
    pub tasks_completed: u32,
    pub tasks_open: u32,
    pub games_played: u32,
    pub meditation_sessions: u32,
    pub meditation_minutes: u32,
}

/// Everything the report view shows, computed over one range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub range: TimeRange,
    pub mood: Vec<DailyMood>,
    pub focus: Vec<DailyFocus>,
    pub tasks: Vec<DailyTasks>,
    pub games: Vec<GameSummary>,
    pub meditation: Vec<MeditationSummary>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn day_buckets(days: u32, now: DateTime<Utc>) -> impl Iterator<Item = NaiveDate> {
    (0..i64::from(days))
        .rev()
        .map(move |i| (now - Duration::days(i)).date_naive())
}

/// Per-day mood averages over the last `days` days, oldest first. Days
/// without a check-in are left out.
pub fn mood_by_day(snapshot: &Snapshot, days: u32, now: DateTime<Utc>) -> Vec<DailyMood> {
    let mut series = Vec::new();
    for day in day_buckets(days, now) {
        let entries: Vec<_> = snapshot
            .mood_entries
            .iter()
            .filter(|e| e.date.date_naive() == day)
            .collect();
        if entries.is_empty() {
            continue;
        }

        let n = entries.len() as f64;
        let mood = entries.iter().map(|e| f64::from(e.mood.score())).sum::<f64>() / n;
        let energy = entries.iter().map(|e| f64::from(e.energy)).sum::<f64>() / n;
        let stress = entries.iter().map(|e| f64::from(e.stress)).sum::<f64>() / n;
        series.push(DailyMood {
            day,
            mood: round1(mood),
            energy: round1(energy),
            stress: round1(stress),
        });
    }
    series
}

/// Per-day completed focus sessions over the last `days` days, oldest first.
/// Days without any focus work are left out.
pub fn focus_by_day(snapshot: &Snapshot, days: u32, now: DateTime<Utc>) -> Vec<DailyFocus> {
    let mut series = Vec::new();
    for day in day_buckets(days, now) {
        let focus: Vec<_> = snapshot
            .timer_sessions
            .iter()
            .filter(|s| {
                s.completed
                    && s.session_type == SessionType::Focus
                    && s.start_time.date_naive() == day
            })
            .collect();
        if focus.is_empty() {
            continue;
        }

        let sessions = focus.len() as u32;
        let minutes: u32 = focus.iter().map(|s| s.duration_minutes).sum();
        series.push(DailyFocus {
            day,
            sessions,
            minutes,
            avg_session: (f64::from(minutes) / f64::from(sessions)).round() as u32,
        });
    }
    series
}

/// Per-day task churn over the last `days` days, oldest first. A task counts
/// toward a day when it was created then, or when its deadline falls then.
/// Days with neither are left out.
pub fn tasks_by_day(snapshot: &Snapshot, days: u32, now: DateTime<Utc>) -> Vec<DailyTasks> {
    let mut series = Vec::new();
    for day in day_buckets(days, now) {
        let day_tasks: Vec<_> = snapshot
            .tasks
            .iter()
            .filter(|t| {
                t.created_at.date_naive() == day
                    || t.due_date.is_some_and(|d| d.date_naive() == day)
            })
            .collect();

        let completed = day_tasks.iter().filter(|t| t.completed).count() as u32;
        let created = day_tasks
            .iter()
            .filter(|t| t.created_at.date_naive() == day)
            .count() as u32;
        if completed == 0 && created == 0 {
            continue;
        }

        let completion_rate = if created > 0 {
            (f64::from(completed) / f64::from(created) * 100.0).round() as u32
        } else {
            0
        };
        series.push(DailyTasks { day, created, completed, completion_rate });
    }
    series
}

/// Game activity per type over the last `days` days, one row per game type
/// even when it was never played.
pub fn game_summaries(snapshot: &Snapshot, days: u32, now: DateTime<Utc>) -> Vec<GameSummary> {
    let start = now - Duration::days(i64::from(days.saturating_sub(1)));
    GameType::ALL
        .into_iter()
        .map(|game_type| {
            let scores: Vec<u32> = snapshot
                .brain_game_scores
                .iter()
                .filter(|s| s.game_type == game_type && s.date >= start && s.date <= now)
                .map(|s| s.score)
                .collect();
            let games = scores.len() as u32;
            let avg_score = if games > 0 {
                (f64::from(scores.iter().sum::<u32>()) / f64::from(games)).round() as u32
            } else {
                0
            };
            GameSummary { game_type, games, avg_score }
        })
        .collect()
}

/// Completed meditation per practice over the last `days` days, one row per
/// practice even when it was never used.
pub fn meditation_summaries(
    snapshot: &Snapshot,
    days: u32,
    now: DateTime<Utc>,
) -> Vec<MeditationSummary> {
    let start = now - Duration::days(i64::from(days.saturating_sub(1)));
    MeditationKind::ALL
        .into_iter()
        .map(|kind| {
            let done: Vec<u32> = snapshot
                .meditation_sessions
                .iter()
                .filter(|s| s.kind == kind && s.completed && s.date >= start && s.date <= now)
                .map(|s| s.duration_minutes)
                .collect();
            MeditationSummary {
                kind,
                sessions: done.len() as u32,
                minutes: done.iter().sum(),
            }
        })
        .collect()
}

/// All-time counters. Timer counts only completed sessions; meditation
/// counts only completed sits.
pub fn totals(snapshot: &Snapshot) -> Totals {
    let mut t = Totals::default();
    for session in &snapshot.timer_sessions {
        if !session.completed {
            continue;
        }
        if session.session_type == SessionType::Focus {
            t.focus_sessions += 1;
            t.focus_minutes += session.duration_minutes;
        } else {
            t.break_sessions += 1;
            t.break_minutes += session.duration_minutes;
        }
    }
    for task in &snapshot.tasks {
        if task.completed {
            t.tasks_completed += 1;
        } else {
            t.tasks_open += 1;
        }
    }
    t.games_played = snapshot.brain_game_scores.len() as u32;
    for session in &snapshot.meditation_sessions {
        if session.completed {
            t.meditation_sessions += 1;
            t.meditation_minutes += session.duration_minutes;
        }
    }
    t
}

/// Compute every series and summary for one range.
pub fn report(snapshot: &Snapshot, range: TimeRange, now: DateTime<Utc>) -> Report {
    let days = range.days();
    Report {
        range,
        mood: mood_by_day(snapshot, days, now),
        focus: focus_by_day(snapshot, days, now),
        tasks: tasks_by_day(snapshot, days, now),
        games: game_summaries(snapshot, days, now),
        meditation: meditation_summaries(snapshot, days, now),
    }
}
