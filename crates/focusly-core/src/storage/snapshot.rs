//! The persisted application snapshot.
//!
//! Everything the app remembers lives in one JSON document: session history,
//! game scores, meditation log, tasks, mood entries and settings. Field
//! names match the JSON the Focusly web app exports, so data moves in both
//! directions without translation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::games::BrainGameScore;
use crate::meditation::MeditationSession;
use crate::settings::UserSettings;
use crate::timer::TimerSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Sort weight, higher is more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

/// Recurrence rule for repeating tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurring {
    pub frequency: Frequency,
    pub interval: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub subtasks: Vec<SubTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurring>,
}

impl Task {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }

    /// Overall completion in percent. Without subtasks the task is all or
    /// nothing; with subtasks the main checkbox weighs 30% and the subtasks
    /// share the remaining 70%.
    pub fn completion_percentage(&self) -> u32 {
        if self.subtasks.is_empty() {
            return if self.completed { 100 } else { 0 };
        }

        let done = self.subtasks.iter().filter(|s| s.completed).count() as f64;
        let main = if self.completed { 0.3 } else { 0.0 };
        let subs = done / self.subtasks.len() as f64 * 0.7;
        ((main + subs) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    VerySad,
    Sad,
    Neutral,
    Happy,
    VeryHappy,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::VerySad,
        Mood::Sad,
        Mood::Neutral,
        Mood::Happy,
        Mood::VeryHappy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::VerySad => "very-sad",
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
            Mood::Happy => "happy",
            Mood::VeryHappy => "very-happy",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::VerySad => "😢",
            Mood::Sad => "😔",
            Mood::Neutral => "😐",
            Mood::Happy => "😊",
            Mood::VeryHappy => "😄",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::VerySad => "Very sad",
            Mood::Sad => "Sad",
            Mood::Neutral => "Neutral",
            Mood::Happy => "Happy",
            Mood::VeryHappy => "Very happy",
        }
    }

    /// Numeric value 1 (very sad) to 5 (very happy), used by the analytics.
    pub fn score(&self) -> u32 {
        match self {
            Mood::VerySad => 1,
            Mood::Sad => 2,
            Mood::Neutral => 3,
            Mood::Happy => 4,
            Mood::VeryHappy => 5,
        }
    }

    /// A few things worth trying in this mood.
    pub fn suggestions(&self) -> &'static [&'static str] {
        match self {
            Mood::VerySad => &[
                "Reach out to someone you trust",
                "Try a short 5-minute meditation",
                "Step outside for a few minutes of fresh air",
                "Listen to calming music",
            ],
            Mood::Sad => &[
                "Practice gratitude: write down 3 positive things",
                "Do a creative activity you enjoy",
                "Take a warm bath or a relaxing shower",
                "Watch something that makes you smile",
            ],
            Mood::Neutral => &[
                "Try a new activity today",
                "Reach out to a friend you have not seen lately",
                "Take a walk in nature",
                "Listen to an inspiring podcast",
            ],
            Mood::Happy => &[
                "Share your good mood with someone",
                "Make time for an activity you love",
                "Write down what makes you happy today",
                "Plan something pleasant for tomorrow",
            ],
            Mood::VeryHappy => &[
                "Celebrate this moment of happiness!",
                "Share your joy with the people close to you",
                "Create a memory of this positive moment",
                "Channel this energy into a project you care about",
            ],
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown mood: {s}"))
    }
}

/// One mood check-in. The tracker keeps at most one entry per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// 1-10.
    pub energy: u32,
    /// 1-10.
    pub stress: u32,
}

/// Which tasks a list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    Pending,
    Completed,
    /// High priority and not yet completed.
    HighPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSort {
    /// Newest first.
    Created,
    /// Soonest deadline first, undated tasks last.
    Due,
    /// Most urgent first.
    Priority,
}

/// The whole persisted application state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub timer_sessions: Vec<TimerSession>,
    pub mood_entries: Vec<MoodEntry>,
    pub brain_game_scores: Vec<BrainGameScore>,
    pub meditation_sessions: Vec<MeditationSession>,
    pub settings: UserSettings,
    pub last_sync: DateTime<Utc>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            timer_sessions: Vec::new(),
            mood_entries: Vec::new(),
            brain_game_scores: Vec::new(),
            meditation_sessions: Vec::new(),
            settings: UserSettings::default(),
            last_sync: Utc::now(),
        }
    }
}

impl Snapshot {
    // ── Tasks ────────────────────────────────────────────────

    /// Create a task. The title must be non-empty after trimming; an empty
    /// description is dropped.
    pub fn add_task(
        &mut self,
        title: &str,
        description: Option<&str>,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".into(),
                message: "task title cannot be empty".into(),
            }
            .into());
        }

        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
            completed: false,
            priority,
            due_date,
            created_at: now,
            subtasks: Vec::new(),
            recurring: None,
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Flip a task's completed state. Returns the new state.
    pub fn toggle_task(&mut self, id: &str) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    pub fn remove_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn add_subtask(&mut self, task_id: &str, title: &str) -> Option<SubTask> {
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;
        let subtask = SubTask {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            completed: false,
        };
        task.subtasks.push(subtask.clone());
        Some(subtask)
    }

    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;
        let subtask = task.subtasks.iter_mut().find(|s| s.id == subtask_id)?;
        subtask.completed = !subtask.completed;
        Some(subtask.completed)
    }

    /// Tasks as a list view would show them: filtered, then stably sorted.
    pub fn tasks_view(&self, filter: TaskFilter, sort: TaskSort) -> Vec<&Task> {
        let mut view: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| match filter {
                TaskFilter::All => true,
                TaskFilter::Pending => !t.completed,
                TaskFilter::Completed => t.completed,
                TaskFilter::HighPriority => t.priority == Priority::High && !t.completed,
            })
            .collect();

        match sort {
            TaskSort::Created => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            TaskSort::Due => view.sort_by(|a, b| match (a.due_date, b.due_date) {
                (None, None) => std::cmp::Ordering::Equal,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (Some(_), None) => std::cmp::Ordering::Less,
                (Some(a), Some(b)) => a.cmp(&b),
            }),
            TaskSort::Priority => view.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
        }
        view
    }

    /// Uncompleted tasks whose deadline falls within `window` of `now`.
    /// Already-overdue tasks are included; they are the most urgent of all.
    pub fn due_soon(&self, now: DateTime<Utc>, window: Duration) -> Vec<&Task> {
        let horizon = now + window;
        let mut due: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| !t.completed && t.due_date.is_some_and(|d| d <= horizon))
            .collect();
        due.sort_by_key(|t| t.due_date);
        due
    }

    // ── Mood ─────────────────────────────────────────────────

    pub fn today_mood(&self, now: DateTime<Utc>) -> Option<&MoodEntry> {
        self.mood_entries
            .iter()
            .find(|e| e.date.date_naive() == now.date_naive())
    }

    /// Record a mood check-in. A second check-in on the same day replaces
    /// the first one in place, keeping its id.
    pub fn record_mood(
        &mut self,
        mood: Mood,
        energy: u32,
        stress: u32,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<MoodEntry> {
        for (field, value) in [("energy", energy), ("stress", stress)] {
            if !(1..=10).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    field: field.into(),
                    value: i64::from(value),
                    min: 1,
                    max: 10,
                }
                .into());
            }
        }

        let notes = notes.map(str::trim).filter(|n| !n.is_empty()).map(String::from);

        if let Some(entry) = self
            .mood_entries
            .iter_mut()
            .find(|e| e.date.date_naive() == now.date_naive())
        {
            entry.date = now;
            entry.mood = mood;
            entry.energy = energy;
            entry.stress = stress;
            entry.notes = notes;
            return Ok(entry.clone());
        }

        let entry = MoodEntry {
            id: Uuid::new_v4().to_string(),
            date: now,
            mood,
            notes,
            energy,
            stress,
        };
        self.mood_entries.push(entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // Fixed morning instant so same-day arithmetic never crosses midnight.
    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn snapshot_json_uses_app_field_names() {
        let snapshot = Snapshot::default();
        let json = serde_json::to_value(&snapshot).unwrap();
        for key in [
            "tasks",
            "timerSessions",
            "moodEntries",
            "brainGameScores",
            "meditationSessions",
            "settings",
            "lastSync",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn parses_app_exported_json() {
        let raw = r#"{
            "tasks": [{
                "id": "t1",
                "title": "Write report",
                "completed": false,
                "priority": "high",
                "dueDate": "2024-05-01T12:00:00Z",
                "createdAt": "2024-04-28T08:00:00Z",
                "subtasks": [{"id": "s1", "title": "Outline", "completed": true}],
                "recurring": {"frequency": "weekly", "interval": 2}
            }],
            "timerSessions": [{
                "id": "ts1",
                "type": "long-break",
                "duration": 15,
                "startTime": "2024-04-28T09:00:00Z",
                "endTime": "2024-04-28T09:15:00Z",
                "completed": true
            }],
            "moodEntries": [{
                "id": "m1",
                "date": "2024-04-28T20:00:00Z",
                "mood": "very-happy",
                "energy": 8,
                "stress": 2
            }],
            "brainGameScores": [],
            "meditationSessions": [],
            "settings": {"pomodoro": {"focusTime": 50}},
            "lastSync": "2024-04-28T21:00:00Z"
        }"#;

        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.tasks.len(), 1);
        let task = &snapshot.tasks[0];
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.subtasks.len(), 1);
        assert_eq!(
            task.recurring,
            Some(Recurring { frequency: Frequency::Weekly, interval: 2 })
        );
        assert_eq!(
            snapshot.timer_sessions[0].session_type,
            crate::timer::SessionType::LongBreak
        );
        assert_eq!(snapshot.mood_entries[0].mood, Mood::VeryHappy);
        assert!(snapshot.mood_entries[0].notes.is_none());
        assert_eq!(snapshot.settings.pomodoro.focus_time, 50);
        // Unspecified settings fall back to defaults.
        assert_eq!(snapshot.settings.pomodoro.short_break, 5);
    }

    #[test]
    fn add_task_trims_and_validates() {
        let mut snapshot = Snapshot::default();
        assert!(snapshot.add_task("   ", None, Priority::Low, None, t0()).is_err());

        let task = snapshot
            .add_task("  Ship it  ", Some("   "), Priority::Medium, None, t0())
            .unwrap();
        assert_eq!(task.title, "Ship it");
        assert!(task.description.is_none());
        assert!(!task.completed);
        assert_eq!(snapshot.tasks.len(), 1);
    }

    #[test]
    fn toggle_and_remove_task() {
        let mut snapshot = Snapshot::default();
        let task = snapshot
            .add_task("Review PR", None, Priority::High, None, t0())
            .unwrap();

        assert_eq!(snapshot.toggle_task(&task.id), Some(true));
        assert_eq!(snapshot.toggle_task(&task.id), Some(false));
        assert_eq!(snapshot.toggle_task("nope"), None);

        assert!(snapshot.remove_task(&task.id));
        assert!(!snapshot.remove_task(&task.id));
        assert!(snapshot.tasks.is_empty());
    }

    #[test]
    fn completion_percentage_weighs_subtasks() {
        let mut snapshot = Snapshot::default();
        let task = snapshot
            .add_task("Release", None, Priority::High, None, t0())
            .unwrap();
        assert_eq!(snapshot.task(&task.id).unwrap().completion_percentage(), 0);

        let sub1 = snapshot.add_subtask(&task.id, "Tag").unwrap();
        snapshot.add_subtask(&task.id, "Publish").unwrap();
        snapshot.toggle_subtask(&task.id, &sub1.id).unwrap();
        // Half the subtasks at 70% weight: 35%.
        assert_eq!(snapshot.task(&task.id).unwrap().completion_percentage(), 35);

        snapshot.toggle_task(&task.id);
        // Plus the main task's 30%.
        assert_eq!(snapshot.task(&task.id).unwrap().completion_percentage(), 65);
    }

    #[test]
    fn tasks_view_filters_and_sorts() {
        let mut snapshot = Snapshot::default();
        let base = t0();
        let old = snapshot
            .add_task("old low", None, Priority::Low, Some(base + Duration::hours(8)), base)
            .unwrap();
        let newer = snapshot
            .add_task(
                "new high",
                None,
                Priority::High,
                Some(base + Duration::hours(2)),
                base + Duration::hours(1),
            )
            .unwrap();
        let undated = snapshot
            .add_task("undated", None, Priority::Medium, None, base + Duration::hours(2))
            .unwrap();
        snapshot.toggle_task(&undated.id);

        let pending = snapshot.tasks_view(TaskFilter::Pending, TaskSort::Created);
        assert_eq!(
            pending.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            vec![newer.id.as_str(), old.id.as_str()]
        );

        let by_due = snapshot.tasks_view(TaskFilter::All, TaskSort::Due);
        assert_eq!(by_due.first().unwrap().id, newer.id);
        assert_eq!(by_due.last().unwrap().id, undated.id);

        let high = snapshot.tasks_view(TaskFilter::HighPriority, TaskSort::Priority);
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].id, newer.id);

        let completed = snapshot.tasks_view(TaskFilter::Completed, TaskSort::Created);
        assert_eq!(completed.len(), 1);
    }

    #[test]
    fn due_soon_window_includes_overdue() {
        let mut snapshot = Snapshot::default();
        let now = t0();
        snapshot
            .add_task("later", None, Priority::Low, Some(now + Duration::hours(30)), now)
            .unwrap();
        let soon = snapshot
            .add_task("soon", None, Priority::Low, Some(now + Duration::hours(2)), now)
            .unwrap();
        let overdue = snapshot
            .add_task("overdue", None, Priority::Low, Some(now - Duration::hours(1)), now)
            .unwrap();
        let done = snapshot
            .add_task("done", None, Priority::Low, Some(now + Duration::hours(1)), now)
            .unwrap();
        snapshot.toggle_task(&done.id);

        let due = snapshot.due_soon(now, Duration::hours(24));
        assert_eq!(
            due.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            vec![overdue.id.as_str(), soon.id.as_str()]
        );
        assert!(snapshot.task(&overdue.id).unwrap().is_overdue(now));
        assert!(!snapshot.task(&soon.id).unwrap().is_overdue(now));
    }

    #[test]
    fn mood_checkin_replaces_same_day_entry() {
        let mut snapshot = Snapshot::default();
        let morning = t0();
        let evening = morning + Duration::hours(8);

        let first = snapshot
            .record_mood(Mood::Sad, 4, 7, Some("rough start"), morning)
            .unwrap();
        let second = snapshot
            .record_mood(Mood::Happy, 7, 3, None, evening)
            .unwrap();

        assert_eq!(snapshot.mood_entries.len(), 1);
        assert_eq!(second.id, first.id);
        assert_eq!(snapshot.mood_entries[0].mood, Mood::Happy);
        assert!(snapshot.mood_entries[0].notes.is_none());

        let tomorrow = morning + Duration::days(1);
        snapshot.record_mood(Mood::Neutral, 5, 5, None, tomorrow).unwrap();
        assert_eq!(snapshot.mood_entries.len(), 2);
    }

    #[test]
    fn mood_rejects_out_of_range_levels() {
        let mut snapshot = Snapshot::default();
        assert!(snapshot.record_mood(Mood::Happy, 0, 5, None, t0()).is_err());
        assert!(snapshot.record_mood(Mood::Happy, 5, 11, None, t0()).is_err());
        assert!(snapshot.mood_entries.is_empty());
    }

    #[test]
    fn mood_scale_and_wire_names() {
        assert_eq!(Mood::VerySad.score(), 1);
        assert_eq!(Mood::VeryHappy.score(), 5);
        assert_eq!(serde_json::to_string(&Mood::VeryHappy).unwrap(), "\"very-happy\"");
        assert_eq!("very-sad".parse::<Mood>().unwrap(), Mood::VerySad);
        for mood in Mood::ALL {
            assert_eq!(mood.suggestions().len(), 4);
            assert!(!mood.emoji().is_empty());
        }
    }
}
