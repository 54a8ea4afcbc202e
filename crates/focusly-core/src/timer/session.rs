//! Timer session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which kind of pomodoro session is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionType {
    Focus,
    Break,
    LongBreak,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Focus => "focus",
            SessionType::Break => "break",
            SessionType::LongBreak => "long-break",
        }
    }

    /// Human label used in notifications and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Focus => "Focus",
            SessionType::Break => "Break",
            SessionType::LongBreak => "Long break",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, SessionType::Break | SessionType::LongBreak)
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "focus" => Ok(SessionType::Focus),
            "break" => Ok(SessionType::Break),
            "long-break" => Ok(SessionType::LongBreak),
            other => Err(format!("unknown session type: {other}")),
        }
    }
}

/// One completed or in-flight pomodoro session.
///
/// Field names match the snapshot JSON produced by the app, so exported data
/// round-trips without a migration step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSession {
    pub id: String,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    /// Minutes.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl TimerSession {
    /// Open a new in-flight session starting at `now`.
    pub fn begin(session_type: SessionType, duration_minutes: u32, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_type,
            duration_minutes,
            start_time: now,
            end_time: None,
            completed: false,
        }
    }

    /// Close the session at `now`, marking whether it ran to completion.
    pub fn finish(mut self, completed: bool, now: DateTime<Utc>) -> Self {
        self.end_time = Some(now);
        self.completed = completed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_type_wire_names_are_kebab_case() {
        assert_eq!(
            serde_json::to_string(&SessionType::LongBreak).unwrap(),
            "\"long-break\""
        );
        assert_eq!(
            serde_json::from_str::<SessionType>("\"focus\"").unwrap(),
            SessionType::Focus
        );
    }

    #[test]
    fn session_json_uses_app_field_names() {
        let now = Utc::now();
        let session = TimerSession::begin(SessionType::Focus, 25, now);
        let json = serde_json::to_value(&session).unwrap();

        assert_eq!(json["type"], "focus");
        assert_eq!(json["duration"], 25);
        assert!(json.get("startTime").is_some());
        // Open sessions omit endTime entirely.
        assert!(json.get("endTime").is_none());
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn finish_stamps_end_time() {
        let start = Utc::now();
        let end = start + chrono::Duration::minutes(25);
        let session = TimerSession::begin(SessionType::Focus, 25, start).finish(true, end);
        assert_eq!(session.end_time, Some(end));
        assert!(session.completed);
    }
}
