//! Engine events.
//!
//! Commands on [`crate::timer::TimerEngine`] return an `Option<Event>`
//! describing what changed. Callers decide what to do with them: the CLI
//! prints them as JSON, tests assert on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{SessionType, TimerStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        session_id: String,
        session_type: SessionType,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_seconds: u32,
        at: DateTime<Utc>,
    },
    /// A session ran down to zero. `next_type` is the prepared follow-up
    /// session, not yet started.
    TimerCompleted {
        session_type: SessionType,
        session_count: u32,
        next_type: SessionType,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    TimerTypeChanged {
        session_type: SessionType,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// Point-in-time view of the engine, emitted on demand.
    StateSnapshot {
        status: TimerStatus,
        session_type: SessionType,
        remaining_seconds: u32,
        initial_seconds: u32,
        session_count: u32,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_tag_by_type() {
        let event = Event::TimerReset { at: Utc::now() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "timer_reset");
    }

    #[test]
    fn completed_event_carries_rotation() {
        let event = Event::TimerCompleted {
            session_type: SessionType::Focus,
            session_count: 4,
            next_type: SessionType::LongBreak,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "timer_completed");
        assert_eq!(json["session_type"], "focus");
        assert_eq!(json["next_type"], "long-break");
        assert_eq!(json["session_count"], 4);
    }
}
