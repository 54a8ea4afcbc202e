//! Named one-shot alarms.
//!
//! The scheduler owns no thread and runs no callbacks. Each alarm carries a
//! plain signal value; the driver polls `fire_due()` and dispatches whatever
//! comes back to a single engine entry point. This keeps every state mutation
//! on one logical owner and makes the whole thing serializable, so pending
//! alarms survive a process restart.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Alarm<S> {
    name: String,
    due_at: DateTime<Utc>,
    signal: S,
}

/// A set of named one-shot alarms.
///
/// Scheduling under an existing name replaces the pending alarm, so the same
/// logical alarm can never fire twice. An alarm is removed the moment it is
/// returned from [`fire_due`](AlarmScheduler::fire_due).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmScheduler<S> {
    pending: Vec<Alarm<S>>,
}

impl<S> Default for AlarmScheduler<S> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<S> AlarmScheduler<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a one-shot alarm `delay_ms` after `now`.
    ///
    /// Any pending alarm under the same name is cancelled first. Oversized
    /// delays saturate instead of overflowing; nothing here panics.
    pub fn schedule(&mut self, name: &str, delay_ms: u64, signal: S, now: DateTime<Utc>) {
        self.cancel(name);
        let delay = Duration::milliseconds(delay_ms.min(i64::MAX as u64) as i64);
        let due_at = now.checked_add_signed(delay).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.pending.push(Alarm {
            name: name.to_string(),
            due_at,
            signal,
        });
    }

    /// Remove the pending alarm under `name`. No-op if absent.
    pub fn cancel(&mut self, name: &str) {
        self.pending.retain(|a| a.name != name);
    }

    /// Remove every pending alarm.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Remove and return the signals of every alarm due at or before `now`,
    /// ordered by due time.
    pub fn fire_due(&mut self, now: DateTime<Utc>) -> Vec<S> {
        let mut due: Vec<Alarm<S>> = Vec::new();
        let mut rest: Vec<Alarm<S>> = Vec::new();
        for alarm in self.pending.drain(..) {
            if alarm.due_at <= now {
                due.push(alarm);
            } else {
                rest.push(alarm);
            }
        }
        self.pending = rest;
        due.sort_by_key(|a| a.due_at);
        due.into_iter().map(|a| a.signal).collect()
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.iter().any(|a| a.name == name)
    }

    /// Due time of the pending alarm under `name`, if any.
    pub fn due_at(&self, name: &str) -> Option<DateTime<Utc>> {
        self.pending.iter().find(|a| a.name == name).map(|a| a.due_at)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn fires_once_when_due() {
        let mut sched = AlarmScheduler::new();
        sched.schedule("end", 1_000, "done", t0());

        assert!(sched.fire_due(t0()).is_empty());
        assert_eq!(sched.fire_due(t0() + Duration::seconds(1)), vec!["done"]);
        // Removed after firing.
        assert!(sched.fire_due(t0() + Duration::seconds(60)).is_empty());
        assert!(sched.is_empty());
    }

    #[test]
    fn reschedule_replaces_pending() {
        let mut sched = AlarmScheduler::new();
        sched.schedule("end", 1_000, 1u32, t0());
        sched.schedule("end", 5_000, 2u32, t0());
        assert_eq!(sched.pending_len(), 1);

        // The first registration must not fire.
        assert!(sched.fire_due(t0() + Duration::seconds(2)).is_empty());
        assert_eq!(sched.fire_due(t0() + Duration::seconds(5)), vec![2]);
    }

    #[test]
    fn cancel_absent_is_noop() {
        let mut sched: AlarmScheduler<u8> = AlarmScheduler::new();
        sched.cancel("nothing");
        assert!(sched.is_empty());
    }

    #[test]
    fn cancelled_alarm_never_fires() {
        let mut sched = AlarmScheduler::new();
        sched.schedule("end", 1_000, (), t0());
        sched.cancel("end");
        assert!(sched.fire_due(t0() + Duration::days(1)).is_empty());
    }

    #[test]
    fn cancel_all_clears_everything() {
        let mut sched = AlarmScheduler::new();
        sched.schedule("a", 100, 1u8, t0());
        sched.schedule("b", 200, 2u8, t0());
        sched.cancel_all();
        assert!(sched.fire_due(t0() + Duration::days(1)).is_empty());
    }

    #[test]
    fn fire_order_follows_due_time() {
        let mut sched = AlarmScheduler::new();
        sched.schedule("late", 3_000, "late", t0());
        sched.schedule("early", 1_000, "early", t0());
        assert_eq!(
            sched.fire_due(t0() + Duration::seconds(3)),
            vec!["early", "late"]
        );
    }

    #[test]
    fn oversized_delay_saturates() {
        let mut sched = AlarmScheduler::new();
        sched.schedule("end", u64::MAX, (), t0());
        assert!(sched.fire_due(t0() + Duration::days(365)).is_empty());
        assert!(sched.is_pending("end"));
    }

    #[test]
    fn survives_serialization() {
        let mut sched = AlarmScheduler::new();
        sched.schedule("end", 2_000, 7u32, t0());
        let json = serde_json::to_string(&sched).unwrap();
        let mut restored: AlarmScheduler<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.fire_due(t0() + Duration::seconds(2)), vec![7]);
    }
}
