//! Pomodoro timer state machine.
//!
//! The engine is driven entirely by the caller: a once-per-second [`tick`]
//! counts the session down, while a one-shot backstop alarm scheduled through
//! [`AlarmScheduler`] guarantees completion even when ticks are lost (process
//! suspended, laptop asleep). Whichever path reaches zero first commits the
//! session; the other becomes a no-op.
//!
//! All wall-clock reads are injected as `now` parameters, so tests drive the
//! engine through arbitrary timelines without sleeping.
//!
//! [`tick`]: TimerEngine::tick

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::events::Event;
use crate::notify::Notifier;
use crate::scheduler::AlarmScheduler;
use crate::settings::PomodoroSettings;
use crate::storage::SessionStore;
use crate::timer::session::{SessionType, TimerSession};

/// Name of the engine's one-shot completion alarm. Rescheduling under the
/// same name replaces any pending instance.
pub const BACKSTOP_ALARM: &str = "timer-end";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

impl std::fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Signal carried by the engine's alarms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerAlarm {
    TimerEnd,
}

/// The pomodoro state machine.
///
/// Serializable so the CLI can persist it between invocations; on reload,
/// [`catch_up`] replays the ticks that elapsed while no process was running.
///
/// [`catch_up`]: TimerEngine::catch_up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerEngine {
    status: TimerStatus,
    session_type: SessionType,
    remaining_seconds: u32,
    initial_seconds: u32,
    session_count: u32,
    current: Option<TimerSession>,
    scheduler: AlarmScheduler<TimerAlarm>,
    last_tick_at: Option<DateTime<Utc>>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(&PomodoroSettings::default())
    }
}

impl TimerEngine {
    pub fn new(settings: &PomodoroSettings) -> Self {
        let initial = settings.focus_time * 60;
        Self {
            status: TimerStatus::Idle,
            session_type: SessionType::Focus,
            remaining_seconds: initial,
            initial_seconds: initial,
            session_count: 0,
            current: None,
            scheduler: AlarmScheduler::new(),
            last_tick_at: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn initial_seconds(&self) -> u32 {
        self.initial_seconds
    }

    /// Completed focus sessions since the counter was last at zero.
    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn current_session(&self) -> Option<&TimerSession> {
        self.current.as_ref()
    }

    /// Elapsed share of the session as a percentage in `0.0..=100.0`.
    pub fn progress(&self) -> f64 {
        if self.initial_seconds == 0 {
            return 0.0;
        }
        let elapsed = f64::from(self.initial_seconds - self.remaining_seconds.min(self.initial_seconds));
        (elapsed / f64::from(self.initial_seconds) * 100.0).clamp(0.0, 100.0)
    }

    pub fn backstop_pending(&self) -> bool {
        self.scheduler.is_pending(BACKSTOP_ALARM)
    }

    /// Current state as a [`Event::StateSnapshot`].
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            status: self.status,
            session_type: self.session_type,
            remaining_seconds: self.remaining_seconds,
            initial_seconds: self.initial_seconds,
            session_count: self.session_count,
            progress_pct: self.progress(),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────

    /// Start the selected session. Durations are read from `settings` at this
    /// moment, so config changes made while idle take effect here.
    ///
    /// Valid only from `Idle`; otherwise returns `None`.
    pub fn start(&mut self, settings: &PomodoroSettings, now: DateTime<Utc>) -> Option<Event> {
        if self.status != TimerStatus::Idle {
            return None;
        }

        let minutes = settings.duration_minutes(self.session_type);
        self.initial_seconds = minutes * 60;
        self.remaining_seconds = self.initial_seconds;
        self.status = TimerStatus::Running;
        self.last_tick_at = Some(now);

        let session = TimerSession::begin(self.session_type, minutes, now);
        let event = Event::TimerStarted {
            session_id: session.id.clone(),
            session_type: self.session_type,
            duration_secs: self.initial_seconds,
            at: now,
        };
        self.current = Some(session);

        self.scheduler.schedule(
            BACKSTOP_ALARM,
            u64::from(self.remaining_seconds) * 1000,
            TimerAlarm::TimerEnd,
            now,
        );

        Some(event)
    }

    /// Pause a running session, cancelling the backstop alarm.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.status != TimerStatus::Running {
            return None;
        }
        self.status = TimerStatus::Paused;
        self.last_tick_at = None;
        self.scheduler.cancel(BACKSTOP_ALARM);
        Some(Event::TimerPaused {
            remaining_seconds: self.remaining_seconds,
            at: now,
        })
    }

    /// Resume a paused session, rescheduling the backstop for the time
    /// actually left.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.status != TimerStatus::Paused {
            return None;
        }
        self.status = TimerStatus::Running;
        self.last_tick_at = Some(now);
        self.scheduler.schedule(
            BACKSTOP_ALARM,
            u64::from(self.remaining_seconds) * 1000,
            TimerAlarm::TimerEnd,
            now,
        );
        Some(Event::TimerResumed {
            remaining_seconds: self.remaining_seconds,
            at: now,
        })
    }

    /// Return to `Idle`, discarding any in-flight session record. The
    /// remaining time is reloaded from `settings` for the selected type.
    pub fn reset(&mut self, settings: &PomodoroSettings, now: DateTime<Utc>) -> Option<Event> {
        self.status = TimerStatus::Idle;
        self.current = None;
        self.last_tick_at = None;
        self.scheduler.cancel(BACKSTOP_ALARM);
        self.initial_seconds = settings.duration_minutes(self.session_type) * 60;
        self.remaining_seconds = self.initial_seconds;
        Some(Event::TimerReset { at: now })
    }

    /// Select a different session type. Valid only from `Idle`.
    pub fn change_type(
        &mut self,
        session_type: SessionType,
        settings: &PomodoroSettings,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        if self.status != TimerStatus::Idle {
            return None;
        }
        self.session_type = session_type;
        self.initial_seconds = settings.duration_minutes(session_type) * 60;
        self.remaining_seconds = self.initial_seconds;
        Some(Event::TimerTypeChanged {
            session_type,
            duration_secs: self.initial_seconds,
            at: now,
        })
    }

    /// Advance the countdown by one second. Completes the session when the
    /// countdown reaches zero.
    pub fn tick(
        &mut self,
        store: &mut dyn SessionStore,
        notifier: &mut Notifier,
        settings: &PomodoroSettings,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        if self.status != TimerStatus::Running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.last_tick_at = Some(now);
        if self.remaining_seconds == 0 {
            return self.complete(store, notifier, settings, now);
        }
        None
    }

    /// Fire any due backstop alarm. If the tick loop already completed the
    /// session, a stale alarm is consumed without effect.
    pub fn fire_due(
        &mut self,
        store: &mut dyn SessionStore,
        notifier: &mut Notifier,
        settings: &PomodoroSettings,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        for signal in self.scheduler.fire_due(now) {
            match signal {
                TimerAlarm::TimerEnd => {
                    if let Some(event) = self.complete(store, notifier, settings, now) {
                        return Some(event);
                    }
                }
            }
        }
        None
    }

    /// Replay the ticks owed since the engine last ran, then fire due alarms.
    ///
    /// Call after deserializing a persisted engine: a session that ran out
    /// while no process was alive completes here, stamped with synthetic
    /// per-second timestamps up to its natural end.
    pub fn catch_up(
        &mut self,
        store: &mut dyn SessionStore,
        notifier: &mut Notifier,
        settings: &PomodoroSettings,
        now: DateTime<Utc>,
    ) -> Vec<Event> {
        let mut events = Vec::new();

        if self.status == TimerStatus::Running {
            if let Some(last) = self.last_tick_at {
                let owed = (now - last).num_seconds().max(0) as u64;
                let owed = owed.min(u64::from(self.remaining_seconds));
                if owed > 0 {
                    debug!(owed, "replaying missed ticks");
                }
                for i in 0..owed {
                    let at = last + Duration::seconds(i as i64 + 1);
                    if let Some(event) = self.tick(store, notifier, settings, at) {
                        events.push(event);
                    }
                }
            }
        }

        if let Some(event) = self.fire_due(store, notifier, settings, now) {
            events.push(event);
        }

        events
    }

    // ── Internal ─────────────────────────────────────────────

    /// Commit the running session: persist the record, bump the counter for
    /// focus sessions, notify, and prepare the follow-up session type.
    ///
    /// Guarded so that the tick path and the backstop path cannot both
    /// commit: the first caller takes the record and flips the status, the
    /// second finds nothing to do. Persistence is best-effort; a storage
    /// failure is logged and the completion stands.
    fn complete(
        &mut self,
        store: &mut dyn SessionStore,
        notifier: &mut Notifier,
        settings: &PomodoroSettings,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        if self.status != TimerStatus::Running {
            return None;
        }
        let session = self.current.take()?;

        self.status = TimerStatus::Completed;
        self.remaining_seconds = 0;
        self.last_tick_at = None;
        self.scheduler.cancel(BACKSTOP_ALARM);

        let finished = session.session_type;
        if let Err(e) = store.append_session(session.finish(true, now)) {
            warn!("completed session could not be saved: {e}");
        }

        if finished == SessionType::Focus {
            self.session_count += 1;
            notifier.notify_focus_end();
        } else {
            notifier.notify_break_end();
        }

        let next = self.next_session_type(finished, settings);
        self.session_type = next;
        self.initial_seconds = settings.duration_minutes(next) * 60;

        Some(Event::TimerCompleted {
            session_type: finished,
            session_count: self.session_count,
            next_type: next,
            at: now,
        })
    }

    /// Rotation rule: every `long_break_interval`-th focus session earns a
    /// long break; breaks always rotate back to focus.
    fn next_session_type(&self, finished: SessionType, settings: &PomodoroSettings) -> SessionType {
        match finished {
            SessionType::Focus => {
                if self.session_count % settings.long_break_interval.max(1) == 0 {
                    SessionType::LongBreak
                } else {
                    SessionType::Break
                }
            }
            SessionType::Break | SessionType::LongBreak => SessionType::Focus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use chrono::TimeZone;

    #[derive(Default)]
    struct RecordingStore {
        sessions: Vec<TimerSession>,
    }

    impl SessionStore for RecordingStore {
        fn append_session(&mut self, session: TimerSession) -> Result<()> {
            self.sessions.push(session);
            Ok(())
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn quick_settings() -> PomodoroSettings {
        // One-minute focus keeps tick loops short in tests.
        PomodoroSettings {
            focus_time: 1,
            short_break: 1,
            long_break: 2,
            long_break_interval: 4,
        }
    }

    /// Drive a started engine through its full countdown.
    fn run_to_completion(
        engine: &mut TimerEngine,
        store: &mut RecordingStore,
        notifier: &mut Notifier,
        settings: &PomodoroSettings,
        from: DateTime<Utc>,
    ) -> Event {
        let mut last = None;
        for i in 0..engine.remaining_seconds() {
            let at = from + Duration::seconds(i64::from(i) + 1);
            if let Some(event) = engine.tick(store, notifier, settings, at) {
                last = Some(event);
            }
        }
        last.expect("countdown should complete")
    }

    #[test]
    fn starts_only_from_idle() {
        let settings = PomodoroSettings::default();
        let mut engine = TimerEngine::new(&settings);

        assert!(engine.start(&settings, t0()).is_some());
        assert_eq!(engine.status(), TimerStatus::Running);
        assert_eq!(engine.remaining_seconds(), 25 * 60);
        assert!(engine.backstop_pending());

        // Second start is rejected.
        assert!(engine.start(&settings, t0()).is_none());
    }

    #[test]
    fn tick_counts_down_by_one() {
        let settings = PomodoroSettings::default();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        engine.start(&settings, t0());
        let event = engine.tick(&mut store, &mut notifier, &settings, t0() + Duration::seconds(1));
        assert!(event.is_none());
        assert_eq!(engine.remaining_seconds(), 25 * 60 - 1);
    }

    #[test]
    fn tick_ignored_when_not_running() {
        let settings = PomodoroSettings::default();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        let before = engine.remaining_seconds();
        engine.tick(&mut store, &mut notifier, &settings, t0());
        assert_eq!(engine.remaining_seconds(), before);
    }

    #[test]
    fn completes_after_duration_elapses() {
        let settings = quick_settings();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        engine.start(&settings, t0());
        let event = run_to_completion(&mut engine, &mut store, &mut notifier, &settings, t0());

        assert!(matches!(
            event,
            Event::TimerCompleted {
                session_type: SessionType::Focus,
                session_count: 1,
                next_type: SessionType::Break,
                ..
            }
        ));
        assert_eq!(engine.status(), TimerStatus::Completed);
        assert_eq!(engine.session_count(), 1);
        assert!(!engine.backstop_pending());

        assert_eq!(store.sessions.len(), 1);
        let record = &store.sessions[0];
        assert!(record.completed);
        assert_eq!(record.session_type, SessionType::Focus);
        assert_eq!(record.duration_minutes, 1);
        assert!(record.end_time.is_some());
    }

    #[test]
    fn completed_stays_until_reset() {
        let settings = quick_settings();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        engine.start(&settings, t0());
        run_to_completion(&mut engine, &mut store, &mut notifier, &settings, t0());

        assert_eq!(engine.status(), TimerStatus::Completed);
        // No new session may start until the caller resets.
        assert!(engine.start(&settings, t0() + Duration::minutes(2)).is_none());

        engine.reset(&settings, t0() + Duration::minutes(2));
        assert_eq!(engine.status(), TimerStatus::Idle);
        // The prepared break is loaded at full duration.
        assert_eq!(engine.session_type(), SessionType::Break);
        assert_eq!(engine.remaining_seconds(), 60);
        assert!(engine.start(&settings, t0() + Duration::minutes(3)).is_some());
    }

    #[test]
    fn pause_and_resume_preserve_remaining() {
        let settings = PomodoroSettings::default();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        engine.start(&settings, t0());
        for i in 0..10 {
            engine.tick(&mut store, &mut notifier, &settings, t0() + Duration::seconds(i + 1));
        }
        let before = engine.remaining_seconds();

        let paused_at = t0() + Duration::seconds(11);
        assert!(engine.pause(paused_at).is_some());
        assert_eq!(engine.status(), TimerStatus::Paused);
        assert!(!engine.backstop_pending());

        // A long gap while paused must not consume time.
        let resumed_at = paused_at + Duration::hours(3);
        assert!(engine.resume(resumed_at).is_some());
        assert_eq!(engine.remaining_seconds(), before);
        assert!(engine.backstop_pending());

        // Backstop is rescheduled relative to the resume instant.
        let mut caught = engine.catch_up(&mut store, &mut notifier, &settings, resumed_at);
        assert!(caught.is_empty());
        caught = engine.catch_up(
            &mut store,
            &mut notifier,
            &settings,
            resumed_at + Duration::seconds(i64::from(before)),
        );
        assert!(matches!(caught.last(), Some(Event::TimerCompleted { .. })));
    }

    #[test]
    fn pause_only_from_running() {
        let settings = PomodoroSettings::default();
        let mut engine = TimerEngine::new(&settings);
        assert!(engine.pause(t0()).is_none());
        assert!(engine.resume(t0()).is_none());
    }

    #[test]
    fn reset_discards_in_flight_session() {
        let settings = PomodoroSettings::default();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        engine.start(&settings, t0());
        for i in 0..30 {
            engine.tick(&mut store, &mut notifier, &settings, t0() + Duration::seconds(i + 1));
        }

        engine.reset(&settings, t0() + Duration::seconds(31));
        assert_eq!(engine.status(), TimerStatus::Idle);
        assert_eq!(engine.remaining_seconds(), 25 * 60);
        assert!(engine.current_session().is_none());
        assert!(!engine.backstop_pending());
        // The abandoned session leaves no record.
        assert!(store.sessions.is_empty());
        assert_eq!(engine.session_count(), 0);
    }

    #[test]
    fn change_type_only_from_idle() {
        let settings = PomodoroSettings::default();
        let mut engine = TimerEngine::new(&settings);

        assert!(engine.change_type(SessionType::Break, &settings, t0()).is_some());
        assert_eq!(engine.session_type(), SessionType::Break);
        assert_eq!(engine.remaining_seconds(), 5 * 60);

        engine.start(&settings, t0());
        assert!(engine
            .change_type(SessionType::LongBreak, &settings, t0())
            .is_none());
        assert_eq!(engine.session_type(), SessionType::Break);

        engine.pause(t0());
        assert!(engine
            .change_type(SessionType::LongBreak, &settings, t0())
            .is_none());
    }

    #[test]
    fn backstop_completes_when_ticks_are_lost() {
        let settings = quick_settings();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        engine.start(&settings, t0());
        // No ticks at all: only the alarm drives completion.
        let event =
            engine.fire_due(&mut store, &mut notifier, &settings, t0() + Duration::seconds(61));
        assert!(matches!(event, Some(Event::TimerCompleted { .. })));
        assert_eq!(store.sessions.len(), 1);

        // Firing again finds nothing due.
        let again =
            engine.fire_due(&mut store, &mut notifier, &settings, t0() + Duration::seconds(120));
        assert!(again.is_none());
        assert_eq!(store.sessions.len(), 1);
    }

    #[test]
    fn completion_commits_exactly_once() {
        let settings = quick_settings();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        engine.start(&settings, t0());
        run_to_completion(&mut engine, &mut store, &mut notifier, &settings, t0());
        assert_eq!(store.sessions.len(), 1);
        assert_eq!(engine.session_count(), 1);

        // A stale alarm after tick-side completion must not double-commit.
        engine.fire_due(&mut store, &mut notifier, &settings, t0() + Duration::seconds(120));
        assert_eq!(store.sessions.len(), 1);
        assert_eq!(engine.session_count(), 1);
    }

    #[test]
    fn fourth_focus_prepares_long_break() {
        let settings = quick_settings();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        let mut at = t0();
        for round in 1..=4u32 {
            engine.reset(&settings, at);
            engine.change_type(SessionType::Focus, &settings, at);
            engine.start(&settings, at);
            let event = run_to_completion(&mut engine, &mut store, &mut notifier, &settings, at);

            let expected_next = if round == 4 {
                SessionType::LongBreak
            } else {
                SessionType::Break
            };
            assert!(matches!(
                event,
                Event::TimerCompleted { session_count, next_type, .. }
                    if session_count == round && next_type == expected_next
            ));
            at = at + Duration::minutes(5);
        }

        assert_eq!(engine.session_count(), 4);
        assert_eq!(engine.session_type(), SessionType::LongBreak);
    }

    #[test]
    fn break_completion_keeps_session_count() {
        let settings = quick_settings();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        engine.change_type(SessionType::Break, &settings, t0());
        engine.start(&settings, t0());
        let event = run_to_completion(&mut engine, &mut store, &mut notifier, &settings, t0());

        assert!(matches!(
            event,
            Event::TimerCompleted {
                session_type: SessionType::Break,
                session_count: 0,
                next_type: SessionType::Focus,
                ..
            }
        ));
        assert_eq!(engine.session_count(), 0);
    }

    #[test]
    fn catch_up_replays_missed_ticks() {
        let settings = quick_settings();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        engine.start(&settings, t0());

        // Halfway: ticks are replayed, no completion yet.
        let events =
            engine.catch_up(&mut store, &mut notifier, &settings, t0() + Duration::seconds(30));
        assert!(events.is_empty());
        assert_eq!(engine.remaining_seconds(), 30);

        // Far past the end: completes once, at its natural end time.
        let events =
            engine.catch_up(&mut store, &mut notifier, &settings, t0() + Duration::seconds(300));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::TimerCompleted { .. }));
        assert_eq!(store.sessions.len(), 1);
        assert_eq!(
            store.sessions[0].end_time,
            Some(t0() + Duration::seconds(60))
        );
    }

    #[test]
    fn progress_tracks_elapsed_share() {
        let settings = quick_settings();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        engine.start(&settings, t0());
        assert_eq!(engine.progress(), 0.0);

        for i in 0..30 {
            engine.tick(&mut store, &mut notifier, &settings, t0() + Duration::seconds(i + 1));
        }
        assert!((engine.progress() - 50.0).abs() < f64::EPSILON);

        run_to_completion(&mut engine, &mut store, &mut notifier, &settings, t0() + Duration::seconds(30));
        assert_eq!(engine.progress(), 100.0);
    }

    #[test]
    fn serialization_preserves_running_state() {
        let settings = quick_settings();
        let mut engine = TimerEngine::new(&settings);
        let mut store = RecordingStore::default();
        let mut notifier = Notifier::disabled();

        engine.start(&settings, t0());
        for i in 0..10 {
            engine.tick(&mut store, &mut notifier, &settings, t0() + Duration::seconds(i + 1));
        }

        let json = serde_json::to_string(&engine).unwrap();
        let mut restored: TimerEngine = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.status(), TimerStatus::Running);
        assert_eq!(restored.remaining_seconds(), 50);
        assert!(restored.backstop_pending());

        // The restored engine completes where the original would have.
        let events =
            restored.catch_up(&mut store, &mut notifier, &settings, t0() + Duration::seconds(90));
        assert!(matches!(events.last(), Some(Event::TimerCompleted { .. })));
    }
}
