//! # Focusly Core Library
//!
//! This library provides the core business logic for Focusly, a personal
//! productivity companion. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary; any GUI shell is a
//! thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based Pomodoro state machine that requires
//!   the caller to periodically invoke `tick()`, with a one-shot backstop
//!   alarm that completes the session even when ticks are lost
//! - **Brain Games**: Four deterministic mini-game engines (memory, attention,
//!   logic, speed) that accept injected time and RNG seeds
//! - **Meditation**: Guided program catalog, breathing patterns and a
//!   countdown session timer
//! - **Storage**: SQLite-backed snapshot of the whole app state, in the same
//!   JSON shape the Focusly web app exports
//! - **Stats**: Per-day and per-type analytics over the snapshot
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core Pomodoro state machine
//! - [`Database`]: Snapshot persistence and kv store
//! - [`Snapshot`]: The whole persisted app state, with task and mood CRUD
//! - [`Notifier`]: Permission-gated notification dispatch
//! - [`AlarmScheduler`]: Poll-based one-shot alarms carrying typed signals

pub mod error;
pub mod events;
pub mod games;
pub mod logging;
pub mod meditation;
pub mod notify;
pub mod scheduler;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{CoreError, NotifyError, StorageError, ValidationError};
pub use events::Event;
pub use games::{
    AttentionGame, BrainGameScore, GameType, LogicGame, MemoryGame, Outcome, SpeedGame,
};
pub use meditation::{
    BreathingCycle, BreathingPattern, MeditationKind, MeditationProgram, MeditationSession,
    MeditationTimer, BREATHING_PATTERNS, PROGRAMS,
};
pub use notify::{ConsoleBackend, Notifier, NotifyBackend, NullBackend};
pub use scheduler::AlarmScheduler;
pub use settings::{PomodoroSettings, UserSettings};
pub use stats::{Report, TimeRange, Totals};
pub use storage::{
    Database, Mood, MoodEntry, Priority, SessionStore, Snapshot, Task, TaskFilter, TaskSort,
};
pub use timer::{SessionType, TimerEngine, TimerSession, TimerStatus};
