mod engine;
mod session;

pub use engine::{TimerAlarm, TimerEngine, TimerStatus, BACKSTOP_ALARM};
pub use session::{SessionType, TimerSession};
