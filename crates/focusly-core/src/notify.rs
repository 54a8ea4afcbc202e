//! Notification sink.
//!
//! `Notifier` wraps a pluggable backend behind a permission gate. Delivery is
//! strictly best-effort: when the capability is absent or delivery fails, the
//! call logs and returns `false`, and nothing propagates to the caller. The
//! fixed app notifications (focus end, break end, task deadline, ...) are
//! canned title/body/tag triples layered over [`Notifier::notify`].

use std::io::Write;

use tracing::{debug, warn};

use crate::error::NotifyError;

/// A single notification. `tag` is advisory replacement metadata: backends
/// that support it may replace an unread notification carrying the same tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub tag: String,
}

/// Delivery capability for notifications.
pub trait NotifyBackend {
    /// Whether this backend can deliver at all in the current environment.
    fn available(&self) -> bool;

    /// Attempt delivery of one notification.
    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes notifications to stderr. Always available.
#[derive(Debug, Default)]
pub struct ConsoleBackend;

impl NotifyBackend for ConsoleBackend {
    fn available(&self) -> bool {
        true
    }

    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        let mut err = std::io::stderr().lock();
        writeln!(err, "[{}] {}: {}", notification.tag, notification.title, notification.body)?;
        Ok(())
    }
}

/// A backend for environments without any delivery capability.
#[derive(Debug, Default)]
pub struct NullBackend;

impl NotifyBackend for NullBackend {
    fn available(&self) -> bool {
        false
    }

    fn deliver(&mut self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Unavailable)
    }
}

/// Permission-gated notification sink.
pub struct Notifier {
    backend: Box<dyn NotifyBackend>,
    /// None until the first permission request; cached afterwards.
    permission: Option<bool>,
}

impl Notifier {
    pub fn new(backend: Box<dyn NotifyBackend>) -> Self {
        Self {
            backend,
            permission: None,
        }
    }

    /// Notifier delivering to stderr.
    pub fn console() -> Self {
        Self::new(Box::new(ConsoleBackend))
    }

    /// Notifier that silently drops everything.
    pub fn disabled() -> Self {
        Self::new(Box::new(NullBackend))
    }

    /// Request permission to deliver notifications.
    ///
    /// Idempotent: the first call asks the backend, later calls return the
    /// cached answer. Returns `false` without erroring when the capability is
    /// absent.
    pub fn request_permission(&mut self) -> bool {
        if let Some(granted) = self.permission {
            return granted;
        }
        let granted = self.backend.available();
        if !granted {
            debug!("notification capability unavailable, permission denied");
        }
        self.permission = Some(granted);
        granted
    }

    /// Deliver a notification, acquiring permission on demand.
    ///
    /// Returns `true` on delivery. Denied permission or a failed delivery
    /// degrade to `false`; neither surfaces an error.
    pub fn notify(&mut self, title: &str, body: &str, tag: &str) -> bool {
        if !self.request_permission() {
            debug!(tag, "notification skipped, permission not granted");
            return false;
        }
        let notification = Notification {
            title: title.to_string(),
            body: body.to_string(),
            tag: tag.to_string(),
        };
        match self.backend.deliver(&notification) {
            Ok(()) => true,
            Err(e) => {
                warn!(tag, "notification delivery failed: {e}");
                false
            }
        }
    }

    // ── App notifications ────────────────────────────────────────────

    pub fn notify_focus_end(&mut self) -> bool {
        self.notify(
            "Focus session complete! 🎯",
            "Take a well-earned break.",
            "focus-end",
        )
    }

    pub fn notify_break_end(&mut self) -> bool {
        self.notify(
            "Break over! ⏰",
            "Ready for another focus session?",
            "break-end",
        )
    }

    pub fn notify_task_deadline(&mut self, task_title: &str) -> bool {
        self.notify(
            "Task deadline! 📋",
            &format!("The task \"{task_title}\" is coming due."),
            "task-deadline",
        )
    }

    pub fn notify_mood_check_in(&mut self) -> bool {
        self.notify(
            "How are you feeling? 😊",
            "Take a moment to log your mood.",
            "mood-checkin",
        )
    }

    pub fn notify_daily_challenge(&mut self) -> bool {
        self.notify(
            "Daily challenge available! 🧠",
            "A new brain game is waiting for you.",
            "daily-challenge",
        )
    }

    pub fn notify_meditation_reminder(&mut self) -> bool {
        self.notify(
            "Time to meditate 🧘",
            "Give yourself a few minutes to unwind.",
            "meditation-reminder",
        )
    }
}
