pub mod config;
pub mod data;
pub mod game;
pub mod meditate;
pub mod mood;
pub mod stats;
pub mod task;
pub mod timer;

use focusly_core::storage::Database;
use focusly_core::Notifier;

/// Notifier configured from the stored settings: console delivery when
/// notifications are enabled, a silent sink otherwise.
pub(crate) fn notifier_from_settings(db: &Database) -> Notifier {
    match db.load_snapshot() {
        Ok(snapshot) if snapshot.settings.notifications.enabled => Notifier::console(),
        _ => Notifier::disabled(),
    }
}
