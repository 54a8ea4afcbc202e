//! User settings.
//!
//! Settings live inside the stored snapshot rather than a separate file, so
//! they travel with export/import. Field names serialize in camelCase to keep
//! the snapshot JSON stable across versions of the app.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

/// Notification preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub focus_reminders: bool,
    pub task_deadlines: bool,
    pub mood_checkins: bool,
}

/// Pomodoro durations (minutes) and the long-break cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    #[serde(default = "default_focus_time")]
    pub focus_time: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
}

/// Accessibility preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessibilitySettings {
    pub font_size: FontSize,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

/// All user-tunable settings, stored as part of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub theme: Theme,
    pub notifications: NotificationSettings,
    pub pomodoro: PomodoroSettings,
    pub accessibility: AccessibilitySettings,
}

// Default functions
fn default_focus_time() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            focus_reminders: true,
            task_deadlines: true,
            mood_checkins: true,
        }
    }
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            focus_time: default_focus_time(),
            short_break: default_short_break(),
            long_break: default_long_break(),
            long_break_interval: default_long_break_interval(),
        }
    }
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self {
            font_size: FontSize::Medium,
            high_contrast: false,
            reduced_motion: false,
        }
    }
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            notifications: NotificationSettings::default(),
            pomodoro: PomodoroSettings::default(),
            accessibility: AccessibilitySettings::default(),
        }
    }
}

impl PomodoroSettings {
    /// Configured duration in minutes for a session type.
    pub fn duration_minutes(&self, session_type: crate::timer::SessionType) -> u32 {
        use crate::timer::SessionType::*;
        match session_type {
            Focus => self.focus_time,
            Break => self.short_break,
            LongBreak => self.long_break,
        }
    }
}

impl UserSettings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ValidationError::UnknownKey(String::new()).into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ValidationError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ValidationError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|_| ValidationError::InvalidValue {
                            field: key.to_string(),
                            message: format!("cannot parse '{value}' as bool"),
                        })?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value.parse::<u64>().map_err(|_| ValidationError::InvalidValue {
                            field: key.to_string(),
                            message: format!("cannot parse '{value}' as number"),
                        })?;
                        serde_json::Value::Number(n.into())
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ValidationError::UnknownKey(key.to_string()))?;
        }

        Err(ValidationError::UnknownKey(key.to_string()).into())
    }

    /// Get a settings value as string by dot-separated key
    /// (e.g. `pomodoro.focusTime`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a settings value by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed as
    /// the key's type, or the resulting settings fail validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: UserSettings =
            serde_json::from_value(json).map_err(|e| ValidationError::InvalidValue {
                field: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints. Pomodoro durations and the long-break
    /// interval must all be positive.
    pub fn validate(&self) -> Result<()> {
        let p = &self.pomodoro;
        for (field, value) in [
            ("pomodoro.focusTime", p.focus_time),
            ("pomodoro.shortBreak", p.short_break),
            ("pomodoro.longBreak", p.long_break),
            ("pomodoro.longBreakInterval", p.long_break_interval),
        ] {
            if value == 0 {
                return Err(ValidationError::OutOfRange {
                    field: field.to_string(),
                    value: 0,
                    min: 1,
                    max: i64::MAX,
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let settings = UserSettings::default();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.pomodoro.focus_time, 25);
        assert_eq!(settings.pomodoro.short_break, 5);
        assert_eq!(settings.pomodoro.long_break, 15);
        assert_eq!(settings.pomodoro.long_break_interval, 4);
        assert!(settings.notifications.enabled);
        assert_eq!(settings.accessibility.font_size, FontSize::Medium);
    }

    #[test]
    fn json_roundtrip_uses_camel_case() {
        let settings = UserSettings::default();
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["pomodoro"]["focusTime"], 25);
        assert_eq!(json["notifications"]["moodCheckins"], true);
        assert_eq!(json["theme"], "dark");

        let parsed: UserSettings = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let parsed: UserSettings =
            serde_json::from_str(r#"{"pomodoro": {"focusTime": 50}}"#).unwrap();
        assert_eq!(parsed.pomodoro.focus_time, 50);
        assert_eq!(parsed.pomodoro.short_break, 5);
        assert_eq!(parsed.theme, Theme::Dark);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let settings = UserSettings::default();
        assert_eq!(settings.get("pomodoro.focusTime").as_deref(), Some("25"));
        assert_eq!(settings.get("theme").as_deref(), Some("dark"));
        assert_eq!(
            settings.get("notifications.enabled").as_deref(),
            Some("true")
        );
        assert!(settings.get("pomodoro.missing").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut settings = UserSettings::default();
        settings.set("pomodoro.focusTime", "50").unwrap();
        assert_eq!(settings.pomodoro.focus_time, 50);
    }

    #[test]
    fn set_updates_enum_string() {
        let mut settings = UserSettings::default();
        settings.set("theme", "light").unwrap();
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut settings = UserSettings::default();
        assert!(settings.set("pomodoro.nonexistent", "1").is_err());
    }

    #[test]
    fn set_rejects_wrong_type() {
        let mut settings = UserSettings::default();
        assert!(settings.set("notifications.enabled", "not_a_bool").is_err());
        assert!(settings.set("pomodoro.focusTime", "soon").is_err());
    }

    #[test]
    fn set_rejects_zero_durations() {
        let mut settings = UserSettings::default();
        assert!(settings.set("pomodoro.focusTime", "0").is_err());
        // Unchanged after the failed set.
        assert_eq!(settings.pomodoro.focus_time, 25);
    }

    #[test]
    fn duration_lookup_per_session_type() {
        use crate::timer::SessionType;
        let p = PomodoroSettings::default();
        assert_eq!(p.duration_minutes(SessionType::Focus), 25);
        assert_eq!(p.duration_minutes(SessionType::Break), 5);
        assert_eq!(p.duration_minutes(SessionType::LongBreak), 15);
    }
}
