//! Display and behavior preferences consumed by core formatting.
//!
//! Preference storage belongs to the host; core only parses the JSON blob it
//! is handed. Missing or unknown keys fall back to defaults.

use crate::model::alarm::{AlarmDraft, AlarmSound};
use chrono::{DateTime, Local};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    pub use_24_hour: bool,
    pub show_seconds: bool,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub default_alarm_sound: AlarmSound,
    pub auto_delete_alarms: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            use_24_hour: false,
            show_seconds: true,
            sound_enabled: true,
            vibration_enabled: true,
            default_alarm_sound: AlarmSound::Default,
            auto_delete_alarms: false,
        }
    }
}

impl DisplaySettings {
    /// Parses host-provided settings JSON. Malformed input yields defaults.
    pub fn from_json(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(raw) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(
                    "event=settings_parse module=settings status=error error={}",
                    err
                );
                Self::default()
            }
        }
    }

    /// New-alarm editor draft seeded from the current time and these preferences.
    pub fn new_alarm_draft(&self, now: DateTime<Local>) -> AlarmDraft {
        let mut draft = AlarmDraft::for_now(now).with_auto_delete(self.auto_delete_alarms);
        draft.sound_id = self.default_alarm_sound;
        draft.vibrate = self.vibration_enabled;
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::DisplaySettings;
    use crate::model::alarm::AlarmSound;
    use chrono::{Local, TimeZone};

    #[test]
    fn missing_keys_take_defaults() {
        let settings = DisplaySettings::from_json(r#"{"use24Hour": true}"#);
        assert!(settings.use_24_hour);
        assert!(settings.show_seconds);
        assert_eq!(settings.default_alarm_sound, AlarmSound::Default);
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        assert_eq!(
            DisplaySettings::from_json("{not json"),
            DisplaySettings::default()
        );
        assert_eq!(DisplaySettings::from_json(""), DisplaySettings::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let settings =
            DisplaySettings::from_json(r#"{"theme": "dark", "defaultAlarmSound": "gentle"}"#);
        assert_eq!(settings.default_alarm_sound, AlarmSound::Gentle);
    }

    #[test]
    fn new_alarm_draft_uses_preferences() {
        let settings = DisplaySettings {
            auto_delete_alarms: true,
            default_alarm_sound: AlarmSound::Nature,
            vibration_enabled: false,
            ..DisplaySettings::default()
        };
        let now = Local
            .with_ymd_and_hms(2026, 5, 4, 6, 45, 0)
            .earliest()
            .expect("local time should resolve");
        let draft = settings.new_alarm_draft(now);
        assert_eq!((draft.hour, draft.minute), (6, 45));
        assert!(draft.auto_delete);
        assert!(!draft.vibrate);
        assert_eq!(draft.sound_id, AlarmSound::Nature);
    }
}
