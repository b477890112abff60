//! Alarm domain model.
//!
//! # Responsibility
//! - Define the persisted alarm record and the editor draft it is built from.
//! - Validate time-of-day fields before anything reaches storage.
//!
//! # Invariants
//! - `hour` is in `0..=23` and `minute` is in `0..=59` for every stored alarm.
//! - `repeat_days` is a set: duplicates are impossible, order is irrelevant.
//! - An alarm with empty `repeat_days` fires once.

use chrono::{DateTime, Local, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque alarm identifier, unique within one alarm store.
pub type AlarmId = String;

/// Label shown in the notification body when the alarm label is empty.
pub const DEFAULT_ALARM_BODY: &str = "Time to wake up!";

/// Day key used by repeat rules.
///
/// Declaration order is Sunday-first so set iteration matches the
/// week layout used by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// All day keys in week order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Stable key used in trigger identifiers and persisted JSON.
    pub fn key(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
            Self::Sat => "sat",
        }
    }

    /// Three-letter display name.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Mon => "Mon",
            Self::Tue => "Tue",
            Self::Wed => "Wed",
            Self::Thu => "Thu",
            Self::Fri => "Fri",
            Self::Sat => "Sat",
        }
    }

    /// Full display name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sun => "Sunday",
            Self::Mon => "Monday",
            Self::Tue => "Tuesday",
            Self::Wed => "Wednesday",
            Self::Thu => "Thursday",
            Self::Fri => "Friday",
            Self::Sat => "Saturday",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.key() == value)
    }
}

/// Built-in alarm tones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmSound {
    #[default]
    Default,
    Gentle,
    Classic,
    Digital,
    Nature,
    Melody,
}

impl AlarmSound {
    pub const ALL: [AlarmSound; 6] = [
        AlarmSound::Default,
        AlarmSound::Gentle,
        AlarmSound::Classic,
        AlarmSound::Digital,
        AlarmSound::Nature,
        AlarmSound::Melody,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Gentle => "gentle",
            Self::Classic => "classic",
            Self::Digital => "digital",
            Self::Nature => "nature",
            Self::Melody => "melody",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Gentle => "Gentle Wake",
            Self::Classic => "Classic Bell",
            Self::Digital => "Digital Beep",
            Self::Nature => "Nature Sound",
            Self::Melody => "Morning Melody",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sound| sound.id() == value)
    }
}

/// Validation failure for time-of-day fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmValidationError {
    HourOutOfRange(u32),
    MinuteOutOfRange(u32),
}

impl Display for AlarmValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HourOutOfRange(hour) => write!(f, "hour ({hour}) must be in 0..=23"),
            Self::MinuteOutOfRange(minute) => write!(f, "minute ({minute}) must be in 0..=59"),
        }
    }
}

impl Error for AlarmValidationError {}

/// Checks that `hour:minute` is a valid wall-clock time of day.
pub fn validate_time_of_day(hour: u32, minute: u32) -> Result<(), AlarmValidationError> {
    if hour > 23 {
        return Err(AlarmValidationError::HourOutOfRange(hour));
    }
    if minute > 59 {
        return Err(AlarmValidationError::MinuteOutOfRange(minute));
    }
    Ok(())
}

/// Editor-side alarm input before it is assigned identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmDraft {
    pub hour: u32,
    pub minute: u32,
    pub label: String,
    pub repeat_days: BTreeSet<Weekday>,
    pub sound_id: AlarmSound,
    pub vibrate: bool,
    pub auto_delete: bool,
}

impl AlarmDraft {
    /// Creates a one-shot draft for `hour:minute` with editor defaults.
    pub fn new(hour: u32, minute: u32) -> Self {
        Self {
            hour,
            minute,
            label: String::new(),
            repeat_days: BTreeSet::new(),
            sound_id: AlarmSound::Default,
            vibrate: true,
            auto_delete: false,
        }
    }

    /// Draft pre-filled with the current local time, as the new-alarm editor opens.
    pub fn for_now(now: DateTime<Local>) -> Self {
        Self::new(now.hour(), now.minute())
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_repeat_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.repeat_days = days.into_iter().collect();
        self
    }

    pub fn with_auto_delete(mut self, auto_delete: bool) -> Self {
        self.auto_delete = auto_delete;
        self
    }

    /// Flips one repeat day on or off.
    pub fn toggle_repeat_day(&mut self, day: Weekday) {
        if !self.repeat_days.remove(&day) {
            self.repeat_days.insert(day);
        }
    }

    pub fn validate(&self) -> Result<(), AlarmValidationError> {
        validate_time_of_day(self.hour, self.minute)
    }
}

/// Canonical persisted alarm record.
///
/// Field names follow the persisted JSON layout (`repeatDays`, `soundId`,
/// `autoDelete`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: AlarmId,
    #[serde(deserialize_with = "deserialize_hour")]
    pub hour: u32,
    #[serde(deserialize_with = "deserialize_minute")]
    pub minute: u32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub repeat_days: BTreeSet<Weekday>,
    #[serde(default)]
    pub sound_id: AlarmSound,
    #[serde(default = "default_true")]
    pub vibrate: bool,
    #[serde(default)]
    pub auto_delete: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl Alarm {
    /// Builds an enabled alarm from a draft and caller-provided identity.
    pub fn from_draft(
        id: impl Into<AlarmId>,
        draft: &AlarmDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, AlarmValidationError> {
        draft.validate()?;
        Ok(Self {
            id: id.into(),
            hour: draft.hour,
            minute: draft.minute,
            label: draft.label.clone(),
            repeat_days: draft.repeat_days.clone(),
            sound_id: draft.sound_id,
            vibrate: draft.vibrate,
            auto_delete: draft.auto_delete,
            enabled: true,
            created_at,
        })
    }

    /// Replaces user-editable fields from `draft`, keeping `id` and `created_at`.
    ///
    /// Saving from the editor re-enables the alarm.
    pub fn apply_draft(&mut self, draft: &AlarmDraft) -> Result<(), AlarmValidationError> {
        draft.validate()?;
        self.hour = draft.hour;
        self.minute = draft.minute;
        self.label = draft.label.clone();
        self.repeat_days = draft.repeat_days.clone();
        self.sound_id = draft.sound_id;
        self.vibrate = draft.vibrate;
        self.auto_delete = draft.auto_delete;
        self.enabled = true;
        Ok(())
    }

    /// Draft carrying this alarm's editable fields, as the edit screen opens.
    pub fn to_draft(&self) -> AlarmDraft {
        AlarmDraft {
            hour: self.hour,
            minute: self.minute,
            label: self.label.clone(),
            repeat_days: self.repeat_days.clone(),
            sound_id: self.sound_id,
            vibrate: self.vibrate,
            auto_delete: self.auto_delete,
        }
    }

    /// Minutes since midnight, the list sort key.
    pub fn minute_of_day(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn is_one_shot(&self) -> bool {
        self.repeat_days.is_empty()
    }

    /// Whether this alarm should be removed once it has fired.
    pub fn deletes_after_firing(&self) -> bool {
        self.is_one_shot() && self.auto_delete
    }

    /// Notification body text.
    pub fn notification_body(&self) -> &str {
        if self.label.trim().is_empty() {
            DEFAULT_ALARM_BODY
        } else {
            self.label.as_str()
        }
    }

    pub fn validate(&self) -> Result<(), AlarmValidationError> {
        validate_time_of_day(self.hour, self.minute)
    }
}

fn default_true() -> bool {
    true
}

fn deserialize_hour<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let hour = u32::deserialize(deserializer)?;
    validate_time_of_day(hour, 0).map_err(serde::de::Error::custom)?;
    Ok(hour)
}

fn deserialize_minute<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let minute = u32::deserialize(deserializer)?;
    validate_time_of_day(0, minute).map_err(serde::de::Error::custom)?;
    Ok(minute)
}

#[cfg(test)]
mod tests {
    use super::{validate_time_of_day, AlarmDraft, AlarmValidationError, Weekday};

    #[test]
    fn validate_rejects_out_of_range_fields() {
        assert_eq!(
            validate_time_of_day(24, 0),
            Err(AlarmValidationError::HourOutOfRange(24))
        );
        assert_eq!(
            validate_time_of_day(0, 60),
            Err(AlarmValidationError::MinuteOutOfRange(60))
        );
        assert!(validate_time_of_day(23, 59).is_ok());
    }

    #[test]
    fn toggle_repeat_day_adds_then_removes() {
        let mut draft = AlarmDraft::new(7, 30);
        draft.toggle_repeat_day(Weekday::Mon);
        assert!(draft.repeat_days.contains(&Weekday::Mon));
        draft.toggle_repeat_day(Weekday::Mon);
        assert!(draft.repeat_days.is_empty());
    }

    #[test]
    fn weekday_parse_accepts_only_known_keys() {
        assert_eq!(Weekday::parse("fri"), Some(Weekday::Fri));
        assert_eq!(Weekday::parse("Fri"), None);
    }
}
