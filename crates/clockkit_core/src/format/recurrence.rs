//! Repeat-day classification for alarm list labels.

use crate::model::alarm::Weekday;
use std::collections::BTreeSet;

const WORKWEEK: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];
const WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

/// Recurrence class of a repeat-day set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatRule {
    Once,
    Daily,
    Weekdays,
    Weekends,
    Custom(BTreeSet<Weekday>),
}

impl RepeatRule {
    pub fn classify(days: &BTreeSet<Weekday>) -> Self {
        if days.is_empty() {
            return Self::Once;
        }
        if days.len() == Weekday::ALL.len() {
            return Self::Daily;
        }
        if days.len() == WORKWEEK.len() && WORKWEEK.iter().all(|day| days.contains(day)) {
            return Self::Weekdays;
        }
        if days.len() == WEEKEND.len() && WEEKEND.iter().all(|day| days.contains(day)) {
            return Self::Weekends;
        }
        Self::Custom(days.clone())
    }

    /// Label shown under the alarm time.
    ///
    /// Custom sets list short day names in week order, e.g. `Mon, Wed`.
    pub fn text(&self) -> String {
        match self {
            Self::Once => "Once".to_string(),
            Self::Daily => "Every day".to_string(),
            Self::Weekdays => "Weekdays".to_string(),
            Self::Weekends => "Weekends".to_string(),
            Self::Custom(days) => days
                .iter()
                .map(|day| day.short_name())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Shorthand for `RepeatRule::classify(days).text()`.
pub fn repeat_text(days: &BTreeSet<Weekday>) -> String {
    RepeatRule::classify(days).text()
}

#[cfg(test)]
mod tests {
    use super::{repeat_text, RepeatRule};
    use crate::model::alarm::Weekday;
    use std::collections::BTreeSet;

    fn days(list: &[Weekday]) -> BTreeSet<Weekday> {
        list.iter().copied().collect()
    }

    #[test]
    fn classifies_named_sets() {
        use Weekday::*;
        assert_eq!(repeat_text(&days(&[Mon, Tue, Wed, Thu, Fri])), "Weekdays");
        assert_eq!(repeat_text(&days(&[Sat, Sun])), "Weekends");
        assert_eq!(repeat_text(&days(&Weekday::ALL)), "Every day");
        assert_eq!(repeat_text(&BTreeSet::new()), "Once");
    }

    #[test]
    fn custom_sets_list_days_in_week_order() {
        use Weekday::*;
        let rule = RepeatRule::classify(&days(&[Wed, Sun, Mon]));
        assert!(matches!(rule, RepeatRule::Custom(_)));
        assert_eq!(rule.text(), "Sun, Mon, Wed");
    }

    #[test]
    fn near_miss_sets_stay_custom() {
        use Weekday::*;
        assert_eq!(repeat_text(&days(&[Mon, Tue, Wed, Thu, Sat])), "Mon, Tue, Wed, Thu, Sat");
        assert_eq!(repeat_text(&days(&[Sat])), "Sat");
    }
}
