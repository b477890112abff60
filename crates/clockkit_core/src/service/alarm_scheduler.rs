//! Alarm scheduler: turns alarm definitions into notification registrations.
//!
//! # Responsibility
//! - Register one weekly trigger per repeat day, or one one-shot trigger.
//! - Withdraw every registration belonging to an alarm.
//!
//! # Invariants
//! - `schedule` cancels before registering, so scheduling twice never
//!   duplicates a firing.
//! - Registration ids are `{alarm_id}` (one-shot) or `{alarm_id}_{day}` (weekly).
//! - The scheduler never reads or writes the alarm store; callers pass the alarm.
//! - Gateway failures are logged and swallowed.

use crate::engine::clock::Clock;
use crate::model::alarm::{Alarm, Weekday};
use crate::notify::gateway::{NotificationGateway, NotificationPayload};
use chrono::{DateTime, Days, Local, LocalResult, NaiveDateTime, NaiveTime, TimeZone};
use log::{info, warn};

/// Days probed when looking for the next valid local occurrence.
const ONE_SHOT_SEARCH_DAYS: u64 = 3;

/// Weekly-trigger ordinal expected by the notification scheduler (Sunday = 1).
pub fn weekday_ordinal(day: Weekday) -> u8 {
    match day {
        Weekday::Sun => 1,
        Weekday::Mon => 2,
        Weekday::Tue => 3,
        Weekday::Wed => 4,
        Weekday::Thu => 5,
        Weekday::Fri => 6,
        Weekday::Sat => 7,
    }
}

/// Registration id for one repeat day of an alarm.
pub fn weekly_trigger_id(alarm_id: &str, day: Weekday) -> String {
    format!("{alarm_id}_{}", day.key())
}

/// Whether registration `registration_id` belongs to `alarm_id`.
pub fn belongs_to_alarm(registration_id: &str, alarm_id: &str) -> bool {
    registration_id == alarm_id
        || registration_id
            .strip_prefix(alarm_id)
            .is_some_and(|rest| rest.starts_with('_'))
}

/// Whether `registration_id` is exactly one of the ids `schedule` mints for
/// `alarm_id`: the id itself or `{alarm_id}_{day}`.
///
/// Alarm ids are opaque, so `wake_sun` may be a one-shot alarm in its own right.
pub fn is_registration_of(registration_id: &str, alarm_id: &str) -> bool {
    registration_id == alarm_id
        || registration_id
            .strip_prefix(alarm_id)
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(Weekday::parse)
            .is_some()
}

/// Next instant strictly after `now` at which the local clock reads `hour:minute`.
///
/// A time already at or before `now` today rolls to tomorrow. Local times that
/// do not exist (DST gap) are skipped; ambiguous ones take the earlier instant.
pub fn next_one_shot_occurrence<Z>(hour: u32, minute: u32, now: &DateTime<Z>) -> Option<DateTime<Z>>
where
    Z: TimeZone,
{
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let zone = now.timezone();
    for day_offset in 0..ONE_SHOT_SEARCH_DAYS {
        let date = now.date_naive().checked_add_days(Days::new(day_offset))?;
        let Some(candidate) = resolve_local(&zone, date.and_time(time)) else {
            continue;
        };
        if candidate > *now {
            return Some(candidate);
        }
    }
    None
}

fn resolve_local<Z: TimeZone>(zone: &Z, naive: NaiveDateTime) -> Option<DateTime<Z>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Some(instant),
        LocalResult::Ambiguous(earlier, _later) => Some(earlier),
        LocalResult::None => None,
    }
}

pub struct AlarmScheduler<G: NotificationGateway, C: Clock, Z: TimeZone = Local> {
    gateway: G,
    clock: C,
    zone: Z,
}

impl<G: NotificationGateway, C: Clock> AlarmScheduler<G, C, Local> {
    /// Scheduler computing one-shot dates in the system local timezone.
    pub fn new(gateway: G, clock: C) -> Self {
        Self::with_zone(gateway, clock, Local)
    }
}

impl<G: NotificationGateway, C: Clock, Z: TimeZone> AlarmScheduler<G, C, Z> {
    pub fn with_zone(gateway: G, clock: C, zone: Z) -> Self {
        Self {
            gateway,
            clock,
            zone,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Replaces every registration of `alarm` with fresh ones.
    pub fn schedule(&self, alarm: &Alarm) {
        self.cancel(&alarm.id);

        let payload = NotificationPayload::alarm(alarm.id.clone(), alarm.notification_body());
        if alarm.is_one_shot() {
            self.schedule_one_shot(alarm, &payload);
        } else {
            self.schedule_weekly(alarm, &payload);
        }
    }

    /// Removes every registration of `alarm_id`. Zero matches is a no-op.
    pub fn cancel(&self, alarm_id: &str) {
        let scheduled = match self.gateway.list_scheduled() {
            Ok(ids) => ids,
            Err(err) => {
                warn!(
                    "event=alarm_cancel module=scheduler status=error alarm_id={} stage=list error={}",
                    alarm_id, err
                );
                return;
            }
        };

        let mut cancelled = 0_usize;
        for registration_id in scheduled
            .iter()
            .filter(|id| belongs_to_alarm(id.as_str(), alarm_id))
        {
            match self.gateway.cancel(registration_id) {
                Ok(()) => cancelled += 1,
                Err(err) => warn!(
                    "event=alarm_cancel module=scheduler status=error alarm_id={} registration_id={} error={}",
                    alarm_id, registration_id, err
                ),
            }
        }
        info!(
            "event=alarm_cancel module=scheduler status=ok alarm_id={} cancelled={}",
            alarm_id, cancelled
        );
    }

    /// Registration ids currently held by the gateway; empty when it cannot be listed.
    pub fn scheduled_ids(&self) -> Vec<String> {
        match self.gateway.list_scheduled() {
            Ok(ids) => ids,
            Err(err) => {
                warn!(
                    "event=alarm_list_scheduled module=scheduler status=error error={}",
                    err
                );
                Vec::new()
            }
        }
    }

    /// Cancels one registration by exact id.
    pub fn cancel_registration(&self, registration_id: &str) -> bool {
        match self.gateway.cancel(registration_id) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=alarm_cancel module=scheduler status=error registration_id={} error={}",
                    registration_id, err
                );
                false
            }
        }
    }

    /// Next firing of a one-shot alarm in this scheduler's timezone.
    pub fn next_occurrence(&self, alarm: &Alarm) -> Option<DateTime<Z>> {
        let now = self.clock.now().with_timezone(&self.zone);
        next_one_shot_occurrence(alarm.hour, alarm.minute, &now)
    }

    fn schedule_one_shot(&self, alarm: &Alarm, payload: &NotificationPayload) {
        let Some(when) = self.next_occurrence(alarm) else {
            warn!(
                "event=alarm_schedule module=scheduler status=error alarm_id={} kind=once error=no_valid_local_time",
                alarm.id
            );
            return;
        };
        let when_epoch_ms = when.timestamp_millis();
        match self
            .gateway
            .schedule_one_shot(&alarm.id, when_epoch_ms, payload)
        {
            Ok(()) => info!(
                "event=alarm_schedule module=scheduler status=ok alarm_id={} kind=once when_epoch_ms={}",
                alarm.id, when_epoch_ms
            ),
            Err(err) => warn!(
                "event=alarm_schedule module=scheduler status=error alarm_id={} kind=once error={}",
                alarm.id, err
            ),
        }
    }

    fn schedule_weekly(&self, alarm: &Alarm, payload: &NotificationPayload) {
        let mut registered = 0_usize;
        for day in &alarm.repeat_days {
            let registration_id = weekly_trigger_id(&alarm.id, *day);
            match self.gateway.schedule_weekly(
                &registration_id,
                weekday_ordinal(*day),
                alarm.hour,
                alarm.minute,
                payload,
            ) {
                Ok(()) => registered += 1,
                Err(err) => warn!(
                    "event=alarm_schedule module=scheduler status=error alarm_id={} kind=weekly day={} error={}",
                    alarm.id,
                    day.key(),
                    err
                ),
            }
        }
        info!(
            "event=alarm_schedule module=scheduler status=ok alarm_id={} kind=weekly registered={} requested={}",
            alarm.id,
            registered,
            alarm.repeat_days.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{belongs_to_alarm, is_registration_of, next_one_shot_occurrence, weekday_ordinal};
    use crate::model::alarm::Weekday;
    use chrono::{TimeZone, Timelike, Utc};
    use chrono_tz::America::New_York;

    #[test]
    fn ordinals_run_sunday_to_saturday() {
        let ordinals: Vec<u8> = Weekday::ALL.into_iter().map(weekday_ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn prefix_matching_requires_separator() {
        assert!(belongs_to_alarm("alarm_12", "alarm_12"));
        assert!(belongs_to_alarm("alarm_12_mon", "alarm_12"));
        assert!(!belongs_to_alarm("alarm_123", "alarm_12"));
        assert!(!belongs_to_alarm("alarm_123_mon", "alarm_12"));
    }

    #[test]
    fn registration_ownership_is_exact() {
        assert!(is_registration_of("alarm_5_sat", "alarm_5"));
        assert!(is_registration_of("alarm_5", "alarm_5"));
        assert!(is_registration_of("wake_sun", "wake_sun"));
        assert!(!is_registration_of("wake_sun", "wake"));
        assert!(!is_registration_of("alarm_5_x_mon", "alarm_5"));
        assert!(!is_registration_of("timer_notification", "timer"));
    }

    #[test]
    fn exact_current_minute_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 7, 30, 0).unwrap();
        let next = next_one_shot_occurrence(7, 30, &now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 11, 7, 30, 0).unwrap());
    }

    #[test]
    fn later_today_stays_today() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 7, 30, 0).unwrap();
        let next = next_one_shot_occurrence(7, 31, &now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 10, 7, 31, 0).unwrap());
    }

    #[test]
    fn dst_gap_skips_to_next_day_with_that_local_time() {
        // 2026-03-08 02:30 does not exist in New York.
        let now = New_York.with_ymd_and_hms(2026, 3, 8, 0, 15, 0).unwrap();
        let next = next_one_shot_occurrence(2, 30, &now).unwrap();
        assert_eq!(next.date_naive().to_string(), "2026-03-09");
        assert_eq!((next.hour(), next.minute()), (2, 30));
    }
}
