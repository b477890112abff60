use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Asia::Tokyo;
use clockkit_core::notify::{NotificationCategory, Registration};
use clockkit_core::service::alarm_scheduler::belongs_to_alarm;
use clockkit_core::{
    Alarm, AlarmDraft, AlarmScheduler, GatewayCommand, ManualClock, RecordingGateway, Weekday,
};

fn now() -> DateTime<Utc> {
    // Wednesday.
    Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap()
}

fn alarm(id: &str, draft: AlarmDraft) -> Alarm {
    Alarm::from_draft(id, &draft, now()).unwrap()
}

fn matching_ids(gateway: &RecordingGateway, alarm_id: &str) -> Vec<String> {
    gateway
        .registered_ids()
        .into_iter()
        .filter(|id| belongs_to_alarm(id, alarm_id))
        .collect()
}

#[test]
fn passed_one_shot_time_rolls_to_tomorrow() {
    let gateway = RecordingGateway::new();
    let scheduler = AlarmScheduler::with_zone(&gateway, ManualClock::at(now()), Utc);

    scheduler.schedule(&alarm("alarm_1", AlarmDraft::new(7, 0)));

    let expected = Utc.with_ymd_and_hms(2026, 4, 2, 7, 0, 0).unwrap();
    match gateway.registration("alarm_1") {
        Some(Registration::OneShot { when_epoch_ms, .. }) => {
            assert_eq!(when_epoch_ms, expected.timestamp_millis());
        }
        other => panic!("expected one-shot registration, got {other:?}"),
    }
}

#[test]
fn upcoming_one_shot_time_fires_today() {
    let gateway = RecordingGateway::new();
    let scheduler = AlarmScheduler::with_zone(&gateway, ManualClock::at(now()), Utc);

    scheduler.schedule(&alarm("alarm_1", AlarmDraft::new(8, 1)));

    let expected = Utc.with_ymd_and_hms(2026, 4, 1, 8, 1, 0).unwrap();
    assert_eq!(
        gateway.registration("alarm_1"),
        Some(Registration::OneShot {
            when_epoch_ms: expected.timestamp_millis(),
            payload: clockkit_core::NotificationPayload::alarm(
                "alarm_1",
                "Time to wake up!"
            ),
        })
    );
}

#[test]
fn one_shot_is_computed_in_the_scheduler_zone() {
    let gateway = RecordingGateway::new();
    // 08:00 UTC is 17:00 in Tokyo, so 09:00 Tokyo is next morning.
    let scheduler = AlarmScheduler::with_zone(&gateway, ManualClock::at(now()), Tokyo);

    let next = scheduler
        .next_occurrence(&alarm("alarm_1", AlarmDraft::new(9, 0)))
        .unwrap();

    assert_eq!(next, Tokyo.with_ymd_and_hms(2026, 4, 2, 9, 0, 0).unwrap());
}

#[test]
fn repeating_alarm_registers_one_weekly_trigger_per_day() {
    let gateway = RecordingGateway::new();
    let scheduler = AlarmScheduler::with_zone(&gateway, ManualClock::at(now()), Utc);
    let repeating = alarm(
        "alarm_7",
        AlarmDraft::new(6, 15)
            .with_label("run")
            .with_repeat_days([Weekday::Sun, Weekday::Wed, Weekday::Sat]),
    );

    scheduler.schedule(&repeating);

    assert_eq!(
        matching_ids(&gateway, "alarm_7"),
        vec![
            "alarm_7_sat".to_string(),
            "alarm_7_sun".to_string(),
            "alarm_7_wed".to_string()
        ]
    );
    match gateway.registration("alarm_7_sun") {
        Some(Registration::Weekly {
            weekday,
            hour,
            minute,
            payload,
        }) => {
            assert_eq!((weekday, hour, minute), (1, 6, 15));
            assert_eq!(payload.title, "⏰ Alarm");
            assert_eq!(payload.body, "run");
            assert_eq!(payload.category, NotificationCategory::Alarm);
            assert_eq!(payload.alarm_id.as_deref(), Some("alarm_7"));
        }
        other => panic!("expected weekly registration, got {other:?}"),
    }
    assert!(matches!(
        gateway.registration("alarm_7_sat"),
        Some(Registration::Weekly { weekday: 7, .. })
    ));
}

#[test]
fn scheduling_twice_leaves_a_single_set_of_registrations() {
    let gateway = RecordingGateway::new();
    let scheduler = AlarmScheduler::with_zone(&gateway, ManualClock::at(now()), Utc);
    let repeating = alarm(
        "alarm_7",
        AlarmDraft::new(6, 15).with_repeat_days([Weekday::Mon, Weekday::Tue]),
    );

    scheduler.schedule(&repeating);
    let first = gateway.registrations();
    scheduler.schedule(&repeating);

    assert_eq!(gateway.registrations(), first);
    assert_eq!(matching_ids(&gateway, "alarm_7").len(), 2);
}

#[test]
fn rescheduling_after_edit_drops_removed_days() {
    let gateway = RecordingGateway::new();
    let scheduler = AlarmScheduler::with_zone(&gateway, ManualClock::at(now()), Utc);
    let mut edited = alarm(
        "alarm_7",
        AlarmDraft::new(6, 15).with_repeat_days([Weekday::Mon, Weekday::Tue]),
    );
    scheduler.schedule(&edited);

    edited.repeat_days.clear();
    scheduler.schedule(&edited);

    assert_eq!(matching_ids(&gateway, "alarm_7"), vec!["alarm_7".to_string()]);
}

#[test]
fn cancel_removes_every_matching_registration_only() {
    let gateway = RecordingGateway::new();
    let scheduler = AlarmScheduler::with_zone(&gateway, ManualClock::at(now()), Utc);
    scheduler.schedule(&alarm(
        "alarm_12",
        AlarmDraft::new(6, 0).with_repeat_days(Weekday::ALL),
    ));
    scheduler.schedule(&alarm("alarm_123", AlarmDraft::new(6, 0)));

    scheduler.cancel("alarm_12");

    assert!(matching_ids(&gateway, "alarm_12").is_empty());
    assert_eq!(gateway.registered_ids(), vec!["alarm_123".to_string()]);
}

#[test]
fn cancel_without_registrations_is_a_no_op() {
    let gateway = RecordingGateway::new();
    let scheduler = AlarmScheduler::with_zone(&gateway, ManualClock::at(now()), Utc);

    scheduler.cancel("alarm_absent");

    assert!(gateway.commands().is_empty());
}

#[test]
fn cancel_reaches_registrations_made_by_an_earlier_process() {
    let gateway = RecordingGateway::new();
    gateway.assume_scheduled(["alarm_5_mon", "alarm_5_fri", "timer_notification"]);
    let scheduler = AlarmScheduler::with_zone(&gateway, ManualClock::at(now()), Utc);

    scheduler.cancel("alarm_5");

    assert_eq!(
        gateway.commands(),
        vec![
            GatewayCommand::Cancel {
                id: "alarm_5_fri".to_string()
            },
            GatewayCommand::Cancel {
                id: "alarm_5_mon".to_string()
            },
        ]
    );
    assert_eq!(
        gateway.registered_ids(),
        vec!["timer_notification".to_string()]
    );
}

#[test]
fn gateway_failures_are_swallowed() {
    let gateway = RecordingGateway::new();
    gateway.set_failing(true);
    let scheduler = AlarmScheduler::with_zone(&gateway, ManualClock::at(now()), Utc);
    let repeating = alarm(
        "alarm_9",
        AlarmDraft::new(6, 0).with_repeat_days([Weekday::Mon]),
    );

    scheduler.schedule(&repeating);
    scheduler.cancel("alarm_9");

    assert!(gateway.registered_ids().is_empty());
    assert!(scheduler.scheduled_ids().is_empty());
}
