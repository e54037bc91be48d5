use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use proptest::prelude::*;
use proptest_arbitrary_interop::arb;
use test_strategy::proptest;

use super::*;
use crate::{
    clock::ManualClock,
    notification::test_sink::TestNotificationSink,
    reminder::{ActiveDays, ReminderTime},
};

struct TestContext {
    pub sink: TestNotificationSink,
    pub scheduler: TokioReminderScheduler,
}

impl TestContext {
    fn at(hours: u32, minutes: u32) -> Self {
        let sink = TestNotificationSink::default();
        let clock = ManualClock::new(datetime(hours, minutes));
        let scheduler = TokioReminderScheduler::new(Arc::new(sink.clone()), Arc::new(clock));

        Self { sink, scheduler }
    }
}

fn datetime(hours: u32, minutes: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 31)
        .unwrap()
        .and_time(NaiveTime::from_hms_opt(hours, minutes, 0).unwrap())
}

fn reminder_at(time: &str) -> Reminder {
    Reminder {
        id: 1,
        name: "Waran".to_owned(),
        dose: "5mg".to_owned(),
        time: ReminderTime::from_raw(time),
        days: ActiveDays::all(),
        taken_at: None,
    }
}

fn schedule_request(time: &str) -> ScheduleRequest {
    ScheduleRequest::new(reminder_at(time))
}

async fn wait(duration: Duration) {
    tokio::time::sleep(duration + Duration::from_secs(1)).await;
}

fn tokio_ct(
    future: impl std::future::Future<Output = Result<(), TestCaseError>>,
) -> Result<(), TestCaseError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .unwrap()
        .block_on(future)
}

#[test]
fn when_firing_time_is_yet_to_come_delay_is_the_difference() {
    let fire_at = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

    let delay = get_target_delay(&fire_at, datetime(9, 0));

    assert_eq!(delay, Some(TimeDelta::hours(1)));
}

#[test]
fn when_firing_time_has_passed_there_is_no_delay() {
    let fire_at = NaiveTime::from_hms_opt(8, 0, 0).unwrap();

    assert_eq!(get_target_delay(&fire_at, datetime(9, 0)), None);
}

#[test]
fn firing_time_equal_to_now_is_not_scheduled() {
    let fire_at = NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    assert_eq!(get_target_delay(&fire_at, datetime(9, 0)), None);
}

proptest::proptest! {
    #[test]
    fn target_delay_stays_within_today(
        now in arb::<NaiveDateTime>(),
        fire_at in arb::<NaiveTime>()
    ) {
        let fire_at = fire_at.with_nanosecond(0).unwrap();
        let now = now.with_nanosecond(0).unwrap();

        match get_target_delay(&fire_at, now) {
            Some(delay) => {
                let target = now.date().and_time(fire_at);
                prop_assert!(fire_at > now.time(), "Only later times are scheduled");
                prop_assert!(delay > TimeDelta::zero());
                prop_assert!(delay < TimeDelta::days(1));
                prop_assert_eq!(target - now, delay);
            }
            None => prop_assert!(fire_at <= now.time(), "Later times must be scheduled. fire_at = {:?}, now = {:?}", fire_at, now),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn due_notification_fires_after_delay() {
    let ctx = TestContext::at(9, 0);

    let scheduled = ctx.scheduler.schedule_reminder(schedule_request("10:00"));
    assert!(scheduled.is_some());

    wait(Duration::from_secs(59 * 60)).await;
    assert!(ctx.sink.messages().is_empty());

    wait(Duration::from_secs(60)).await;
    assert_eq!(ctx.sink.messages(), vec!["Time to take Waran! (5mg)"]);
}

#[tokio::test(start_paused = true)]
async fn passed_time_is_not_scheduled() {
    let ctx = TestContext::at(9, 0);

    let scheduled = ctx.scheduler.schedule_reminder(schedule_request("08:00"));

    assert!(scheduled.is_none());
    wait(Duration::from_secs(24 * 60 * 60)).await;
    assert!(ctx.sink.messages().is_empty());
}

#[tokio::test(start_paused = true)]
async fn malformed_time_is_not_scheduled() {
    let ctx = TestContext::at(9, 0);

    assert!(ctx.scheduler.schedule_reminder(schedule_request("10h")).is_none());
    assert!(ctx.scheduler.schedule_reminder(schedule_request("")).is_none());
}

#[proptest(async = tokio_ct)]
async fn scheduling_proptest(#[strategy(0..24u32)] hours: u32, #[strategy(0..60u32)] minutes: u32) {
    let ctx = TestContext::at(12, 30);
    let time = format!("{hours:02}:{minutes:02}");
    let expected_delay = get_target_delay(&NaiveTime::from_hms_opt(hours, minutes, 0).unwrap(), datetime(12, 30));

    let scheduled = ctx.scheduler.schedule_reminder(schedule_request(&time));
    prop_assert_eq!(scheduled.is_some(), expected_delay.is_some());

    wait(Duration::from_secs(24 * 60 * 60)).await;

    let msgs = ctx.sink.received.lock().unwrap();
    prop_assert_eq!(msgs.len(), usize::from(expected_delay.is_some()));
    if let Some(msg) = msgs.first() {
        prop_assert_eq!(msg.kind, NotificationKind::Due);
    }
}

#[proptest(async = tokio_ct)]
async fn stopping_proptest(#[strategy(13..24u32)] hours: u32, #[strategy(0..60u32)] minutes: u32) {
    let ctx = TestContext::at(12, 30);
    let time = format!("{hours:02}:{minutes:02}");

    let scheduled = ctx
        .scheduler
        .schedule_reminder(schedule_request(&time))
        .unwrap();
    ctx.scheduler.cancel_reminder(scheduled).await;

    wait(Duration::from_secs(24 * 60 * 60)).await;

    prop_assert!(ctx.sink.received.lock().unwrap().is_empty());
}
