use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    clock::Clock,
    notification::{Notification, NotificationKind, NotificationSink},
    reminder::{Reminder, ReminderId},
};

pub struct ScheduleRequest {
    pub reminder: Reminder,
}

impl ScheduleRequest {
    pub fn new(reminder: Reminder) -> Self {
        Self { reminder }
    }
}

/// Handle to a pending one-shot notification.
pub struct ScheduledNotification {
    id: ReminderId,
    task_handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl ScheduledNotification {
    pub fn id(&self) -> ReminderId {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.task_handle.is_finished()
    }

    pub async fn cancel(self) {
        self.cancellation_token.cancel();
        if let Err(e) = self.task_handle.await {
            log::warn!("Notification task for reminder {} failed: {e}", self.id);
        }
    }
}

#[async_trait]
pub trait ReminderScheduler: Send + Sync + 'static {
    /// Arms a notification for later today. `None` when the time has passed or cannot be read.
    fn schedule_reminder(&self, schedule_request: ScheduleRequest)
    -> Option<ScheduledNotification>;

    async fn cancel_reminder(&self, scheduled: ScheduledNotification);
}

pub struct TokioReminderScheduler {
    delivery: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl TokioReminderScheduler {
    pub fn new(delivery: Arc<dyn NotificationSink>, clock: Arc<dyn Clock>) -> Self {
        Self { delivery, clock }
    }
}

#[async_trait]
impl ReminderScheduler for TokioReminderScheduler {
    fn schedule_reminder(
        &self,
        schedule_request: ScheduleRequest,
    ) -> Option<ScheduledNotification> {
        let reminder = schedule_request.reminder;
        let id = reminder.id;

        let Some(fire_at) = reminder.time.time() else {
            log::warn!(
                "Reminder {id} has unreadable time {:?}, not scheduling",
                reminder.time.as_str()
            );
            return None;
        };

        let Some(delay) = get_target_delay(&fire_at, self.clock.now())
            .and_then(|delay| delay.to_std().ok())
        else {
            log::info!("Reminder {id} at {fire_at} has already passed today, not scheduling");
            return None;
        };

        log::info!("[SCHEDULE] Sleeping for {:?} delay. ReminderId {}", delay, id);

        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();
        let delivery = Arc::clone(&self.delivery);

        let task_handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_cancellation_token.cancelled() => {
                    log::info!("Notification for reminder {} was cancelled", reminder.id);
                }
                _ = tokio::time::sleep(delay) => {
                    delivery
                        .notify(Notification::for_reminder(&reminder, NotificationKind::Due))
                        .await;
                }
            }
        });

        Some(ScheduledNotification {
            id,
            task_handle,
            cancellation_token,
        })
    }

    async fn cancel_reminder(&self, scheduled: ScheduledNotification) {
        log::info!("Cancelling notification for reminder {}", scheduled.id());
        scheduled.cancel().await;
    }
}

/// Delay from `now` until `fire_at` on the same date, if that lies strictly within the next day.
pub fn get_target_delay(fire_at: &NaiveTime, now: NaiveDateTime) -> Option<chrono::Duration> {
    let max_delta = TimeDelta::days(1);
    let target_datetime = now.date().and_time(*fire_at);
    let delta = target_datetime - now;

    (delta > TimeDelta::zero() && delta < max_delta).then_some(delta)
}

#[cfg(test)]
mod tests;
