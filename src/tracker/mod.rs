use std::{collections::HashMap, fmt, sync::Arc};

use chrono::NaiveDate;

use crate::{
    clock::{Clock, LocalClock},
    controller::{ControllerError, FormController, Submission},
    notification::{Notification, NotificationKind, NotificationSink},
    reminder::{Reminder, ReminderDraft, ReminderId, ReminderPatch, ReminderTime, ValidationError},
    scheduling::{ReminderScheduler, ScheduleRequest, ScheduledNotification, TokioReminderScheduler},
    store::{DaySummary, ReminderStore},
};

/// The reminder page: the store, the open form and the pending notifications behind it.
///
/// All methods run on one task, one UI event at a time.
pub struct MedicineTracker {
    store: ReminderStore,
    form: FormController,
    scheduler: Arc<dyn ReminderScheduler>,
    delivery: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    scheduled: HashMap<ReminderId, ScheduledNotification>,
}

impl MedicineTracker {
    pub fn new(
        default_time: ReminderTime,
        scheduler: Arc<dyn ReminderScheduler>,
        delivery: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store: ReminderStore::new(),
            form: FormController::new(default_time),
            scheduler,
            delivery,
            clock,
            scheduled: HashMap::new(),
        }
    }

    /// Tracker on the device clock, delivering due notifications through tokio timers.
    pub fn with_local_clock(default_time: ReminderTime, delivery: Arc<dyn NotificationSink>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(LocalClock);
        let scheduler = Arc::new(TokioReminderScheduler::new(
            Arc::clone(&delivery),
            Arc::clone(&clock),
        ));
        Self::new(default_time, scheduler, delivery, clock)
    }

    pub fn store(&self) -> &ReminderStore {
        &self.store
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    /// Draft edits go straight to the controller.
    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    pub fn is_scheduled(&self, id: ReminderId) -> bool {
        self.scheduled
            .get(&id)
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn day_header(&self) -> DayHeader {
        DayHeader {
            date: self.clock.now().date(),
            summary: self.store.summary(),
        }
    }

    pub async fn add_reminder(&mut self, draft: ReminderDraft) -> Result<Reminder, ValidationError> {
        let reminder = self.store.add(draft)?;
        self.schedule(&reminder);
        self.notify(&reminder, NotificationKind::Created).await;
        Ok(reminder)
    }

    pub async fn update_reminder(
        &mut self,
        id: ReminderId,
        patch: ReminderPatch,
    ) -> Result<Option<Reminder>, ValidationError> {
        let Some(reminder) = self.store.update(id, patch)? else {
            return Ok(None);
        };

        self.unschedule(id).await;
        self.schedule(&reminder);
        self.notify(&reminder, NotificationKind::Updated).await;
        Ok(Some(reminder))
    }

    pub async fn toggle_taken(&mut self, id: ReminderId) -> Option<Reminder> {
        let reminder = self.store.toggle_taken(id, self.clock.time_of_day())?;
        if reminder.is_taken() {
            self.notify(&reminder, NotificationKind::Taken).await;
        }
        Some(reminder)
    }

    pub async fn remove_reminder(&mut self, id: ReminderId) -> Option<Reminder> {
        let reminder = self.store.remove(id)?;
        self.unschedule(id).await;
        self.notify(&reminder, NotificationKind::Deleted).await;
        Some(reminder)
    }

    pub fn open_add(&mut self) -> Result<(), ControllerError> {
        self.form.open_add()
    }

    pub fn open_edit(&mut self, id: ReminderId) -> Result<(), ControllerError> {
        self.form.open_edit(id, self.store.get(id))
    }

    pub fn request_delete(&mut self, id: ReminderId) -> Result<(), ControllerError> {
        if self.store.get(id).is_none() {
            return Err(ControllerError::ReminderNotFound(id));
        }
        self.form.request_delete(id)
    }

    /// Saves the open form. `Ok(None)` when the edited reminder disappeared in the meantime.
    pub async fn save(&mut self) -> Result<Option<Reminder>, ControllerError> {
        let saved = match self.form.submit()? {
            Submission::Create(draft) => Some(self.add_reminder(draft).await?),
            Submission::Update(id, patch) => self.update_reminder(id, patch).await?,
        };
        Ok(saved)
    }

    pub async fn confirm_delete(&mut self) -> Result<Option<Reminder>, ControllerError> {
        let id = self.form.confirm_delete()?;
        Ok(self.remove_reminder(id).await)
    }

    pub fn cancel(&mut self) {
        self.form.cancel();
    }

    pub fn backdrop_click(&mut self) {
        self.form.backdrop_click();
    }

    fn schedule(&mut self, reminder: &Reminder) {
        let request = ScheduleRequest::new(reminder.clone());
        if let Some(handle) = self.scheduler.schedule_reminder(request) {
            self.scheduled.retain(|_, existing| !existing.is_finished());
            self.scheduled.insert(reminder.id, handle);
        }
    }

    async fn unschedule(&mut self, id: ReminderId) {
        if let Some(handle) = self.scheduled.remove(&id) {
            self.scheduler.cancel_reminder(handle).await;
        }
    }

    async fn notify(&self, reminder: &Reminder, kind: NotificationKind) {
        self.delivery
            .notify(Notification::for_reminder(reminder, kind))
            .await;
    }
}

/// Date line and progress shown above today's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayHeader {
    pub date: NaiveDate,
    pub summary: DaySummary,
}

impl fmt::Display for DayHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.date.format("%A %-d %B"),
            self.summary.headline()
        )?;
        if let Some(details) = self.summary.details() {
            write!(f, " ({details})")?;
        }
        Ok(())
    }
}
