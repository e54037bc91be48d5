use std::sync::Mutex;

use chrono::{Local, NaiveDateTime};

use crate::reminder::ReminderTime;

pub trait Clock: Send + Sync + 'static {
    /// Current wall-clock time on the device, without timezone.
    fn now(&self) -> NaiveDateTime;

    fn time_of_day(&self) -> ReminderTime {
        ReminderTime::new(self.now().time())
    }
}

pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that only moves when told to.
pub struct ManualClock(Mutex<NaiveDateTime>);

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.0.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}
