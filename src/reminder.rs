use std::fmt;

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ReminderId = u64;

pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Reminder name must not be empty")]
    EmptyName,
}

/// Time of day in the `HH:MM` form the reminder form produces.
///
/// The text is kept as entered. Parsing happens on demand, so a malformed value
/// only surfaces as a missing [`NaiveTime`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderTime(String);

impl ReminderTime {
    pub fn new(inner: NaiveTime) -> Self {
        let normalized_time = inner
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .expect("Will never fail.");
        Self(normalized_time.format(TIME_FORMAT).to_string())
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.0, TIME_FORMAT).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NaiveTime> for ReminderTime {
    fn from(value: NaiveTime) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    WEEK.get(index as usize).copied()
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Weekday index {0} is out of range 0..=6")]
pub struct InvalidWeekday(pub u8);

/// Set of weekdays a reminder is active on, Monday first.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct ActiveDays(u8);

impl ActiveDays {
    const MASK: u8 = 0b0111_1111;

    pub fn all() -> Self {
        Self(Self::MASK)
    }

    pub fn none() -> Self {
        Self(0)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn remove(&mut self, day: Weekday) {
        self.0 &= !Self::bit(day);
    }

    pub fn toggle(&mut self, day: Weekday) {
        self.0 ^= Self::bit(day);
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(move |day| self.contains(*day))
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }
}

impl Default for ActiveDays {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Debug for ActiveDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Weekday> for ActiveDays {
    fn from_iter<T: IntoIterator<Item = Weekday>>(iter: T) -> Self {
        let mut days = Self::none();
        for day in iter {
            days.insert(day);
        }
        days
    }
}

impl TryFrom<Vec<u8>> for ActiveDays {
    type Error = InvalidWeekday;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        value
            .into_iter()
            .map(|index| weekday_from_index(index).ok_or(InvalidWeekday(index)))
            .collect()
    }
}

impl From<ActiveDays> for Vec<u8> {
    fn from(value: ActiveDays) -> Self {
        value
            .iter()
            .map(|day| day.num_days_from_monday() as u8)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub name: String,
    pub dose: String,
    pub time: ReminderTime,
    pub days: ActiveDays,
    pub taken_at: Option<ReminderTime>,
}

impl Reminder {
    pub fn is_taken(&self) -> bool {
        self.taken_at.is_some()
    }
}

/// Editable fields of a reminder while a form is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dose: String,
    pub time: ReminderTime,
    #[serde(default)]
    pub days: ActiveDays,
}

impl ReminderDraft {
    pub fn empty(default_time: ReminderTime) -> Self {
        Self {
            name: String::new(),
            dose: String::new(),
            time: default_time,
            days: ActiveDays::all(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

impl Default for ReminderDraft {
    fn default() -> Self {
        Self::empty(ReminderTime::from_raw("08:00"))
    }
}

impl From<&Reminder> for ReminderDraft {
    fn from(value: &Reminder) -> Self {
        Self {
            name: value.name.clone(),
            dose: value.dose.clone(),
            time: value.time.clone(),
            days: value.days,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderPatch {
    pub name: Option<String>,
    pub dose: Option<String>,
    pub time: Option<ReminderTime>,
    pub days: Option<ActiveDays>,
}

impl ReminderPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }

    pub(crate) fn apply(self, reminder: &mut Reminder) {
        reminder.name = self.name.unwrap_or(std::mem::take(&mut reminder.name));
        reminder.dose = self.dose.unwrap_or(std::mem::take(&mut reminder.dose));
        if let Some(time) = self.time {
            reminder.time = time;
        }
        reminder.days = self.days.unwrap_or(reminder.days);
    }
}

impl From<ReminderDraft> for ReminderPatch {
    fn from(value: ReminderDraft) -> Self {
        Self {
            name: Some(value.name),
            dose: Some(value.dose),
            time: Some(value.time),
            days: Some(value.days),
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(())
    }
}
