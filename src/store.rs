use crate::reminder::{
    Reminder, ReminderDraft, ReminderId, ReminderPatch, ReminderTime, ValidationError,
};

/// Authoritative list of reminders, kept in insertion order.
#[derive(Debug)]
pub struct ReminderStore {
    next_id: ReminderId,
    reminders: Vec<Reminder>,
}

impl Default for ReminderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            reminders: Vec::new(),
        }
    }

    pub fn add(&mut self, draft: ReminderDraft) -> Result<Reminder, ValidationError> {
        draft.validate()?;

        let id = self.next_id;
        self.next_id += 1;

        let ReminderDraft {
            name,
            dose,
            time,
            days,
        } = draft;

        let reminder = Reminder {
            id,
            name,
            dose,
            time,
            days,
            taken_at: None,
        };

        log::info!("Adding reminder {id} at {}", reminder.time);
        self.reminders.push(reminder.clone());
        Ok(reminder)
    }

    /// Applies `patch` to the reminder with `id`. Returns `Ok(None)` when there is no such reminder.
    pub fn update(
        &mut self,
        id: ReminderId,
        patch: ReminderPatch,
    ) -> Result<Option<Reminder>, ValidationError> {
        patch.validate()?;

        let Some(reminder) = self.get_mut(id) else {
            log::debug!("Update of missing reminder {id} ignored");
            return Ok(None);
        };

        patch.apply(reminder);
        log::info!("Updated reminder {id}");
        Ok(Some(reminder.clone()))
    }

    /// Flips the taken state, stamping `now` when the reminder becomes taken.
    pub fn toggle_taken(&mut self, id: ReminderId, now: ReminderTime) -> Option<Reminder> {
        let Some(reminder) = self.get_mut(id) else {
            log::debug!("Toggle of missing reminder {id} ignored");
            return None;
        };

        reminder.taken_at = match reminder.taken_at {
            Some(_) => None,
            None => Some(now),
        };

        log::info!(
            "Reminder {id} is now {}",
            if reminder.is_taken() { "taken" } else { "pending" }
        );
        Some(reminder.clone())
    }

    pub fn remove(&mut self, id: ReminderId) -> Option<Reminder> {
        let Some(index) = self.reminders.iter().position(|r| r.id == id) else {
            log::debug!("Removal of missing reminder {id} ignored");
            return None;
        };

        log::info!("Removing reminder {id}");
        Some(self.reminders.remove(index))
    }

    pub fn get(&self, id: ReminderId) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reminder> {
        self.reminders.iter()
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    pub fn taken_count(&self) -> usize {
        self.reminders.iter().filter(|r| r.is_taken()).count()
    }

    pub fn remaining_count(&self) -> usize {
        self.reminders.iter().filter(|r| !r.is_taken()).count()
    }

    pub fn summary(&self) -> DaySummary {
        DaySummary {
            taken: self.taken_count(),
            remaining: self.remaining_count(),
            total: self.len(),
        }
    }

    pub fn today(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Tomorrow shows the same reminders without any taken state.
    pub fn tomorrow(&self) -> impl Iterator<Item = TomorrowEntry<'_>> {
        self.reminders.iter().map(|r| TomorrowEntry {
            name: &r.name,
            dose: &r.dose,
            time: &r.time,
        })
    }

    fn get_mut(&mut self, id: ReminderId) -> Option<&mut Reminder> {
        self.reminders.iter_mut().find(|r| r.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySummary {
    pub taken: usize,
    pub remaining: usize,
    pub total: usize,
}

impl DaySummary {
    pub fn headline(&self) -> String {
        if self.remaining == 0 {
            "all done!".to_owned()
        } else {
            format!("{} left", self.remaining)
        }
    }

    pub fn details(&self) -> Option<String> {
        (self.total > 0).then(|| {
            format!(
                "{} of {} medicines taken today",
                self.taken, self.total
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TomorrowEntry<'a> {
    pub name: &'a str,
    pub dose: &'a str,
    pub time: &'a ReminderTime,
}
