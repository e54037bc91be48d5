use chrono::Weekday;
use thiserror::Error;

use crate::reminder::{
    Reminder, ReminderDraft, ReminderId, ReminderPatch, ReminderTime, ValidationError,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Another overlay is already open: {0:?}")]
    AlreadyOpen(ModalKind),

    #[error("No reminder form is open")]
    NoOpenForm,

    #[error("No deletion is awaiting confirmation")]
    NothingToDelete,

    #[error("Reminder {0} does not exist")]
    ReminderNotFound(ReminderId),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Add,
    Edit,
    ConfirmDelete,
}

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Add(ReminderDraft),
    Edit {
        id: ReminderId,
        draft: ReminderDraft,
    },
    ConfirmDelete(ReminderId),
}

impl ModalState {
    pub fn kind(&self) -> Option<ModalKind> {
        match self {
            ModalState::Closed => None,
            ModalState::Add(_) => Some(ModalKind::Add),
            ModalState::Edit { .. } => Some(ModalKind::Edit),
            ModalState::ConfirmDelete(_) => Some(ModalKind::ConfirmDelete),
        }
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(ReminderDraft),
    Update(ReminderId, ReminderPatch),
}

/// Tracks which overlay is open and the draft being edited in it.
///
/// Never touches reminders itself. Saves and deletions are handed back to the caller as
/// [`Submission`]s and ids.
#[derive(Debug)]
pub struct FormController {
    state: ModalState,
    default_time: ReminderTime,
    form_error: Option<ValidationError>,
}

impl FormController {
    pub fn new(default_time: ReminderTime) -> Self {
        Self {
            state: ModalState::Closed,
            default_time,
            form_error: None,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn draft(&self) -> Option<&ReminderDraft> {
        match &self.state {
            ModalState::Add(draft) | ModalState::Edit { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub fn pending_delete(&self) -> Option<ReminderId> {
        match self.state {
            ModalState::ConfirmDelete(id) => Some(id),
            _ => None,
        }
    }

    /// Error from the last rejected save, cleared by any draft edit.
    pub fn form_error(&self) -> Option<ValidationError> {
        self.form_error
    }

    pub fn open_add(&mut self) -> Result<(), ControllerError> {
        self.ensure_closed()?;
        self.open(ModalState::Add(ReminderDraft::empty(
            self.default_time.clone(),
        )));
        Ok(())
    }

    /// Opens the edit form for `reminder`, or fails without a transition when it is gone.
    pub fn open_edit(
        &mut self,
        id: ReminderId,
        reminder: Option<&Reminder>,
    ) -> Result<(), ControllerError> {
        self.ensure_closed()?;
        let reminder = reminder.ok_or(ControllerError::ReminderNotFound(id))?;
        self.open(ModalState::Edit {
            id,
            draft: reminder.into(),
        });
        Ok(())
    }

    pub fn request_delete(&mut self, id: ReminderId) -> Result<(), ControllerError> {
        self.ensure_closed()?;
        self.open(ModalState::ConfirmDelete(id));
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ControllerError> {
        self.draft_mut()?.name = name.into();
        Ok(())
    }

    pub fn set_dose(&mut self, dose: impl Into<String>) -> Result<(), ControllerError> {
        self.draft_mut()?.dose = dose.into();
        Ok(())
    }

    pub fn set_time(&mut self, time: ReminderTime) -> Result<(), ControllerError> {
        self.draft_mut()?.time = time;
        Ok(())
    }

    pub fn toggle_day(&mut self, day: Weekday) -> Result<(), ControllerError> {
        self.draft_mut()?.days.toggle(day);
        Ok(())
    }

    /// Validates the open draft and closes the form. A rejected draft keeps the form open.
    pub fn submit(&mut self) -> Result<Submission, ControllerError> {
        let validation = self.draft().ok_or(ControllerError::NoOpenForm)?.validate();

        if let Err(e) = validation {
            log::warn!("Rejected reminder form: {e}");
            self.form_error = Some(e);
            return Err(e.into());
        }

        let submission = match std::mem::take(&mut self.state) {
            ModalState::Add(draft) => Submission::Create(draft),
            ModalState::Edit { id, draft } => Submission::Update(id, draft.into()),
            other => {
                self.state = other;
                return Err(ControllerError::NoOpenForm);
            }
        };

        self.form_error = None;
        log::info!("Form submitted, closing");
        Ok(submission)
    }

    pub fn confirm_delete(&mut self) -> Result<ReminderId, ControllerError> {
        let id = self
            .pending_delete()
            .ok_or(ControllerError::NothingToDelete)?;
        self.state = ModalState::Closed;
        Ok(id)
    }

    /// Discards whatever is open.
    pub fn cancel(&mut self) {
        if let Some(kind) = self.state.kind() {
            log::info!("Cancelled {kind:?}");
        }
        self.state = ModalState::Closed;
        self.form_error = None;
    }

    /// A click outside the modal content cancels it.
    pub fn backdrop_click(&mut self) {
        self.cancel();
    }

    fn ensure_closed(&self) -> Result<(), ControllerError> {
        match self.state.kind() {
            Some(kind) => Err(ControllerError::AlreadyOpen(kind)),
            None => Ok(()),
        }
    }

    fn open(&mut self, state: ModalState) {
        log::info!("Opening {:?}", state.kind());
        self.state = state;
        self.form_error = None;
    }

    fn draft_mut(&mut self) -> Result<&mut ReminderDraft, ControllerError> {
        self.form_error = None;
        match &mut self.state {
            ModalState::Add(draft) | ModalState::Edit { draft, .. } => Ok(draft),
            _ => Err(ControllerError::NoOpenForm),
        }
    }
}
