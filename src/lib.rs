pub mod appsettings;
pub mod clock;
pub mod controller;
pub mod notification;
pub mod reminder;
pub mod scheduling;
pub mod store;
pub mod tracker;

pub use controller::{ControllerError, FormController, ModalState, Submission};
pub use reminder::{ActiveDays, Reminder, ReminderDraft, ReminderId, ReminderPatch, ReminderTime};
pub use tracker::MedicineTracker;
