use async_trait::async_trait;

use crate::reminder::Reminder;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NotificationKind {
    Created,
    Updated,
    Taken,
    Deleted,
    Due,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ToastStyle {
    pub border_color: &'static str,
    pub text_color: &'static str,
}

impl ToastStyle {
    pub const DEFAULT: ToastStyle = ToastStyle {
        border_color: "rgba(255,255,255,0.15)",
        text_color: "rgba(255,255,255,0.9)",
    };
    pub const SUCCESS: ToastStyle = ToastStyle {
        border_color: "rgba(125,255,212,0.3)",
        text_color: "#7dffd4",
    };
    pub const DANGER: ToastStyle = ToastStyle {
        border_color: "rgba(255,138,125,0.3)",
        text_color: "#ff8a7d",
    };
    pub const ALERT: ToastStyle = ToastStyle {
        border_color: "rgba(255,217,125,0.4)",
        text_color: "#fff",
    };
}

impl Default for ToastStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub style: ToastStyle,
}

impl Notification {
    pub fn for_reminder(reminder: &Reminder, kind: NotificationKind) -> Self {
        Self {
            kind,
            message: get_message_text(reminder, kind),
            style: get_style(kind),
        }
    }
}

/// Renders transient status messages somewhere visible. Delivery is fire-and-forget.
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    async fn notify(&self, notification: Notification);
}

pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Due => log::warn!("[{:?}] {}", notification.kind, notification.message),
            _ => log::info!("[{:?}] {}", notification.kind, notification.message),
        }
    }
}

fn get_message_text(reminder: &Reminder, kind: NotificationKind) -> String {
    match kind {
        NotificationKind::Created => {
            format!("{} added! Reminder at {}.", reminder.name, reminder.time)
        }
        NotificationKind::Updated => format!("{} updated!", reminder.name),
        NotificationKind::Taken => format!("{} marked as taken!", reminder.name),
        NotificationKind::Deleted => format!("{} removed.", reminder.name),
        NotificationKind::Due => format!("Time to take {}! ({})", reminder.name, reminder.dose),
    }
}

fn get_style(kind: NotificationKind) -> ToastStyle {
    match kind {
        NotificationKind::Created => ToastStyle::DEFAULT,
        NotificationKind::Updated | NotificationKind::Taken => ToastStyle::SUCCESS,
        NotificationKind::Deleted => ToastStyle::DANGER,
        NotificationKind::Due => ToastStyle::ALERT,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::{ActiveDays, ReminderTime};

    fn waran() -> Reminder {
        Reminder {
            id: 1,
            name: "Waran".to_owned(),
            dose: "5mg".to_owned(),
            time: ReminderTime::from_raw("08:00"),
            days: ActiveDays::all(),
            taken_at: None,
        }
    }

    #[test]
    fn messages_name_the_reminder() {
        let reminder = waran();

        let created = Notification::for_reminder(&reminder, NotificationKind::Created);
        assert_eq!(created.message, "Waran added! Reminder at 08:00.");
        assert_eq!(created.style, ToastStyle::DEFAULT);

        let due = Notification::for_reminder(&reminder, NotificationKind::Due);
        assert_eq!(due.message, "Time to take Waran! (5mg)");
        assert_eq!(due.style, ToastStyle::ALERT);

        let deleted = Notification::for_reminder(&reminder, NotificationKind::Deleted);
        assert_eq!(deleted.style.text_color, "#ff8a7d");
    }
}
