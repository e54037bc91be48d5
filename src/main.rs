use std::sync::Arc;

use pillbox::{MedicineTracker, appsettings::AppSettings, notification::LogNotificationSink};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::new()?;
    log::info!("Starting with default reminder time {}", settings.form.default_time);

    let mut tracker =
        MedicineTracker::with_local_clock(settings.form.default_time, Arc::new(LogNotificationSink));

    for draft in settings.seed {
        let name = draft.name.clone();
        if let Err(e) = tracker.add_reminder(draft).await {
            log::warn!("Skipping seed reminder {name:?}: {e}");
        }
    }

    log::info!("{}", tracker.day_header());
    for reminder in tracker.store().today() {
        match &reminder.taken_at {
            Some(taken_at) => log::info!("Today: {} {} (taken {taken_at})", reminder.name, reminder.dose),
            None => log::info!("Today: {} {} at {}", reminder.name, reminder.dose, reminder.time),
        }
    }
    for entry in tracker.store().tomorrow() {
        log::info!("Tomorrow: {} {} at {}", entry.name, entry.dose, entry.time);
    }

    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down");
    Ok(())
}
