use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::reminder::{ReminderDraft, ReminderTime};

#[derive(Deserialize, Debug)]
pub struct FormSettings {
    pub default_time: ReminderTime,
}

#[derive(Deserialize, Debug)]
pub struct AppSettings {
    pub form: FormSettings,
    #[serde(default)]
    pub seed: Vec<ReminderDraft>,
}

impl AppSettings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("form.default_time", "08:00")?
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
