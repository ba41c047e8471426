//! Configuration management.

mod settings;

pub use settings::{
    AccountSettings, AppConfig, AppSettings, DataSettings, LoggingConfig, ScheduleSettings,
    UniverseSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables prefixed `ROTATION__` override the file, with `__`
/// separating nested keys (`ROTATION__STRATEGY__TOP_K=4`).
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("ROTATION")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("universe.instruments"),
        )
        .build()?;

    config.try_deserialize()
}
