//! Where the gateway reads the user's calendar selection from.

use std::path::PathBuf;

use calgate_core::{Config, ConfigError};

use crate::error::CalendarError;

/// Supplies the calendar names to query.
pub trait ConfigStore {
    /// Configured calendar names, possibly including `"primary"`
    fn load_calendar_names(&self) -> Result<Vec<String>, CalendarError>;
}

/// Reads `calendar.my_calendars` from a TOML file on every call, so edits
/// take effect without a restart.
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    path: PathBuf,
}

impl TomlConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store over the default `config.toml` location
    pub fn default_location() -> Result<Self, CalendarError> {
        let path = Config::config_path().map_err(|e| ConfigError::NotFound(format!("{:#}", e)))?;
        Ok(Self::new(path))
    }
}

impl ConfigStore for TomlConfigStore {
    fn load_calendar_names(&self) -> Result<Vec<String>, CalendarError> {
        let config = Config::load_from(&self.path)
            .map_err(|e| ConfigError::ParseError(format!("{:#}", e)))?;
        Ok(config.calendar.my_calendars)
    }
}

impl ConfigStore for Config {
    fn load_calendar_names(&self) -> Result<Vec<String>, CalendarError> {
        Ok(self.calendar.my_calendars.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn test_toml_store_reads_calendars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
config_dir = "/tmp/calgate"

[calendar]
my_calendars = ["primary", "Birthdays"]
"#,
        )
        .unwrap();

        let store = TomlConfigStore::new(&path);

        assert_eq!(
            store.load_calendar_names().unwrap(),
            vec!["primary".to_string(), "Birthdays".to_string()]
        );
    }

    #[test]
    fn test_toml_store_sees_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = TomlConfigStore::new(&path);

        // Missing file is created with defaults
        assert_eq!(store.load_calendar_names().unwrap(), vec!["primary".to_string()]);

        let mut config = Config::load_from(&path).unwrap();
        config.calendar.my_calendars = vec!["Work".to_string()];
        config.save_to(&path).unwrap();

        assert_eq!(store.load_calendar_names().unwrap(), vec!["Work".to_string()]);
    }

    #[test]
    fn test_toml_store_malformed_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[calendar\nmy_calendars = 3").unwrap();

        let result = TomlConfigStore::new(&path).load_calendar_names();

        assert!(matches!(
            result,
            Err(CalendarError::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_loaded_config_is_a_store() {
        let mut config = Config::default();
        config.calendar.my_calendars = vec!["Holidays".to_string()];

        assert_eq!(config.load_calendar_names().unwrap(), vec!["Holidays".to_string()]);
    }
}
