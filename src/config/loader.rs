//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from a YAML file and resolving it into validated settings.

use std::fs;
use std::path::Path;

use crate::calculation::{NightWindow, ZoneClock, parse_time_of_day};
use crate::error::{EngineError, EngineResult};

use super::types::AppConfig;

/// Calculation settings resolved from [`AppConfig`].
///
/// Holds parsed values, so building one proves the zone and night window
/// in the file are usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationSettings {
    /// Zone that shift times are entered in.
    pub clock: ZoneClock,
    /// Local night window.
    pub night_window: NightWindow,
    /// Break applied when a submission omits one.
    pub default_break_minutes: u32,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            clock: ZoneClock::utc(),
            night_window: NightWindow::default(),
            default_break_minutes: 0,
        }
    }
}

/// Loads and provides access to the service configuration.
///
/// # Example
///
/// ```no_run
/// use timesheet_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/timesheet.yaml")?;
/// println!("Listening on {}", loader.config().server.bind_address);
/// println!("Timezone: {}", loader.calculation().clock.name());
/// # Ok::<(), timesheet_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
    calculation: CalculationSettings,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing or unreadable
    /// - The file contains invalid YAML
    /// - The timezone or night window cannot be parsed
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml(&path_str, &content)
    }

    /// Parses configuration from YAML text. `origin` names the source in errors.
    pub fn from_yaml(origin: &str, content: &str) -> EngineResult<Self> {
        // An empty document deserializes to null rather than a mapping
        let config: AppConfig = if content.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?
        };

        Self::from_config(origin, config)
    }

    /// Validates an already-built configuration.
    pub fn from_config(origin: &str, config: AppConfig) -> EngineResult<Self> {
        let calculation = Self::resolve_calculation(&config).map_err(|e| {
            EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            config,
            calculation,
        })
    }

    fn resolve_calculation(config: &AppConfig) -> EngineResult<CalculationSettings> {
        let calc = &config.calculation;
        let clock = ZoneClock::new(&calc.timezone)?;
        let night_window = NightWindow {
            start: parse_time_of_day("night_window.start", &calc.night_window.start)?,
            end: parse_time_of_day("night_window.end", &calc.night_window.end)?,
        };
        if night_window.start == night_window.end {
            return Err(EngineError::invalid(
                "night_window",
                "start and end must differ",
            ));
        }

        Ok(CalculationSettings {
            clock,
            night_window,
            default_break_minutes: calc.default_break_minutes,
        })
    }

    /// Returns the raw configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the resolved calculation settings.
    pub fn calculation(&self) -> CalculationSettings {
        self.calculation
    }

    /// Overrides the listen address.
    pub fn with_bind_address(mut self, bind_address: impl Into<String>) -> Self {
        self.config.server.bind_address = bind_address.into();
        self
    }

    /// Overrides the database path.
    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.config.database.path = path.into();
        self
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            calculation: CalculationSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn config_path() -> &'static str {
        "./config/timesheet.yaml"
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.config().server.bind_address, "127.0.0.1:3000");
        assert_eq!(loader.config().database.path, "timesheet.sqlite");
        assert_eq!(loader.calculation().clock.name(), "Australia/Adelaide");
        assert_eq!(loader.calculation().night_window, NightWindow::default());
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/timesheet.yaml");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("timesheet.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let loader = ConfigLoader::from_yaml("inline", "").unwrap();
        assert_eq!(loader.config(), &AppConfig::default());
        assert_eq!(loader.calculation(), CalculationSettings::default());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let yaml = "calculation:\n  timezone: Europe/Berlin\n  default_break_minutes: 30\n";
        let loader = ConfigLoader::from_yaml("inline", yaml).unwrap();

        let calc = loader.calculation();
        assert_eq!(calc.clock.name(), "Europe/Berlin");
        assert_eq!(calc.default_break_minutes, 30);
        assert_eq!(calc.night_window.start, hm(22, 0));
        assert_eq!(loader.config().server.bind_address, "127.0.0.1:3000");
    }

    #[test]
    fn test_custom_night_window() {
        let yaml = "calculation:\n  night_window:\n    start: \"23:30\"\n    end: \"07:00\"\n";
        let loader = ConfigLoader::from_yaml("inline", yaml).unwrap();

        assert_eq!(loader.calculation().night_window.start, hm(23, 30));
        assert_eq!(loader.calculation().night_window.end, hm(7, 0));
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let yaml = "calculation:\n  timezone: Atlantis/Lost_City\n";
        let err = ConfigLoader::from_yaml("inline", yaml).unwrap_err();

        match err {
            EngineError::ConfigParseError { path, message } => {
                assert_eq!(path, "inline");
                assert!(message.contains("Atlantis/Lost_City"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_night_window_rejected() {
        let yaml = "calculation:\n  night_window:\n    start: \"10pm\"\n";
        let err = ConfigLoader::from_yaml("inline", yaml).unwrap_err();
        assert!(matches!(err, EngineError::ConfigParseError { .. }));
    }

    #[test]
    fn test_empty_night_window_rejected() {
        let yaml = "calculation:\n  night_window:\n    start: \"06:00\"\n    end: \"06:00\"\n";
        let err = ConfigLoader::from_yaml("inline", yaml).unwrap_err();
        assert!(matches!(err, EngineError::ConfigParseError { .. }));
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        let err = ConfigLoader::from_yaml("inline", "server: [unclosed").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParseError { .. }));
    }

    #[test]
    fn test_cli_overrides() {
        let loader = ConfigLoader::default()
            .with_bind_address("0.0.0.0:8080")
            .with_database_path(":memory:");

        assert_eq!(loader.config().server.bind_address, "0.0.0.0:8080");
        assert_eq!(loader.config().database.path, ":memory:");
    }
}
