//! Configuration types for the timesheet service.
//!
//! This module contains the strongly-typed structures deserialized from
//! the YAML configuration file. Every field has a default so that a
//! partial (or empty) file is valid.

use serde::Deserialize;

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// SQLite settings.
    pub database: DatabaseConfig,
    /// Shift calculation settings.
    pub calculation: CalculationConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// SQLite settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path of the database file, created on first start.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "timesheet.sqlite".to_string(),
        }
    }
}

/// Shift calculation settings as written in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    /// IANA zone that shift times are entered in.
    pub timezone: String,
    /// Local night window.
    pub night_window: NightWindowConfig,
    /// Break applied when a submission omits one.
    pub default_break_minutes: u32,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            night_window: NightWindowConfig::default(),
            default_break_minutes: 0,
        }
    }
}

/// Night window bounds as `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NightWindowConfig {
    /// Local time the window opens.
    pub start: String,
    /// Local time the window closes.
    pub end: String,
}

impl Default for NightWindowConfig {
    fn default() -> Self {
        Self {
            start: "22:00".to_string(),
            end: "06:00".to_string(),
        }
    }
}
