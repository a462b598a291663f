//! Configuration loading and management for the timesheet service.
//!
//! This module loads the service configuration from a YAML file: the
//! listen address, the SQLite database path and the calculation settings
//! (timezone, night window and default break).
//!
//! # Example
//!
//! ```no_run
//! use timesheet_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/timesheet.yaml").unwrap();
//! println!("Database: {}", config.config().database.path);
//! ```

mod loader;
mod types;

pub use loader::{CalculationSettings, ConfigLoader};
pub use types::{AppConfig, CalculationConfig, DatabaseConfig, NightWindowConfig, ServerConfig};
