//! Application state for the timesheet API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::task;

use crate::error::{EngineError, EngineResult};
use crate::service::TimesheetService;
use crate::store::SqliteStore;

/// Shared application state.
///
/// Wraps the timesheet service, which owns the database connection and
/// the calculation settings.
#[derive(Clone)]
pub struct AppState {
    service: Arc<TimesheetService<SqliteStore>>,
}

impl AppState {
    /// Creates a new application state around the given service.
    pub fn new(service: TimesheetService<SqliteStore>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Returns a reference to the timesheet service.
    pub fn service(&self) -> &TimesheetService<SqliteStore> {
        &self.service
    }

    /// Runs a service call on the blocking thread pool.
    ///
    /// Store calls hold the connection mutex and do synchronous SQLite I/O,
    /// so they must not run on an async worker thread.
    pub async fn run<T, F>(&self, call: F) -> EngineResult<T>
    where
        F: FnOnce(&TimesheetService<SqliteStore>) -> EngineResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        task::spawn_blocking(move || call(&service))
            .await
            .map_err(|e| EngineError::Storage {
                message: format!("blocking task failed: {}", e),
            })?
    }
}
