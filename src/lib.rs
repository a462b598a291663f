//! Timesheet engine: shift logging and earnings estimation.
//!
//! Users register companies, set hourly rates per weekday and shift type,
//! and log shifts. Each shift is converted from local wall-clock time to
//! absolute instants, classified as day or night, and its duration and
//! earnings are computed and stored. Weekly reports aggregate the stored
//! values.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
