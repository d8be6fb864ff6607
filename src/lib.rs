//! StorePulse library - store uptime/downtime reporting
//!
//! This module exports internal components for integration testing.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod hours;
pub mod model;
pub mod report;
pub mod snapshot;
pub mod timeline;
pub mod timezone;
pub mod windows;
