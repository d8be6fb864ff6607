//! Error types for report runs and snapshot loading

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The poll snapshot is empty, so there is no anchor instant to report
    /// against. Fatal for the whole run.
    #[error("no status data available")]
    NoPollData,

    /// The business-hours source is present but none of the accepted
    /// day-of-week column spellings appear in its header.
    #[error("business hours source missing day-of-week column (accepted: {0})")]
    MissingWeekdayColumn(&'static str),

    /// A source file is present but lacks a column the engine cannot work
    /// without.
    #[error("{source_name} source missing required column '{column}'")]
    MissingColumn {
        source_name: &'static str,
        column: &'static str,
    },

    #[error("report run cancelled")]
    Cancelled,

    #[error("worker task failed: {0}")]
    Worker(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
