//! Core data types shared across the report pipeline

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Binary store status as reported by a health-check poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Active,
    Inactive,
}

impl StoreStatus {
    pub fn is_active(self) -> bool {
        matches!(self, StoreStatus::Active)
    }
}

impl FromStr for StoreStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("active") {
            Ok(StoreStatus::Active)
        } else if s.eq_ignore_ascii_case("inactive") {
            Ok(StoreStatus::Inactive)
        } else {
            Err(())
        }
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreStatus::Active => write!(f, "active"),
            StoreStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// A single health-check observation for a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StorePoll {
    pub store_id: String,
    pub timestamp_utc: DateTime<Utc>,
    pub status: StoreStatus,
}

/// One raw business-hours row as it arrives from the source.
///
/// Time-of-day strings stay unparsed here; the Business Hours Index parses
/// them tolerantly and skips bad rows one at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessHoursRow {
    pub store_id: String,
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: u8,
    pub start_local: String,
    pub end_local: String,
}

/// One raw store-timezone row.
#[derive(Debug, Clone, PartialEq)]
pub struct TimezoneRow {
    pub store_id: String,
    pub timezone: String,
}

/// Trailing evaluation period ending at the anchor instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    LastHour,
    LastDay,
    LastWeek,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::LastHour, Period::LastDay, Period::LastWeek];

    pub fn duration(self) -> Duration {
        match self {
            Period::LastHour => Duration::hours(1),
            Period::LastDay => Duration::hours(24),
            Period::LastWeek => Duration::days(7),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::LastHour => "last_hour",
            Period::LastDay => "last_day",
            Period::LastWeek => "last_week",
        }
    }
}

/// One output row of the report artifact.
///
/// Field order and serde renames define the CSV column layout:
/// last_hour values are minutes, last_day/last_week values are hours,
/// all rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub store_id: String,
    #[serde(rename = "uptime_last_hour(mins)")]
    pub uptime_last_hour: f64,
    #[serde(rename = "downtime_last_hour(mins)")]
    pub downtime_last_hour: f64,
    #[serde(rename = "uptime_last_day(hours)")]
    pub uptime_last_day: f64,
    #[serde(rename = "downtime_last_day(hours)")]
    pub downtime_last_day: f64,
    #[serde(rename = "uptime_last_week(hours)")]
    pub uptime_last_week: f64,
    #[serde(rename = "downtime_last_week(hours)")]
    pub downtime_last_week: f64,
}
