//! CSV snapshot loading
//!
//! The ingestion boundary between the raw flat-file sources and the
//! engine's canonical row types. Header spelling tolerances (the weekday
//! alias list, `*_local` vs bare time columns, `timezone_str` vs
//! `timezone`) are resolved here once; the engine itself only ever sees one
//! schema.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{BusinessHoursRow, StorePoll, StoreStatus, TimezoneRow};

/// Accepted spellings for the business-hours weekday column.
pub const WEEKDAY_ALIASES: [&str; 4] = ["dayOfWeek", "day_of_week", "dayOfweek", "day"];

/// Immutable input snapshot for one report run.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub polls: Vec<StorePoll>,
    pub hours: Vec<BusinessHoursRow>,
    pub timezones: Vec<TimezoneRow>,
}

impl Snapshot {
    /// Load the three sources from the configured CSV paths.
    ///
    /// The poll source is required; business hours and timezones may be
    /// absent entirely, in which case every store falls back to 24x7
    /// windows and the default zone.
    pub fn load(config: &Config) -> Result<Self> {
        let polls = read_polls(File::open(&config.polls_path)?)?;

        let hours = if Path::new(&config.business_hours_path).exists() {
            read_business_hours(File::open(&config.business_hours_path)?)?
        } else {
            info!(
                "Business hours file not found at '{}', all stores treated as 24x7",
                config.business_hours_path
            );
            Vec::new()
        };

        let timezones = if Path::new(&config.timezones_path).exists() {
            read_timezones(File::open(&config.timezones_path)?)?
        } else {
            info!(
                "Timezone file not found at '{}', all stores use the default zone",
                config.timezones_path
            );
            Vec::new()
        };

        Ok(Self { polls, hours, timezones })
    }
}

/// Parse a poll timestamp in the dump format
/// `YYYY-MM-DD HH:MM:SS[.frac] UTC` or RFC 3339.
pub fn parse_poll_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let s = s.trim_end_matches(" UTC");
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|n| n.and_utc())
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| names.contains(&h.trim()))
}

/// Read poll rows. Rows with unparseable timestamps or statuses are
/// skipped individually.
pub fn read_polls<R: Read>(reader: R) -> Result<Vec<StorePoll>> {
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?.clone();
    let store_col = find_column(&headers, &["store_id"]).ok_or(Error::MissingColumn {
        source_name: "poll",
        column: "store_id",
    })?;
    let ts_col = find_column(&headers, &["timestamp_utc"]).ok_or(Error::MissingColumn {
        source_name: "poll",
        column: "timestamp_utc",
    })?;
    let status_col = find_column(&headers, &["status"]).ok_or(Error::MissingColumn {
        source_name: "poll",
        column: "status",
    })?;

    let mut polls = Vec::new();
    for record in csv.records() {
        let record = record?;
        let store_id = record.get(store_col).unwrap_or("").trim();
        let raw_ts = record.get(ts_col).unwrap_or("");
        let raw_status = record.get(status_col).unwrap_or("");
        if store_id.is_empty() {
            continue;
        }
        let (Some(timestamp_utc), Ok(status)) =
            (parse_poll_timestamp(raw_ts), raw_status.parse::<StoreStatus>())
        else {
            debug!("Skipping poll row for {}: '{}' / '{}'", store_id, raw_ts, raw_status);
            continue;
        };
        polls.push(StorePoll {
            store_id: store_id.to_string(),
            timestamp_utc,
            status,
        });
    }
    Ok(polls)
}

/// Read business-hours rows.
///
/// Missing the weekday column under every accepted alias is a schema error;
/// missing start/end columns degrade to empty time strings, which the index
/// later skips row by row.
pub fn read_business_hours<R: Read>(reader: R) -> Result<Vec<BusinessHoursRow>> {
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?.clone();
    let store_col = find_column(&headers, &["store_id"]).ok_or(Error::MissingColumn {
        source_name: "business hours",
        column: "store_id",
    })?;
    let day_col = find_column(&headers, &WEEKDAY_ALIASES)
        .ok_or(Error::MissingWeekdayColumn("dayOfWeek, day_of_week, dayOfweek, day"))?;
    let start_col = find_column(&headers, &["start_time_local", "start_time"]);
    let end_col = find_column(&headers, &["end_time_local", "end_time"]);

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        let store_id = record.get(store_col).unwrap_or("").trim();
        if store_id.is_empty() {
            continue;
        }
        let raw_day = record.get(day_col).unwrap_or("").trim();
        let Ok(day_of_week) = raw_day.parse::<u8>() else {
            debug!("Skipping business-hours row for {}: bad weekday '{}'", store_id, raw_day);
            continue;
        };
        let field = |col: Option<usize>| {
            col.and_then(|i| record.get(i)).unwrap_or("").trim().to_string()
        };
        rows.push(BusinessHoursRow {
            store_id: store_id.to_string(),
            day_of_week,
            start_local: field(start_col),
            end_local: field(end_col),
        });
    }
    Ok(rows)
}

/// Read timezone rows. A missing timezone column yields empty names, which
/// the resolver replaces with the default zone.
pub fn read_timezones<R: Read>(reader: R) -> Result<Vec<TimezoneRow>> {
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?.clone();
    let store_col = find_column(&headers, &["store_id"]).ok_or(Error::MissingColumn {
        source_name: "timezone",
        column: "store_id",
    })?;
    let tz_col = find_column(&headers, &["timezone_str", "timezone"]);

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        let store_id = record.get(store_col).unwrap_or("").trim();
        if store_id.is_empty() {
            continue;
        }
        let timezone = tz_col
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .trim()
            .to_string();
        rows.push(TimezoneRow {
            store_id: store_id.to_string(),
            timezone,
        });
    }
    Ok(rows)
}
