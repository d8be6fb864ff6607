//! Business hours index
//!
//! Groups raw business-hours rows by (store, weekday) with tolerant
//! time-of-day parsing. Stores with no usable rows fall back to a 24x7
//! schedule.

use chrono::NaiveTime;
use std::collections::HashMap;
use tracing::debug;

use crate::model::BusinessHoursRow;

/// A store-local time-of-day window. If `end <= start` the window crosses
/// midnight into the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Parse a local time string, accepting "HH:MM:SS" or "HH:MM".
pub fn parse_local_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

#[derive(Debug, Clone, Default)]
pub struct BusinessHoursIndex {
    by_store: HashMap<String, HashMap<u8, Vec<LocalWindow>>>,
}

impl BusinessHoursIndex {
    /// Build the index, skipping individually unparseable rows.
    ///
    /// A store where every row fails to parse ends up absent from the index
    /// and gets the 24x7 fallback at lookup time.
    pub fn build(rows: &[BusinessHoursRow]) -> Self {
        let mut by_store: HashMap<String, HashMap<u8, Vec<LocalWindow>>> = HashMap::new();
        for row in rows {
            if row.day_of_week > 6 {
                debug!(
                    "Store {}: dropping business-hours row with day_of_week={}",
                    row.store_id, row.day_of_week
                );
                continue;
            }
            let (Some(start), Some(end)) = (
                parse_local_time(&row.start_local),
                parse_local_time(&row.end_local),
            ) else {
                debug!(
                    "Store {}: dropping business-hours row with unparseable times '{}'..'{}'",
                    row.store_id, row.start_local, row.end_local
                );
                continue;
            };
            by_store
                .entry(row.store_id.clone())
                .or_default()
                .entry(row.day_of_week)
                .or_default()
                .push(LocalWindow { start, end });
        }
        Self { by_store }
    }

    /// Whether the store has any surviving business-hours configuration.
    pub fn is_configured(&self, store_id: &str) -> bool {
        self.by_store.contains_key(store_id)
    }

    /// Windows for one store on one weekday (0 = Monday).
    ///
    /// Stores absent from the index are treated as always open, one window
    /// per day from 00:00:00 to 23:59:59. The missing final second matches
    /// the upstream data convention for "open all day".
    pub fn day_windows(&self, store_id: &str, weekday: u8) -> Vec<LocalWindow> {
        match self.by_store.get(store_id) {
            Some(days) => days.get(&weekday).cloned().unwrap_or_default(),
            None => vec![LocalWindow {
                start: NaiveTime::MIN,
                end: NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
            }],
        }
    }
}
