//! Store timezone resolution
//!
//! Maps store ids to IANA zones, substituting a configured default for
//! stores with missing or invalid entries.

use chrono_tz::Tz;
use std::collections::HashMap;
use tracing::warn;

use crate::model::TimezoneRow;

#[derive(Debug, Clone)]
pub struct TimezoneResolver {
    zones: HashMap<String, Tz>,
    default_zone: Tz,
}

impl TimezoneResolver {
    /// Build the resolver from raw timezone rows.
    ///
    /// Invalid or empty zone names are recovered locally: the row is dropped
    /// and lookups for that store fall back to the default zone.
    pub fn build(rows: &[TimezoneRow], default_zone: Tz) -> Self {
        let mut zones = HashMap::new();
        for row in rows {
            let name = row.timezone.trim();
            if name.is_empty() {
                continue;
            }
            match name.parse::<Tz>() {
                Ok(tz) => {
                    zones.insert(row.store_id.clone(), tz);
                }
                Err(_) => {
                    warn!(
                        "Store {}: unknown timezone '{}', using {}",
                        row.store_id, name, default_zone
                    );
                }
            }
        }
        Self { zones, default_zone }
    }

    /// Resolve a store's zone, falling back to the default.
    pub fn resolve(&self, store_id: &str) -> Tz {
        self.zones.get(store_id).copied().unwrap_or(self.default_zone)
    }

    pub fn default_zone(&self) -> Tz {
        self.default_zone
    }
}
