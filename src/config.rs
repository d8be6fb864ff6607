use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use std::env;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Config {
    // Input snapshot CSVs
    pub polls_path: String,
    pub business_hours_path: String,
    pub timezones_path: String,

    // Output artifact path
    pub report_path: String,

    // Default IANA zone for stores with missing/invalid timezone config
    pub default_timezone: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env if present, ignore if missing
        Self::from_getter(|key| env::var(key).ok())
    }

    /// Parse config from a custom getter function (for testing)
    pub fn from_getter<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            polls_path: get("POLLS_CSV").unwrap_or_else(|| "data/store_status.csv".to_string()),
            business_hours_path: get("BUSINESS_HOURS_CSV")
                .unwrap_or_else(|| "data/menu_hours.csv".to_string()),
            timezones_path: get("TIMEZONES_CSV")
                .unwrap_or_else(|| "data/timezones.csv".to_string()),

            report_path: get("REPORT_PATH").unwrap_or_else(|| "report.csv".to_string()),

            default_timezone: get("DEFAULT_TIMEZONE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "America/Chicago".to_string()),
        })
    }

    /// Create config from a HashMap (convenience for testing)
    #[cfg(test)]
    pub fn from_map(map: &std::collections::HashMap<&str, &str>) -> Result<Self> {
        Self::from_getter(|key| map.get(key).map(|v| v.to_string()))
    }

    /// The parsed default zone.
    pub fn default_zone(&self) -> Result<Tz> {
        self.default_timezone
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("DEFAULT_TIMEZONE '{}' is not a valid IANA zone", self.default_timezone))
    }

    /// Validate configuration values at startup.
    /// Returns Ok(()) if all validations pass, or Err with details of what failed.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        // The poll source is required; business hours and timezones may be
        // absent and only get a note at load time
        if !Path::new(&self.polls_path).exists() {
            errors.push(format!("Poll snapshot not found at '{}'.", self.polls_path));
        }

        if self.default_timezone.parse::<Tz>().is_err() {
            errors.push(format!(
                "DEFAULT_TIMEZONE '{}' is not a valid IANA zone.",
                self.default_timezone
            ));
        }

        if self.report_path.trim().is_empty() {
            errors.push("REPORT_PATH cannot be empty.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )
        }
    }
}
