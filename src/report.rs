//! Report assembly
//!
//! Drives the per-store pipeline (window generation, overlap aggregation)
//! across the store universe and the three trailing periods, converts and
//! rounds the results, and writes the output artifact.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::aggregate::{accumulate, PeriodTotals};
use crate::error::{Error, Result};
use crate::hours::BusinessHoursIndex;
use crate::model::{Period, ReportRow};
use crate::snapshot::Snapshot;
use crate::timeline::PollTimeline;
use crate::timezone::TimezoneResolver;
use crate::windows::business_segments;

/// Round to 2 decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// One report run over an immutable snapshot.
///
/// Built once per run: the anchor instant, the per-store timelines, and the
/// configuration indexes are all computed up front, and per-store
/// computation is a pure read-only function after that.
#[derive(Debug)]
pub struct ReportEngine {
    timelines: HashMap<String, PollTimeline>,
    hours: BusinessHoursIndex,
    timezones: TimezoneResolver,
    anchor: DateTime<Utc>,
    stores: Vec<String>,
}

impl ReportEngine {
    /// Build the engine from a snapshot.
    ///
    /// The anchor instant is the maximum poll timestamp unless overridden.
    /// An empty poll snapshot has no anchor and is fatal.
    pub fn build(
        snapshot: Snapshot,
        default_zone: Tz,
        anchor_override: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        if snapshot.polls.is_empty() {
            return Err(Error::NoPollData);
        }
        let max_poll_ts = snapshot
            .polls
            .iter()
            .map(|p| p.timestamp_utc)
            .max()
            .ok_or(Error::NoPollData)?;
        let anchor = anchor_override.unwrap_or(max_poll_ts);

        // Universe: every store id seen in any source
        let mut stores: BTreeSet<String> = BTreeSet::new();
        stores.extend(snapshot.polls.iter().map(|p| p.store_id.clone()));
        stores.extend(snapshot.hours.iter().map(|r| r.store_id.clone()));
        stores.extend(snapshot.timezones.iter().map(|r| r.store_id.clone()));

        let hours = BusinessHoursIndex::build(&snapshot.hours);
        let timezones = TimezoneResolver::build(&snapshot.timezones, default_zone);

        let mut grouped: HashMap<String, Vec<crate::model::StorePoll>> = HashMap::new();
        for poll in snapshot.polls {
            grouped.entry(poll.store_id.clone()).or_default().push(poll);
        }
        let timelines = grouped
            .into_iter()
            .map(|(store_id, polls)| (store_id, PollTimeline::new(polls)))
            .collect();

        Ok(Self {
            timelines,
            hours,
            timezones,
            anchor,
            stores: stores.into_iter().collect(),
        })
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }

    pub fn store_ids(&self) -> &[String] {
        &self.stores
    }

    fn period_totals(&self, store_id: &str, timeline: &PollTimeline, period: Period) -> PeriodTotals {
        let tz = self.timezones.resolve(store_id);
        let segments = business_segments(&self.hours, store_id, tz, self.anchor, period);
        accumulate(timeline, &segments)
    }

    /// Compute one store's report row. Pure and read-only, so safe to fan
    /// out across workers.
    pub fn compute_store(&self, store_id: &str) -> ReportRow {
        let empty = PollTimeline::default();
        let timeline = self.timelines.get(store_id).unwrap_or(&empty);

        let hour = self.period_totals(store_id, timeline, Period::LastHour);
        let day = self.period_totals(store_id, timeline, Period::LastDay);
        let week = self.period_totals(store_id, timeline, Period::LastWeek);
        debug!(
            "Store {}: {} polls, week business seconds {}",
            store_id,
            timeline.len(),
            week.total_seconds
        );

        ReportRow {
            store_id: store_id.to_string(),
            uptime_last_hour: round2(hour.active_seconds / 60.0),
            downtime_last_hour: round2(hour.downtime_seconds() / 60.0),
            uptime_last_day: round2(day.active_seconds / 3600.0),
            downtime_last_day: round2(day.downtime_seconds() / 3600.0),
            uptime_last_week: round2(week.active_seconds / 3600.0),
            downtime_last_week: round2(week.downtime_seconds() / 3600.0),
        }
    }

    /// Compute the whole report sequentially, rows ordered ascending by
    /// store id.
    pub fn compute_report(&self) -> Vec<ReportRow> {
        self.stores.iter().map(|id| self.compute_store(id)).collect()
    }

    /// Compute the report with per-store fan-out across blocking workers.
    ///
    /// Cancellation is checked between stores; a cancelled run discards all
    /// partial results and returns [`Error::Cancelled`].
    pub async fn compute_report_parallel(
        self: Arc<Self>,
        cancel: CancellationToken,
    ) -> Result<Vec<ReportRow>> {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let chunk_size = self.stores.len().div_ceil(workers).max(1);
        info!(
            "Computing report for {} stores ({} workers)",
            self.stores.len(),
            workers
        );

        let mut handles = Vec::new();
        for chunk in self.stores.chunks(chunk_size) {
            let ids: Vec<String> = chunk.to_vec();
            let engine = Arc::clone(&self);
            let cancel = cancel.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                let mut rows = Vec::with_capacity(ids.len());
                for id in &ids {
                    if cancel.is_cancelled() {
                        return Err(Error::Cancelled);
                    }
                    rows.push(engine.compute_store(id));
                }
                Ok(rows)
            }));
        }

        let mut rows = Vec::with_capacity(self.stores.len());
        for handle in handles {
            rows.extend(handle.await.map_err(|e| Error::Worker(e.to_string()))??);
        }
        rows.sort_by(|a, b| a.store_id.cmp(&b.store_id));
        Ok(rows)
    }
}

/// Write the report artifact as CSV.
pub fn write_csv(rows: &[ReportRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the report artifact as JSON.
pub fn write_json(rows: &[ReportRow], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, rows)?;
    Ok(())
}
