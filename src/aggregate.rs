//! Overlap aggregation
//!
//! Intersects business segments with the forward-filled poll timeline.
//! Each segment is partitioned at the poll instants that fall strictly
//! inside it; the first sub-interval carries `status_before(segment_start)`
//! and every later sub-interval carries the status of the poll at its left
//! boundary. Active sub-interval seconds sum into uptime.

use chrono::Duration;

use crate::timeline::PollTimeline;
use crate::windows::Segment;

/// Active/total business seconds for one (store, period) pair.
///
/// Downtime is `total_seconds - active_seconds`; the two always partition
/// the total exactly because every sub-interval is counted once.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodTotals {
    pub active_seconds: f64,
    pub total_seconds: f64,
}

impl PeriodTotals {
    pub fn downtime_seconds(&self) -> f64 {
        self.total_seconds - self.active_seconds
    }
}

/// Fractional seconds in a span. Poll timestamps carry sub-second
/// precision, so durations do too.
pub fn span_seconds(d: Duration) -> f64 {
    match d.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => d.num_milliseconds() as f64 / 1e3,
    }
}

/// Aggregate forward-filled status over a set of business segments.
pub fn accumulate(timeline: &PollTimeline, segments: &[Segment]) -> PeriodTotals {
    let mut totals = PeriodTotals::default();

    for segment in segments {
        totals.total_seconds += span_seconds(segment.duration());

        let mut status = timeline.status_before(segment.start);
        let mut cursor = segment.start;
        for (instant, poll_status) in timeline.polls_strictly_within(segment.start, segment.end) {
            if status.is_active() {
                totals.active_seconds += span_seconds(*instant - cursor);
            }
            cursor = *instant;
            status = *poll_status;
        }
        if status.is_active() {
            totals.active_seconds += span_seconds(segment.end - cursor);
        }
    }

    totals
}
