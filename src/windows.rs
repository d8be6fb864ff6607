//! Business window generation
//!
//! Expands a store's weekly schedule into concrete UTC segments inside one
//! trailing evaluation period. Each calendar date intersecting the period is
//! enumerated, its local windows are localized in the store zone for that
//! specific date (so DST rules apply per date), midnight-crossing windows get
//! 24 hours added to the end bound, and the result is clipped to the period.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::hours::BusinessHoursIndex;
use crate::model::Period;

/// A clipped UTC interval during which business hours apply. Always
/// `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Segment {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Map a local wall-clock time on a given date into the zone.
///
/// Ambiguous times (DST fall-back) take the later, standard-time offset;
/// nonexistent times (spring-forward gap) shift forward across the gap.
/// Both match interpreting the wall clock with the standard offset.
fn localize(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => Some(t),
        LocalResult::Ambiguous(_, latest) => Some(latest),
        LocalResult::None => tz.from_local_datetime(&(naive + Duration::hours(1))).latest(),
    }
}

/// Intersect a candidate segment with the evaluation window. Empty or
/// inverted intersections yield `None`.
fn clip_segment(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Option<Segment> {
    let seg_start = start.max(window_start);
    let seg_end = end.min(window_end);
    (seg_start < seg_end).then_some(Segment { start: seg_start, end: seg_end })
}

/// Generate the store's business segments for one period ending at `anchor`.
pub fn business_segments(
    hours: &BusinessHoursIndex,
    store_id: &str,
    tz: Tz,
    anchor: DateTime<Utc>,
    period: Period,
) -> Vec<Segment> {
    let window_start = anchor - period.duration();
    let window_end = anchor;

    let mut segments = Vec::new();
    let mut date = window_start.date_naive();
    let last = window_end.date_naive();
    while date <= last {
        let weekday = date.weekday().num_days_from_monday() as u8;
        for window in hours.day_windows(store_id, weekday) {
            let Some(start_local) = localize(tz, date, window.start) else {
                continue;
            };
            let Some(mut end_local) = localize(tz, date, window.end) else {
                continue;
            };
            if end_local <= start_local {
                // Crosses midnight into the next day
                end_local += Duration::hours(24);
            }

            if let Some(segment) = clip_segment(
                start_local.with_timezone(&Utc),
                end_local.with_timezone(&Utc),
                window_start,
                window_end,
            ) {
                segments.push(segment);
            }
        }
        let Some(next) = date.succ_opt() else { break };
        date = next;
    }
    segments
}



/// Kani formal verification proofs for the clip arithmetic
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    fn instant() -> DateTime<Utc> {
        let secs: i64 = kani::any();
        kani::assume((0..=4_000_000_000i64).contains(&secs));
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[kani::proof]
    fn clipped_segment_stays_inside_both_intervals() {
        let (start, end) = (instant(), instant());
        let (window_start, window_end) = (instant(), instant());
        if let Some(seg) = clip_segment(start, end, window_start, window_end) {
            kani::assert(seg.start < seg.end, "clipped segment must be non-empty");
            kani::assert(seg.start >= window_start, "clip must not precede the window");
            kani::assert(seg.end <= window_end, "clip must not outlive the window");
            kani::assert(seg.start >= start, "clip must not precede the candidate");
            kani::assert(seg.end <= end, "clip must not outlive the candidate");
        }
    }

    #[kani::proof]
    fn true_overlap_always_survives() {
        let (start, end) = (instant(), instant());
        let (window_start, window_end) = (instant(), instant());
        kani::assume(start < end && window_start < window_end);
        kani::assume(start < window_end && window_start < end);
        kani::assert(
            clip_segment(start, end, window_start, window_end).is_some(),
            "a true overlap must produce a segment",
        );
    }

    #[kani::proof]
    fn disjoint_intervals_clip_to_nothing() {
        let (start, end) = (instant(), instant());
        let (window_start, window_end) = (instant(), instant());
        kani::assume(end <= window_start || window_end <= start);
        kani::assert(
            clip_segment(start, end, window_start, window_end).is_none(),
            "disjoint intervals must clip to nothing",
        );
    }
}
