//! Per-store poll timeline
//!
//! Holds one store's polls sorted ascending and answers the two questions
//! the aggregator needs: "what was the status at or before t" and "which
//! polls fall strictly inside a segment". Status between polls follows
//! forward-fill semantics; before the first poll the store counts as
//! inactive.

use chrono::{DateTime, Utc};

use crate::model::{StorePoll, StoreStatus};

/// Status assumed before any poll has been observed.
pub const DEFAULT_STATUS: StoreStatus = StoreStatus::Inactive;

#[derive(Debug, Clone, Default)]
pub struct PollTimeline {
    polls: Vec<(DateTime<Utc>, StoreStatus)>,
}

impl PollTimeline {
    /// Build a timeline from one store's polls, in any order.
    pub fn new(polls: impl IntoIterator<Item = StorePoll>) -> Self {
        let mut polls: Vec<(DateTime<Utc>, StoreStatus)> = polls
            .into_iter()
            .map(|p| (p.timestamp_utc, p.status))
            .collect();
        polls.sort_by_key(|(ts, _)| *ts);
        Self { polls }
    }

    pub fn is_empty(&self) -> bool {
        self.polls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.polls.len()
    }

    /// Status of the latest poll with timestamp <= t, or [`DEFAULT_STATUS`]
    /// if no poll precedes t.
    pub fn status_before(&self, t: DateTime<Utc>) -> StoreStatus {
        let idx = self.polls.partition_point(|(ts, _)| *ts <= t);
        if idx == 0 {
            DEFAULT_STATUS
        } else {
            self.polls[idx - 1].1
        }
    }

    /// Polls with start < timestamp < end, ascending. These are the
    /// forward-fill transition points inside a segment.
    pub fn polls_strictly_within(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> &[(DateTime<Utc>, StoreStatus)] {
        let lo = self.polls.partition_point(|(ts, _)| *ts <= start);
        let hi = self.polls.partition_point(|(ts, _)| *ts < end);
        if lo >= hi {
            &[]
        } else {
            &self.polls[lo..hi]
        }
    }
}
