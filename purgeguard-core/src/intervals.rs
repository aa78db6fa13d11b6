//! Run-length interval codec
//!
//! ## Convention
//!
//! Every interval in the engine is half-open.
//!
//! - `IndexInterval { start, end }` covers samples `start..end`.
//! - `TimeInterval { start, end }` covers instants `start <= t < end`.
//!
//! Converting an index interval to time uses the timestamp of the first
//! sample *after* the run as the end. When the run reaches the last sample
//! there is no such timestamp, so the end is `t[n-1] + dt` with `dt` the
//! median sampling interval. Converting back selects exactly the samples
//! inside `[start, end)`, so `index -> time -> index` is the identity on the
//! same timestamps.
//!
//! Closed ranges coming from outside (correction listings, hand-entered
//! windows) are converted once on entry with [`TimeInterval::closed`].
//!
//! ```text
//! mask:   F F T T T F T F
//! runs:       [2,5)   [6,7)
//! ```

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::{
    time::{SamplingInterval, Timestamp},
    traits::Mask,
};

/// Half-open range of sample indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexInterval {
    /// First sample in the interval
    pub start: usize,
    /// One past the last sample
    pub end: usize,
}

impl IndexInterval {
    /// Create an interval; `end < start` collapses to empty at `start`
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of samples covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the interval covers no samples
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether sample `index` is inside
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Widen by `before`/`after` samples, clamped to `0..len`
    pub fn widened(&self, before: usize, after: usize, len: usize) -> Self {
        Self::new(
            self.start.saturating_sub(before),
            self.end.saturating_add(after).min(len),
        )
    }

    /// Clamp both ends to `0..len`
    pub fn clamped(&self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

/// Half-open range of instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeInterval {
    /// First instant inside the interval
    pub start: Timestamp,
    /// First instant after the interval
    pub end: Timestamp,
}

impl TimeInterval {
    /// Half-open `[start, end)`
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Closed `[first, last]`, stored half-open one nanosecond past `last`
    pub fn closed(first: Timestamp, last: Timestamp) -> Self {
        Self {
            start: first,
            end: last + Duration::nanoseconds(1),
        }
    }

    /// Whether `ts` falls inside
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Same interval moved by `offset`
    pub fn shifted(&self, offset: Duration) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

/// Extract maximal runs of `true` as ordered, non-overlapping intervals
pub fn extract_runs(mask: &[bool]) -> Vec<IndexInterval> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, &flagged) in mask.iter().enumerate() {
        match (flagged, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(IndexInterval::new(s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(IndexInterval::new(s, mask.len()));
    }

    runs
}

/// Build a mask of `len` samples with every interval set to `true`
///
/// Intervals may overlap; parts beyond `len` are ignored.
pub fn materialize(intervals: &[IndexInterval], len: usize) -> Mask {
    let mut mask = vec![false; len];
    for interval in intervals {
        let clamped = interval.clamped(len);
        mask[clamped.start..clamped.end].fill(true);
    }
    mask
}

/// Converts between sample indices and instants of one record
#[derive(Debug, Clone, Copy)]
pub struct IntervalCodec<'a> {
    timestamps: &'a [Timestamp],
    sampling: SamplingInterval,
}

impl<'a> IntervalCodec<'a> {
    /// Codec over sorted timestamps
    pub fn new(timestamps: &'a [Timestamp], sampling: SamplingInterval) -> Self {
        Self {
            timestamps,
            sampling,
        }
    }

    /// Instant at which index `end` begins; past the last sample extrapolates by `dt`
    fn boundary(&self, end: usize) -> Option<Timestamp> {
        match self.timestamps.get(end) {
            Some(&ts) => Some(ts),
            None => self
                .timestamps
                .last()
                .map(|&last| last + self.sampling.duration() * (end + 1 - self.timestamps.len()) as i32),
        }
    }

    /// Index interval as instants; `None` when empty or starting past the data
    pub fn to_time(&self, interval: IndexInterval) -> Option<TimeInterval> {
        if interval.is_empty() {
            return None;
        }
        let start = *self.timestamps.get(interval.start)?;
        let end = self.boundary(interval.end)?;
        Some(TimeInterval::new(start, end))
    }

    /// Convert many intervals, dropping empty ones
    pub fn to_times(&self, intervals: &[IndexInterval]) -> Vec<TimeInterval> {
        intervals.iter().filter_map(|&iv| self.to_time(iv)).collect()
    }

    /// Samples whose instant lies in `[start, end)`; `None` when no sample does
    pub fn to_indices(&self, interval: TimeInterval) -> Option<IndexInterval> {
        let start = self.timestamps.partition_point(|&t| t < interval.start);
        let end = self.timestamps.partition_point(|&t| t < interval.end);
        let indices = IndexInterval::new(start, end);
        (!indices.is_empty()).then_some(indices)
    }

    /// Mask of samples inside any of the time intervals
    pub fn materialize_times(&self, intervals: &[TimeInterval]) -> Mask {
        let indices: Vec<IndexInterval> = intervals
            .iter()
            .filter_map(|&iv| self.to_indices(iv))
            .collect();
        materialize(&indices, self.timestamps.len())
    }
}
