//! Purge Interval Policy
//!
//! ## From Mask to Purges
//!
//! The combined flat mask usually contains the real purge plus a handful of
//! quiet spells (calm nights, brief sensor holds). The policy narrows these
//! down in four steps:
//!
//! 1. **Shape**: each flat run becomes a candidate interval, padded so that
//!    the ramp edges of the hold are flagged too.
//! 2. **Score**: the humidity standard deviation over the candidate. A purge
//!    holds humidity exactly, so the real purge scores lowest.
//! 3. **Select**: keep the flattest one (from the cutover date on, the
//!    instrument purges once a day) or the two flattest (before it, twice).
//! 4. **Fallback**: before the cutover, if only one candidate survived, the
//!    twin purge is assumed 12 hours away and synthesized with the same length.
//!
//! ```text
//! mask     ....TTTT..........T.......TTTTT....
//! shaped     [--------]    [---]   [---------]
//! scores      0.00          0.21    0.03
//! select      #1                    #2
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    config::{CandidateShaping, PurgeConfig, SampleWindows},
    detectors::utils::population_std,
    intervals::{extract_runs, materialize, IndexInterval},
    time::{noon_of, Timestamp},
    traits::Mask,
};

/// Candidate purge interval and its humidity flatness score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PurgeCandidate {
    /// Candidate samples
    pub interval: IndexInterval,
    /// Population standard deviation of humidity over the interval
    pub flatness_score: f64,
}

/// Drop runs shorter than `min_samples`; widen the rest by `min_samples` each side
///
/// Short transients are noise. A genuine purge is flagged generously around
/// its detected core so the ramp in and out is not missed. The widening is
/// not idempotent: applying the function to its own output widens again.
pub fn expand(mask: &[bool], min_samples: usize) -> Mask {
    let kept: Vec<IndexInterval> = extract_runs(mask)
        .into_iter()
        .filter(|run| run.len() >= min_samples)
        .map(|run| run.widened(min_samples, min_samples, mask.len()))
        .collect();
    materialize(&kept, mask.len())
}

/// Turn the combined purge mask into candidate intervals
///
/// With `HalfPadding`, every run is padded by `min_samples / 2` on both sides.
/// A run that already reaches the end of the record is only padded before.
/// With `FilterAndExpand`, [`expand`] is applied first and its runs are used
/// as they are.
pub fn candidates(mask: &[bool], min_samples: usize, shaping: CandidateShaping) -> Vec<IndexInterval> {
    match shaping {
        CandidateShaping::HalfPadding => {
            let pad = min_samples / 2;
            extract_runs(mask)
                .into_iter()
                .map(|run| run.widened(pad, pad, mask.len()))
                .collect()
        }
        CandidateShaping::FilterAndExpand => extract_runs(&expand(mask, min_samples)),
    }
}

/// Score every candidate by the humidity standard deviation inside it
pub fn score(intervals: &[IndexInterval], humidity: &[f64]) -> Vec<PurgeCandidate> {
    intervals
        .iter()
        .map(|&interval| {
            let clamped = interval.clamped(humidity.len());
            PurgeCandidate {
                interval,
                flatness_score: population_std(&humidity[clamped.start..clamped.end]),
            }
        })
        .collect()
}

/// Outcome of ranking, selection and fallback for one day
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Selected candidates, flattest first
    pub selected: Vec<PurgeCandidate>,
    /// Synthesized twin purge, if one was added
    pub fallback: Option<IndexInterval>,
}

impl Selection {
    /// Selected intervals plus the fallback, ordered by start
    pub fn intervals(&self) -> Vec<IndexInterval> {
        let mut intervals: Vec<IndexInterval> = self.selected.iter().map(|c| c.interval).collect();
        intervals.extend(self.fallback);
        intervals.sort();
        intervals
    }
}

/// Date-dependent ranking and selection rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalPolicy {
    cutover_date: NaiveDate,
    keep_before_cutover: usize,
    keep_after_cutover: usize,
    fallback_offset: usize,
}

impl IntervalPolicy {
    /// Policy from configuration and the day's resolved windows
    pub fn new(config: &PurgeConfig, windows: &SampleWindows) -> Self {
        Self {
            cutover_date: config.cutover_date,
            keep_before_cutover: config.keep_before_cutover,
            keep_after_cutover: config.keep_after_cutover,
            fallback_offset: windows.fallback_offset,
        }
    }

    /// Candidates kept on `date`
    pub fn keep_count(&self, date: NaiveDate) -> usize {
        if date >= self.cutover_date {
            self.keep_after_cutover
        } else {
            self.keep_before_cutover
        }
    }

    /// Sort ascending by score (stable) and keep the policy's count
    pub fn rank_and_select(&self, mut candidates: Vec<PurgeCandidate>, date: NaiveDate) -> Vec<PurgeCandidate> {
        candidates.sort_by(|a, b| a.flatness_score.total_cmp(&b.flatness_score));
        candidates.truncate(self.keep_count(date));
        candidates
    }

    /// Twin purge `fallback_offset` samples away from a lone survivor
    ///
    /// Applies only before the cutover and only to exactly one selected
    /// candidate. A survivor starting before noon gets a later twin, any other
    /// an earlier one. A twin that would leave the record is discarded.
    pub fn synthesize_fallback(
        &self,
        selected: &[PurgeCandidate],
        date: NaiveDate,
        timestamps: &[Timestamp],
    ) -> Option<IndexInterval> {
        if selected.len() != 1 || date >= self.cutover_date {
            return None;
        }

        let interval = selected[0].interval;
        let duration = interval.len();
        let start_time = *timestamps.get(interval.start)?;

        let twin = if start_time < noon_of(start_time) {
            let start = interval.start + self.fallback_offset;
            IndexInterval::new(start, start + duration)
        } else {
            let start = interval.start.checked_sub(self.fallback_offset)?;
            IndexInterval::new(start, start + duration)
        };

        if twin.end > timestamps.len() {
            log::debug!("fallback purge {:?} falls outside the record, discarded", twin);
            return None;
        }
        Some(twin)
    }

    /// Rank, select and add the fallback in one step
    pub fn select(&self, candidates: Vec<PurgeCandidate>, date: NaiveDate, timestamps: &[Timestamp]) -> Selection {
        let selected = self.rank_and_select(candidates, date);
        let fallback = self.synthesize_fallback(&selected, date, timestamps);
        Selection { selected, fallback }
    }
}
