//! Day Processing Engine
//!
//! ## Pipeline
//!
//! ```text
//! DaySignals ──► flat(T) & flat(RH) & !saturated ──► candidates ──► rank/select ──► purges
//!      │                                                                │
//!      └──► dip scan ──► gate (expected windows from reference) ──────► │
//!                                                                       ▼
//!                              external bad data ──────────────► FlagCompositor ──► DayReport
//! ```
//!
//! One call to [`PurgeEngine::process`] is one independent pass over one day.
//! Nothing is cached between calls, and the engine only holds immutable
//! configuration, so one engine can serve several threads.
//!
//! ## Reference Day
//!
//! The dip gate needs the previous day's purges. They can be given directly
//! as time intervals, as that day's raw signals (purges are then re-derived
//! with a looser saturation ceiling and every flat run counts), or as that
//! day's timestamps and temperature flags from an earlier run. Without a
//! reference every dip is accepted.

use chrono::Duration;

use crate::{
    compositor::{self, ChannelFlags, CompositeInputs, FlagCompositor},
    config::{InconsistentReference, PurgeConfig, SampleWindows},
    constants::SECONDS_PER_MINUTE,
    cross_day::{self, CrossDayValidator, ExpectedWindow},
    detectors::{self, Dip, DipDetector, FlatRegionDetector, SaturationFilter},
    errors::QcResult,
    flags::{FlagArray, FlagValue},
    intervals::{extract_runs, IndexInterval, IntervalCodec, TimeInterval},
    policy::{self, IntervalPolicy, PurgeCandidate},
    signal::DaySignals,
    time::{from_seconds, SamplingInterval, Timestamp},
    traits::Mask,
};

/// Previous-day purge information for the dip gate
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    /// Purge intervals already known
    Intervals(Vec<TimeInterval>),
    /// Raw signals of the reference day
    Signals(DaySignals),
    /// Timestamps and temperature flags of an already processed day
    Flags {
        /// Sample instants of the reference day
        timestamps: Vec<Timestamp>,
        /// Its temperature flags
        temperature_flags: FlagArray,
    },
}

/// Optional inputs accompanying one day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayInputs {
    /// Reference day for cross-day validation
    pub reference: Option<Reference>,
    /// External bad-data spans for temperature
    pub bad_temperature: Vec<TimeInterval>,
    /// External bad-data spans for humidity
    pub bad_humidity: Vec<TimeInterval>,
}

/// Flags and diagnostics for one processed day
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    /// Final flags of both channels
    pub flags: ChannelFlags,
    /// Every scored candidate, in mask order
    pub candidates: Vec<PurgeCandidate>,
    /// Selected purges plus any fallback, ordered by start
    pub purge_intervals: Vec<IndexInterval>,
    /// The same purges as instants
    pub purge_times: Vec<TimeInterval>,
    /// Whether a fallback purge was synthesized
    pub fallback_added: bool,
    /// Every detected dip
    pub dips: Vec<Dip>,
    /// Dips that passed the gate
    pub accepted_dips: Vec<Dip>,
    /// Windows the gate used
    pub expected_windows: Vec<ExpectedWindow>,
    /// Consistency verdict against the reference, if one was given
    pub consistent: Option<bool>,
    /// Median sampling interval of the day
    pub sampling: SamplingInterval,
}

impl DayReport {
    /// Temperature flags
    pub fn temperature_flags(&self) -> &FlagArray {
        &self.flags.temperature
    }

    /// Humidity flags
    pub fn humidity_flags(&self) -> &FlagArray {
        &self.flags.humidity
    }
}

/// Purge-cycle and dip detection for single days
#[derive(Debug, Clone, PartialEq)]
pub struct PurgeEngine {
    config: PurgeConfig,
    dip_detector: DipDetector,
    validator: CrossDayValidator,
}

impl PurgeEngine {
    /// Engine with a validated configuration
    pub fn new(config: PurgeConfig) -> QcResult<Self> {
        config.validate()?;
        let dip_detector = DipDetector::from_config(&config.dip)?;
        let validator = CrossDayValidator::from_config(&config);
        Ok(Self {
            config,
            dip_detector,
            validator,
        })
    }

    /// Engine with the default configuration
    pub fn with_defaults() -> QcResult<Self> {
        Self::new(PurgeConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &PurgeConfig {
        &self.config
    }

    /// Process one day
    pub fn process(&self, signals: &DaySignals, inputs: &DayInputs) -> QcResult<DayReport> {
        let sampling = signals.sampling();
        let windows = self.config.sample_windows(sampling)?;
        let timestamps = signals.timestamps();
        let codec = IntervalCodec::new(timestamps, sampling);
        let date = signals.date();

        // Purges
        let mask = self.purge_mask(signals, &windows, self.config.saturation_ceiling)?;
        let shaped = policy::candidates(&mask, windows.min_purge, self.config.candidate_shaping);
        let candidates = policy::score(&shaped, signals.humidity());
        let selection = IntervalPolicy::new(&self.config, &windows).select(candidates.clone(), date, timestamps);
        let purge_intervals = selection.intervals();
        let purge_times = codec.to_times(&purge_intervals);
        log::debug!(
            "{}: {} candidates, {} selected, fallback {}",
            date,
            candidates.len(),
            selection.selected.len(),
            selection.fallback.is_some()
        );

        // Dips
        let dips = self.dip_detector.detect(signals.humidity(), timestamps);
        let (expected_windows, consistent) = match &inputs.reference {
            Some(reference) => {
                let reference = self.reference_intervals(reference)?;
                let consistent = self.validator.check_consistency(&reference, &purge_times);
                let windows = match (consistent, self.config.inconsistent_reference) {
                    (false, InconsistentReference::AcceptAll) => Vec::new(),
                    _ => cross_day::build_expected_windows(&reference),
                };
                (windows, Some(consistent))
            }
            None => (Vec::new(), None),
        };
        let accepted_dips = self.validator.filter_dips(&dips, timestamps, &expected_windows);

        // Flags
        let compositor = FlagCompositor::from_windows(&self.config, &windows);
        let mut flags = compositor.composite(
            &codec,
            signals.len(),
            &CompositeInputs {
                purges: &purge_intervals,
                dips: &accepted_dips,
                bad_temperature: &inputs.bad_temperature,
                bad_humidity: &inputs.bad_humidity,
            },
        );
        if let Some(threshold) = self.config.low_temperature_threshold {
            compositor::flag_below(&mut flags, signals.temperature(), threshold);
        }

        log::info!(
            "{}: {} purges, {}/{} dips accepted, {} T / {} RH samples flagged",
            date,
            purge_intervals.len(),
            accepted_dips.len(),
            dips.len(),
            signals.len() - flags.temperature.count(FlagValue::Good),
            signals.len() - flags.humidity.count(FlagValue::Good),
        );

        Ok(DayReport {
            flags,
            candidates,
            purge_intervals,
            purge_times,
            fallback_added: selection.fallback.is_some(),
            dips,
            accepted_dips,
            expected_windows,
            consistent,
            sampling,
        })
    }

    /// Purge intervals of a reference day
    pub fn reference_intervals(&self, reference: &Reference) -> QcResult<Vec<TimeInterval>> {
        match reference {
            Reference::Intervals(intervals) => Ok(intervals.clone()),
            Reference::Signals(signals) => {
                let windows = self.config.sample_windows(signals.sampling())?;
                let mask = self.purge_mask(signals, &windows, self.config.reference_saturation_ceiling)?;
                let codec = IntervalCodec::new(signals.timestamps(), signals.sampling());
                Ok(codec.to_times(&extract_runs(&mask)))
            }
            Reference::Flags {
                timestamps,
                temperature_flags,
            } => {
                let sampling = SamplingInterval::from_timestamps(timestamps)?;
                cross_day::reference_intervals_from_flags(timestamps, temperature_flags, sampling)
            }
        }
    }

    /// Re-flag purges by time of day, replacing any detected ones
    ///
    /// Existing purge and recovery flags are cleared first; bad-data flags
    /// stay. Every window is moved by `shift` before it is applied.
    pub fn reflag_by_time_of_day(
        &self,
        signals: &DaySignals,
        flags: &mut ChannelFlags,
        windows: &[ExpectedWindow],
        shift: Duration,
    ) {
        let shifted: Vec<ExpectedWindow> = windows.iter().map(|w| w.shifted(shift)).collect();
        let recovery = from_seconds(self.config.recovery_minutes * SECONDS_PER_MINUTE);

        compositor::clear_purge_flags(flags);
        compositor::apply_time_of_day_windows(flags, signals.timestamps(), &shifted, recovery);
    }

    fn purge_mask(&self, signals: &DaySignals, windows: &SampleWindows, ceiling: f64) -> QcResult<Mask> {
        let temperature_flat = FlatRegionDetector::new(windows.flat, self.config.temperature_std_threshold)?;
        let humidity_flat = FlatRegionDetector::new(windows.flat, self.config.humidity_std_threshold)?;
        Ok(detectors::purge_mask(
            signals.temperature(),
            signals.humidity(),
            &temperature_flat,
            &humidity_flat,
            &SaturationFilter::new(ceiling),
        ))
    }
}
