//! Flag Compositing
//!
//! ## Precedence
//!
//! Both channels start as `Good`. Phases run in a fixed order and a later
//! phase overwrites an earlier one wherever they overlap:
//!
//! | phase | source                    | temperature | humidity      |
//! |-------|---------------------------|-------------|---------------|
//! | 1     | selected purges           | `Purge`     | `Purge`       |
//! | 2     | recovery after each purge |             | `RhRecovery`  |
//! | 3     | accepted dips             | (`Purge`)   | `RhRecovery`  |
//! | 4     | external bad data         | `Bad`       | `Bad`         |
//! | 5     | optional low temperature  | `Bad`       | `Bad`         |
//!
//! A dip flags humidity over `start + 1 .. end`; the dip's first sample is
//! left alone. With the pre-dip toggle on, the stretch just before the dip is
//! set to `Purge` on both channels before the dip itself is flagged.
//!
//! Recovery always follows every purge, so a recovery window can overwrite
//! the start of a purge that follows closely.

use chrono::Duration;

use crate::{
    config::{PurgeConfig, SampleWindows},
    cross_day::ExpectedWindow,
    detectors::{BelowThreshold, Dip},
    flags::{FlagArray, FlagValue},
    intervals::{IndexInterval, IntervalCodec, TimeInterval},
    time::{time_of_day, Timestamp},
    traits::{Mask, MaskDetector},
};

/// Flags of both channels for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFlags {
    /// Temperature flags
    pub temperature: FlagArray,
    /// Humidity flags
    pub humidity: FlagArray,
}

impl ChannelFlags {
    /// `len` samples per channel, all `Good`
    pub fn good(len: usize) -> Self {
        Self {
            temperature: FlagArray::good(len),
            humidity: FlagArray::good(len),
        }
    }

    /// Set `start..end` to `flag` on both channels
    pub fn fill_both(&mut self, start: usize, end: usize, flag: FlagValue) {
        self.temperature.fill(start, end, flag);
        self.humidity.fill(start, end, flag);
    }

    /// Set every marked sample to `flag` on both channels
    pub fn apply_mask_both(&mut self, mask: &[bool], flag: FlagValue) {
        self.temperature.apply_mask(mask, flag);
        self.humidity.apply_mask(mask, flag);
    }
}

/// Everything the compositor writes, for one record
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeInputs<'a> {
    /// Selected purge intervals
    pub purges: &'a [IndexInterval],
    /// Dips that passed the gate
    pub dips: &'a [Dip],
    /// External bad temperature spans
    pub bad_temperature: &'a [TimeInterval],
    /// External bad humidity spans
    pub bad_humidity: &'a [TimeInterval],
}

/// Writes purge, recovery, dip and bad-data intervals into flag arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagCompositor {
    recovery: usize,
    dip_buffer: Option<usize>,
}

impl FlagCompositor {
    /// `recovery` samples after each purge; `dip_buffer` samples before each dip if set
    pub fn new(recovery: usize, dip_buffer: Option<usize>) -> Self {
        Self { recovery, dip_buffer }
    }

    /// Compositor from configuration and the record's resolved windows
    pub fn from_windows(config: &PurgeConfig, windows: &SampleWindows) -> Self {
        let dip_buffer = config.flag_before_dip_as_purge.then_some(windows.dip_buffer);
        Self::new(windows.recovery, dip_buffer)
    }

    /// Build both channels' flags from scratch
    pub fn composite(&self, codec: &IntervalCodec<'_>, len: usize, inputs: &CompositeInputs<'_>) -> ChannelFlags {
        let mut flags = ChannelFlags::good(len);

        for purge in inputs.purges {
            flags.fill_both(purge.start, purge.end, FlagValue::Purge);
        }
        for purge in inputs.purges {
            flags
                .humidity
                .fill(purge.end, purge.end.saturating_add(self.recovery), FlagValue::RhRecovery);
        }

        for dip in inputs.dips {
            if let Some(buffer) = self.dip_buffer {
                flags.fill_both(dip.start.saturating_sub(buffer), dip.start, FlagValue::Purge);
            }
            flags.humidity.fill(dip.start + 1, dip.end, FlagValue::RhRecovery);
        }

        flags
            .temperature
            .apply_mask(&codec.materialize_times(inputs.bad_temperature), FlagValue::Bad);
        flags
            .humidity
            .apply_mask(&codec.materialize_times(inputs.bad_humidity), FlagValue::Bad);

        log::debug!(
            "composited {} purge and {} recovery samples",
            flags.temperature.count(FlagValue::Purge),
            flags.humidity.count(FlagValue::RhRecovery),
        );
        flags
    }
}

/// Manual mode: flag purges by time of day
///
/// Samples whose time of day is in `[start, end)` of a window become `Purge`
/// on both channels, and `[end, end + recovery)` becomes `RhRecovery` on
/// humidity. Windows are applied in order.
pub fn apply_time_of_day_windows(
    flags: &mut ChannelFlags,
    timestamps: &[Timestamp],
    windows: &[ExpectedWindow],
    recovery: Duration,
) {
    for window in windows {
        let purge = tod_mask(timestamps, window.start, window.end);
        let after = tod_mask(timestamps, window.end, window.end + recovery);
        flags.apply_mask_both(&purge, FlagValue::Purge);
        flags.humidity.apply_mask(&after, FlagValue::RhRecovery);
    }
}

fn tod_mask(timestamps: &[Timestamp], start: Duration, end: Duration) -> Mask {
    timestamps
        .iter()
        .map(|&ts| {
            let tod = time_of_day(ts);
            start <= tod && tod < end
        })
        .collect()
}

/// Reset purge flags, and humidity recovery flags, to `Good`
pub fn clear_purge_flags(flags: &mut ChannelFlags) {
    flags.temperature.reset(&[FlagValue::Purge]);
    flags.humidity.reset(&[FlagValue::Purge, FlagValue::RhRecovery]);
}

/// Flag samples of `values` below `threshold` as `Bad` on both channels
pub fn flag_below(flags: &mut ChannelFlags, values: &[f64], threshold: f64) {
    let below = BelowThreshold::new(threshold).detect(values);
    let count = below.iter().filter(|&&b| b).count();
    if count > 0 {
        log::debug!("{} samples below {}", count, threshold);
    }
    flags.apply_mask_both(&below, FlagValue::Bad);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::defaults::HISTORICAL_LOW_TEMPERATURE_K, time::SamplingInterval};
    use chrono::NaiveDate;

    fn minutes(n: usize) -> Vec<Timestamp> {
        let t0 = NaiveDate::from_ymd_opt(2017, 8, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n).map(|i| t0 + Duration::minutes(i as i64)).collect()
    }

    fn sampling() -> SamplingInterval {
        SamplingInterval::from_seconds(60.0).unwrap()
    }

    #[test]
    fn purge_then_recovery() {
        let ts = minutes(30);
        let codec = IntervalCodec::new(&ts, sampling());
        let purges = [IndexInterval::new(5, 10)];
        let inputs = CompositeInputs {
            purges: &purges,
            ..Default::default()
        };
        let flags = FlagCompositor::new(3, None).composite(&codec, ts.len(), &inputs);

        assert_eq!(flags.temperature.codes()[4..14], [1, 3, 3, 3, 3, 3, 1, 1, 1, 1]);
        assert_eq!(flags.humidity.codes()[4..14], [1, 3, 3, 3, 3, 3, 4, 4, 4, 1]);
    }

    #[test]
    fn recovery_overrides_following_purge() {
        let ts = minutes(30);
        let codec = IntervalCodec::new(&ts, sampling());
        let purges = [IndexInterval::new(5, 10), IndexInterval::new(11, 15)];
        let inputs = CompositeInputs {
            purges: &purges,
            ..Default::default()
        };
        let flags = FlagCompositor::new(3, None).composite(&codec, ts.len(), &inputs);

        assert_eq!(flags.humidity.get(11), Some(FlagValue::RhRecovery));
        assert_eq!(flags.temperature.get(11), Some(FlagValue::Purge));
    }

    #[test]
    fn dip_leaves_its_start_untouched() {
        let ts = minutes(100);
        let codec = IntervalCodec::new(&ts, sampling());
        let dips = [Dip { start: 50, end: 55, drop: 4.0 }];
        let inputs = CompositeInputs {
            dips: &dips,
            ..Default::default()
        };
        let flags = FlagCompositor::new(6, None).composite(&codec, ts.len(), &inputs);

        assert_eq!(flags.humidity.get(50), Some(FlagValue::Good));
        for i in 51..=54 {
            assert_eq!(flags.humidity.get(i), Some(FlagValue::RhRecovery));
        }
        assert_eq!(flags.humidity.get(55), Some(FlagValue::Good));
        assert_eq!(flags.temperature.count(FlagValue::Good), 100);
    }

    #[test]
    fn pre_dip_buffer_is_purge() {
        let ts = minutes(100);
        let codec = IntervalCodec::new(&ts, sampling());
        let dips = [Dip { start: 5, end: 9, drop: 4.0 }];
        let inputs = CompositeInputs {
            dips: &dips,
            ..Default::default()
        };
        let flags = FlagCompositor::new(6, Some(8)).composite(&codec, ts.len(), &inputs);

        assert_eq!(flags.temperature.codes()[..6], [3, 3, 3, 3, 3, 1]);
        assert_eq!(flags.humidity.codes()[..10], [3, 3, 3, 3, 3, 1, 4, 4, 4, 1]);
    }

    #[test]
    fn bad_data_wins_per_channel() {
        let ts = minutes(30);
        let codec = IntervalCodec::new(&ts, sampling());
        let purges = [IndexInterval::new(5, 10)];
        let bad_rh = [TimeInterval::closed(ts[8], ts[12])];
        let inputs = CompositeInputs {
            purges: &purges,
            bad_humidity: &bad_rh,
            ..Default::default()
        };
        let flags = FlagCompositor::new(3, None).composite(&codec, ts.len(), &inputs);

        assert_eq!(flags.humidity.codes()[7..14], [3, 2, 2, 2, 2, 2, 1]);
        assert_eq!(flags.temperature.codes()[7..11], [3, 3, 3, 1]);
    }

    #[test]
    fn time_of_day_windows_and_clearing() {
        let ts = minutes(60);
        let mut flags = ChannelFlags::good(ts.len());
        let windows = [ExpectedWindow::new(Duration::minutes(10), Duration::minutes(15))];
        apply_time_of_day_windows(&mut flags, &ts, &windows, Duration::minutes(2));

        assert_eq!(flags.temperature.count(FlagValue::Purge), 5);
        assert_eq!(flags.humidity.codes()[9..18], [1, 3, 3, 3, 3, 3, 4, 4, 1]);

        flags.humidity.fill(40, 41, FlagValue::Bad);
        clear_purge_flags(&mut flags);
        assert_eq!(flags.temperature.count(FlagValue::Good), 60);
        assert_eq!(flags.humidity.count(FlagValue::Good), 59);
        assert_eq!(flags.humidity.get(40), Some(FlagValue::Bad));
    }

    #[test]
    fn low_values_flag_both_channels() {
        let mut flags = ChannelFlags::good(4);
        flag_below(&mut flags, &[250.0, 244.0, 246.0, 230.0], HISTORICAL_LOW_TEMPERATURE_K);
        assert_eq!(flags.temperature.codes(), vec![1, 2, 1, 2]);
        assert_eq!(flags.humidity.codes(), vec![1, 2, 1, 2]);
    }
}
