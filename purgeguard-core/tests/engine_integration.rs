//! End-to-end tests of the day pass
//!
//! Each test builds a synthetic one-minute day with purge holds and dips at
//! known indices and checks the engine's selected purges and final flags.

mod common;

use common::{once_daily_date, twice_daily_date, SyntheticDay};
use purgeguard_core::{
    CandidateShaping, DayInputs, DaySignals, FlagValue, IndexInterval, PurgeConfig, PurgeEngine, QcError,
};

fn engine() -> PurgeEngine {
    PurgeEngine::with_defaults().unwrap()
}

#[test]
fn flattest_candidate_wins_after_cutover() {
    let signals = SyntheticDay::new(once_daily_date())
        .with_purge(180..200)
        .with_quiet_spell(800..820)
        .build();
    let report = engine().process(&signals, &DayInputs::default()).unwrap();

    assert_eq!(report.candidates.len(), 2);
    assert_eq!(report.purge_intervals, vec![IndexInterval::new(180, 201)]);
    assert!(!report.fallback_added);

    let t = report.temperature_flags();
    let rh = report.humidity_flags();
    assert_eq!(t.count(FlagValue::Purge), 21);
    assert_eq!(rh.count(FlagValue::Purge), 21);
    assert_eq!(rh.count(FlagValue::RhRecovery), 6);
    for i in 201..207 {
        assert_eq!(rh.get(i), Some(FlagValue::RhRecovery));
        assert_eq!(t.get(i), Some(FlagValue::Good));
    }
    // the quiet spell is left alone
    assert_eq!(t.get(810), Some(FlagValue::Good));
}

#[test]
fn two_candidates_kept_before_cutover() {
    let signals = SyntheticDay::new(twice_daily_date())
        .with_purge(180..200)
        .with_quiet_spell(800..820)
        .build();
    let report = engine().process(&signals, &DayInputs::default()).unwrap();

    assert_eq!(
        report.purge_intervals,
        vec![IndexInterval::new(180, 201), IndexInterval::new(800, 821)]
    );
    assert!(!report.fallback_added);
    assert_eq!(report.purge_times.len(), 2);
}

#[test]
fn lone_morning_purge_gets_afternoon_twin() {
    let signals = SyntheticDay::new(twice_daily_date()).with_purge(180..200).build();
    let report = engine().process(&signals, &DayInputs::default()).unwrap();

    assert!(report.fallback_added);
    assert_eq!(
        report.purge_intervals,
        vec![IndexInterval::new(180, 201), IndexInterval::new(900, 921)]
    );
    assert_eq!(report.purge_times[1].start, common::at(twice_daily_date(), 15, 0));
    assert_eq!(report.temperature_flags().count(FlagValue::Purge), 42);
}

#[test]
fn lone_evening_purge_gets_morning_twin() {
    let signals = SyntheticDay::new(twice_daily_date()).with_purge(1000..1020).build();
    let report = engine().process(&signals, &DayInputs::default()).unwrap();

    assert!(report.fallback_added);
    let (twin, purge) = (report.purge_intervals[0], report.purge_intervals[1]);
    assert_eq!(purge.start, 1000);
    assert_eq!(twin.start, 280);
    assert_eq!(twin.len(), purge.len());
}

#[test]
fn no_purge_on_a_noisy_day() {
    let signals = SyntheticDay::new(once_daily_date()).build();
    let report = engine().process(&signals, &DayInputs::default()).unwrap();

    assert!(report.candidates.is_empty());
    assert!(report.purge_intervals.is_empty());
    assert!(report.dips.is_empty());
    assert_eq!(report.temperature_flags().count(FlagValue::Good), signals.len());
    assert_eq!(report.humidity_flags().count(FlagValue::Good), signals.len());
}

#[test]
fn saturated_hold_is_not_a_purge() {
    let signals = SyntheticDay::new(once_daily_date())
        .with_humidity_offset(20.0)
        .with_purge(1075..1095)
        .build();
    assert!(signals.humidity()[1080] >= 99.5);

    let report = engine().process(&signals, &DayInputs::default()).unwrap();
    assert!(report.purge_intervals.is_empty());
}

#[test]
fn dips_without_reference_are_all_accepted() {
    let signals = SyntheticDay::new(once_daily_date())
        .with_purge(180..200)
        .with_dip(200)
        .with_dip(900)
        .build();
    let report = engine().process(&signals, &DayInputs::default()).unwrap();

    let starts: Vec<usize> = report.dips.iter().map(|d| d.start).collect();
    assert_eq!(starts, vec![200, 201, 900, 901]);
    assert_eq!(report.accepted_dips, report.dips);
    assert_eq!(report.consistent, None);

    let rh = report.humidity_flags();
    assert_eq!(rh.get(900), Some(FlagValue::Good));
    for i in 901..=903 {
        assert_eq!(rh.get(i), Some(FlagValue::RhRecovery));
    }
    assert_eq!(rh.get(904), Some(FlagValue::Good));
    assert_eq!(report.temperature_flags().get(902), Some(FlagValue::Good));
}

#[test]
fn pre_dip_stretch_flagged_when_enabled() {
    let config = PurgeConfig {
        flag_before_dip_as_purge: true,
        ..PurgeConfig::default()
    };
    let engine = PurgeEngine::new(config).unwrap();
    let signals = SyntheticDay::new(once_daily_date()).with_dip(900).build();
    let report = engine.process(&signals, &DayInputs::default()).unwrap();

    assert!(report.purge_intervals.is_empty());
    let t = report.temperature_flags();
    let rh = report.humidity_flags();
    // the overlapping pair starting at 901 also covers sample 900
    for i in 892..901 {
        assert_eq!(t.get(i), Some(FlagValue::Purge));
        assert_eq!(rh.get(i), Some(FlagValue::Purge));
    }
    assert_eq!(t.get(891), Some(FlagValue::Good));
    assert_eq!(t.get(901), Some(FlagValue::Good));
    assert_eq!(rh.get(901), Some(FlagValue::RhRecovery));
}

#[test]
fn low_temperature_pass_is_optional() {
    let signals = SyntheticDay::new(once_daily_date()).build();
    let cold = |report: &purgeguard_core::DayReport| report.temperature_flags().count(FlagValue::Bad);

    let report = engine().process(&signals, &DayInputs::default()).unwrap();
    assert_eq!(cold(&report), 0);

    let config = PurgeConfig {
        low_temperature_threshold: Some(280.0),
        ..PurgeConfig::default()
    };
    let report = PurgeEngine::new(config).unwrap().process(&signals, &DayInputs::default()).unwrap();
    let below = signals.temperature().iter().filter(|&&t| t < 280.0).count();
    assert!(below > 0);
    assert_eq!(cold(&report), below);
    assert_eq!(report.humidity_flags().count(FlagValue::Bad), below);
}

#[test]
fn filter_and_expand_drops_short_runs() {
    let config = PurgeConfig {
        candidate_shaping: CandidateShaping::FilterAndExpand,
        min_purge_minutes: 30.0,
        ..PurgeConfig::default()
    };
    let signals = SyntheticDay::new(once_daily_date()).with_purge(180..200).build();
    let report = PurgeEngine::new(config).unwrap().process(&signals, &DayInputs::default()).unwrap();
    assert!(report.purge_intervals.is_empty());
}

#[test]
fn unsorted_input_is_sorted() {
    let day = SyntheticDay::new(once_daily_date()).with_purge(180..200);
    let (temperature, humidity) = day.channels();
    let mut timestamps = day.timestamps();

    // reverse all three channels together
    timestamps.reverse();
    let temperature: Vec<f64> = temperature.into_iter().rev().collect();
    let humidity: Vec<f64> = humidity.into_iter().rev().collect();

    let signals = DaySignals::new(timestamps, temperature, humidity).unwrap();
    let report = engine().process(&signals, &DayInputs::default()).unwrap();
    assert_eq!(report.purge_intervals, vec![IndexInterval::new(180, 201)]);
}

#[test]
fn misaligned_channels_are_rejected() {
    let day = SyntheticDay::new(once_daily_date());
    let (temperature, mut humidity) = day.channels();
    humidity.pop();

    assert_eq!(
        DaySignals::new(day.timestamps(), temperature, humidity),
        Err(QcError::LengthMismatch {
            channel: "humidity",
            expected: 1440,
            actual: 1439,
        })
    );
}

#[test]
fn coarse_sampling_is_a_window_error() {
    let t0 = once_daily_date().and_hms_opt(0, 0, 0).unwrap();
    let timestamps = (0..144).map(|i| t0 + chrono::Duration::minutes(10 * i)).collect();
    let signals = DaySignals::new(timestamps, vec![280.0; 144], vec![60.0; 144]).unwrap();

    assert!(matches!(
        engine().process(&signals, &DayInputs::default()),
        Err(QcError::WindowTooShort { field: "window_minutes", .. })
    ));
}
