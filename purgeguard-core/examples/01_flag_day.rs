//! Flagging One Day Example
//!
//! Builds a synthetic one-minute day with a purge hold at 03:00 and a
//! humidity dip right after it, then runs the engine twice: once on its own
//! and once with the previous day as reference.
//!
//! ## What You'll Learn
//!
//! - Building `DaySignals` from raw columns
//! - Processing a day with the default configuration
//! - Feeding one day's flags into the next day's dip gate
//! - Reading a correction listing
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_flag_day
//! ```

use chrono::{Duration, NaiveDate};
use purgeguard_core::{
    corrections::parse_bad_intervals, DayInputs, DaySignals, FlagValue, PurgeEngine, QcResult, Reference,
};

fn synthetic_day(date: NaiveDate, purge_start: usize) -> QcResult<DaySignals> {
    let n = 1440;
    let t0 = date.and_hms_opt(0, 0, 0).expect("midnight exists");
    let timestamps = (0..n).map(|i| t0 + Duration::minutes(i as i64)).collect();

    let mut temperature: Vec<f64> = (0..n)
        .map(|i| 283.0 + 4.0 * (i as f64 / n as f64 * std::f64::consts::TAU).sin() + if i % 2 == 0 { 0.15 } else { -0.15 })
        .collect();
    let mut humidity: Vec<f64> = (0..n)
        .map(|i| 70.0 - 10.0 * (i as f64 / n as f64 * std::f64::consts::TAU).sin() + [0.0, 0.3, -0.3][i % 3])
        .collect();

    // 20-minute purge hold, then a 4 %RH dip that recovers in four minutes
    let purge_end = purge_start + 20;
    let (t, rh) = (temperature[purge_start], humidity[purge_start]);
    temperature[purge_start..purge_end].fill(t);
    humidity[purge_start..purge_end].fill(rh);
    for (k, offset) in [-4.0, -3.5, -2.0, -1.0, 0.2].into_iter().enumerate() {
        humidity[purge_end + k] = rh + offset;
    }

    DaySignals::new(timestamps, temperature, humidity)
}

fn main() -> QcResult<()> {
    println!("PurgeGuard Day Flagging Example");
    println!("===============================\n");

    let engine = PurgeEngine::with_defaults()?;
    let yesterday = NaiveDate::from_ymd_opt(2019, 7, 2).expect("valid date");
    let today = NaiveDate::from_ymd_opt(2019, 7, 3).expect("valid date");

    // Day 1: no reference, every dip is accepted
    let first = synthetic_day(yesterday, 180)?;
    let first_report = engine.process(&first, &DayInputs::default())?;
    println!("{}:", yesterday);
    for purge in &first_report.purge_times {
        println!("  purge {} .. {}", purge.start.time(), purge.end.time());
    }
    println!("  {} dips, all accepted", first_report.dips.len());

    // Day 2: yesterday's flags set the expected window; operators marked 10:00-10:09
    let listing = "20190703 100000 100900 BADDATA\n";
    let inputs = DayInputs {
        reference: Some(Reference::Flags {
            timestamps: first.timestamps().to_vec(),
            temperature_flags: first_report.temperature_flags().clone(),
        }),
        bad_humidity: parse_bad_intervals(listing.as_bytes())?,
        ..Default::default()
    };
    let second = synthetic_day(today, 190)?;
    let report = engine.process(&second, &inputs)?;

    println!("\n{}:", today);
    println!("  consistent with {}: {:?}", yesterday, report.consistent);
    println!("  {} of {} dips accepted", report.accepted_dips.len(), report.dips.len());

    println!("\nFlag counts:");
    for flag in FlagValue::ALL {
        println!(
            "  {:<32} T {:>5}   RH {:>5}",
            flag.meaning(),
            report.temperature_flags().count(flag),
            report.humidity_flags().count(flag)
        );
    }

    Ok(())
}
