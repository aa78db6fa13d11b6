//! Correction listings read from disk and applied to a day

mod common;

use std::io::Write;

use common::{at, once_daily_date, SyntheticDay};
use purgeguard_core::{corrections::read_bad_intervals, DayInputs, FlagValue, PurgeEngine, QcError};
use tempfile::NamedTempFile;

#[test]
fn listing_marks_humidity_bad() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# humidity corrections").unwrap();
    writeln!(file, "20190703 100000 100900 BADDATA").unwrap();
    writeln!(file, "20190703 120000 120500 OFFSET").unwrap();
    file.flush().unwrap();

    let bad = read_bad_intervals(file.path()).unwrap();
    assert_eq!(bad.len(), 1);
    assert_eq!(bad[0].start, at(once_daily_date(), 10, 0));

    let signals = SyntheticDay::new(once_daily_date()).with_purge(180..200).build();
    let inputs = DayInputs {
        bad_humidity: bad,
        ..Default::default()
    };
    let report = PurgeEngine::with_defaults().unwrap().process(&signals, &inputs).unwrap();

    let rh = report.humidity_flags();
    assert_eq!(rh.count(FlagValue::Bad), 10);
    assert_eq!(rh.get(600), Some(FlagValue::Bad));
    assert_eq!(rh.get(609), Some(FlagValue::Bad));
    assert_eq!(rh.get(610), Some(FlagValue::Good));
    assert_eq!(report.temperature_flags().count(FlagValue::Bad), 0);
}

#[test]
fn bad_data_overrides_purge() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "20190703 030500 030900 BADDATA").unwrap();
    file.flush().unwrap();

    let bad = read_bad_intervals(file.path()).unwrap();
    let signals = SyntheticDay::new(once_daily_date()).with_purge(180..200).build();
    let inputs = DayInputs {
        bad_temperature: bad,
        ..Default::default()
    };
    let report = PurgeEngine::with_defaults().unwrap().process(&signals, &inputs).unwrap();

    let t = report.temperature_flags();
    assert_eq!(t.get(184), Some(FlagValue::Purge));
    for i in 185..=189 {
        assert_eq!(t.get(i), Some(FlagValue::Bad));
    }
    assert_eq!(t.get(190), Some(FlagValue::Purge));
    assert_eq!(report.humidity_flags().get(187), Some(FlagValue::Purge));
}

#[test]
fn malformed_line_reports_its_number() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "20190703 100000 100900 BADDATA").unwrap();
    writeln!(file, "20190703 1000xx 100900 BADDATA").unwrap();
    file.flush().unwrap();

    assert_eq!(
        read_bad_intervals(file.path()),
        Err(QcError::CorrectionParse {
            line: 2,
            reason: "invalid start time",
        })
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_bad_intervals(dir.path().join("absent.txt"));
    assert_eq!(
        result,
        Err(QcError::Io {
            kind: std::io::ErrorKind::NotFound,
        })
    );
}
