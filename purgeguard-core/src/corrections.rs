//! Correction listings
//!
//! Operators mark known-bad stretches in plain text files, one per line:
//!
//! ```text
//! 20170514 101500 103000 BADDATA
//! ```
//!
//! Date, first second and last second (both inclusive, same day), then the
//! keyword. Lines with another shape or keyword are comments or other
//! correction kinds and are skipped. A `BADDATA` line with an unreadable date
//! or time is an error carrying its 1-based line number.
//!
//! ```rust
//! use purgeguard_core::corrections::parse_bad_intervals;
//!
//! let listing = "# site notes\n20170514 101500 103000 BADDATA\n";
//! let intervals = parse_bad_intervals(listing.as_bytes())?;
//! assert_eq!(intervals.len(), 1);
//! # Ok::<(), purgeguard_core::QcError>(())
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use chrono::{NaiveDate, NaiveTime};

use crate::{
    errors::{QcError, QcResult},
    intervals::TimeInterval,
};

const BAD_DATA_KEYWORD: &str = "BADDATA";
const FIELDS_PER_LINE: usize = 4;

/// Read `BADDATA` spans from any buffered reader
pub fn parse_bad_intervals<R: BufRead>(reader: R) -> QcResult<Vec<TimeInterval>> {
    let mut intervals = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != FIELDS_PER_LINE || fields[3] != BAD_DATA_KEYWORD {
            skipped += 1;
            continue;
        }
        intervals.push(parse_fields(&fields, index + 1)?);
    }

    log::debug!(
        "corrections: {} bad-data spans, {} other lines",
        intervals.len(),
        skipped
    );
    Ok(intervals)
}

/// Read `BADDATA` spans from a file
pub fn read_bad_intervals<P: AsRef<Path>>(path: P) -> QcResult<Vec<TimeInterval>> {
    let file = File::open(path)?;
    parse_bad_intervals(BufReader::new(file))
}

fn parse_fields(fields: &[&str], line: usize) -> QcResult<TimeInterval> {
    let error = |reason| QcError::CorrectionParse { line, reason };

    let date = NaiveDate::parse_from_str(fields[0], "%Y%m%d").map_err(|_| error("invalid date"))?;
    let first = NaiveTime::parse_from_str(fields[1], "%H%M%S").map_err(|_| error("invalid start time"))?;
    let last = NaiveTime::parse_from_str(fields[2], "%H%M%S").map_err(|_| error("invalid end time"))?;
    if last < first {
        return Err(error("end time precedes start time"));
    }

    Ok(TimeInterval::closed(date.and_time(first), date.and_time(last)))
}
