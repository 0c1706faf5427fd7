use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::consts::FILE_STAMP_FORMAT;

/// Naive layouts tried after RFC 3339, most specific first
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Parse a telemetry timestamp. Offsets are dropped and the wall-clock time kept.
pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub(crate) fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Suffix used for artifact file names
pub(crate) fn file_stamp(at: NaiveDateTime) -> String {
    at.format(FILE_STAMP_FORMAT).to_string()
}
