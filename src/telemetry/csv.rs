use std::fmt::Write;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::consts::CSV_TIMESTAMP_FORMAT;
use crate::error::AppError;
use crate::utils::parse_timestamp;

use super::types::{LoadResult, Reading};

const TIMESTAMP_KEYWORDS: &[&str] = &["time", "date", "timestamp", "시간", "날짜"];
const VALUE_KEYWORDS: &[&str] = &["temp", "value", "temperature", "온도", "값"];

/// Split one CSV record, honouring `"` quoting and `""` escapes
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Pick (timestamp, value) column indexes: exact names, then keywords, then the first two columns
fn map_columns(header: &[String]) -> Option<(usize, usize)> {
    let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();

    let exact = |name: &str| names.iter().position(|n| n == name);
    if let (Some(ts), Some(value)) = (exact("timestamp"), exact("value")) {
        return Some((ts, value));
    }

    let by_keyword = |keywords: &[&str]| {
        names
            .iter()
            .position(|n| keywords.iter().any(|k| n.contains(k)))
    };
    if let (Some(ts), Some(value)) = (by_keyword(TIMESTAMP_KEYWORDS), by_keyword(VALUE_KEYWORDS))
        && ts != value
    {
        return Some((ts, value));
    }

    (names.len() >= 2).then_some((0, 1))
}

fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse CSV text into readings sorted by timestamp.
/// `input` names the origin in error messages.
pub(crate) fn parse_csv(content: &str, input: &str) -> Result<LoadResult, AppError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Err(AppError::NoReadings {
            input: input.to_string(),
        });
    };
    let header = split_record(header_line);
    let (ts_idx, value_idx) = map_columns(&header).ok_or_else(|| AppError::MissingColumns {
        input: input.to_string(),
    })?;

    let mut readings = Vec::new();
    let mut skipped = 0;
    for (line_no, line) in lines.enumerate() {
        let fields = split_record(line);
        let timestamp = fields.get(ts_idx).and_then(|s| parse_timestamp(s));
        let value = fields.get(value_idx).and_then(|s| parse_value(s));
        match timestamp.zip(value) {
            Some((timestamp, value)) => readings.push(Reading { timestamp, value }),
            None => {
                skipped += 1;
                debug!("{input}: skipping row {} ({line:?})", line_no + 2);
            }
        }
    }

    if readings.is_empty() {
        return Err(AppError::NoReadings {
            input: input.to_string(),
        });
    }
    readings.sort_by_key(|r| r.timestamp);

    Ok(LoadResult {
        readings,
        skipped,
        timestamp_column: header[ts_idx].trim().to_string(),
        value_column: header[value_idx].trim().to_string(),
    })
}

pub(crate) fn load_csv(path: &Path) -> Result<LoadResult, AppError> {
    let content = fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let result = parse_csv(&content, &path.display().to_string())?;
    debug!(
        "Loaded {} readings from {} ({} skipped, columns {}/{})",
        result.readings.len(),
        path.display(),
        result.skipped,
        result.timestamp_column,
        result.value_column
    );
    Ok(result)
}

/// Write readings as `timestamp,value` rows, one decimal place
pub(crate) fn write_csv(path: &Path, readings: &[Reading]) -> Result<(), AppError> {
    let mut out = String::from("timestamp,value\n");
    for r in readings {
        let _ = writeln!(out, "{},{:.1}", r.timestamp.format(CSV_TIMESTAMP_FORMAT), r.value);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| AppError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, out).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_record_handles_quotes() {
        assert_eq!(
            split_record(r#""2024-01-01 10:00:00","4""5",x"#),
            vec!["2024-01-01 10:00:00", "4\"5", "x"]
        );
        assert_eq!(split_record("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn parses_canonical_columns() {
        let csv = "timestamp,value\n2024-01-01 10:10:00,46.1\n2024-01-01 10:00:00,45.2\n";
        let result = parse_csv(csv, "test").unwrap();
        assert_eq!(result.readings.len(), 2);
        // sorted by time
        assert_eq!(result.readings[0].value, 45.2);
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn maps_columns_by_keyword() {
        let csv = "sensor,Measured Time,Pump Temperature\nA,2024-01-01 10:00:00,50.5\n";
        let result = parse_csv(csv, "test").unwrap();
        assert_eq!(result.timestamp_column, "Measured Time");
        assert_eq!(result.value_column, "Pump Temperature");
        assert_eq!(result.readings[0].value, 50.5);
    }

    #[test]
    fn value_keyword_alone_uses_first_two_columns() {
        let csv = "Measured At,Reading,Pump Temp\n2024-01-01 10:00:00,48.5,99.0\n";
        let result = parse_csv(csv, "test").unwrap();
        assert_eq!(result.timestamp_column, "Measured At");
        assert_eq!(result.value_column, "Reading");
        assert_eq!(result.readings[0].value, 48.5);
    }

    #[test]
    fn maps_korean_headers() {
        let csv = "시간,온도\n2024-01-01 10:00:00,61.0\n";
        let result = parse_csv(csv, "test").unwrap();
        assert_eq!(result.readings.len(), 1);
    }

    #[test]
    fn falls_back_to_first_two_columns() {
        let csv = "a,b,c\n2024-01-01 10:00:00,42,ignored\n";
        let result = parse_csv(csv, "test").unwrap();
        assert_eq!(result.timestamp_column, "a");
        assert_eq!(result.readings[0].value, 42.0);
    }

    #[test]
    fn single_column_is_rejected() {
        let err = parse_csv("only\n1\n", "one.csv").unwrap_err();
        assert!(matches!(err, AppError::MissingColumns { .. }));
    }

    #[test]
    fn unparsable_rows_are_skipped() {
        let csv = "\u{feff}timestamp,value\n2024-01-01 10:00:00,abc\nnot-a-date,50\n\n2024-01-01 10:10:00,NaN\n2024-01-01 10:20:00,51\n";
        let result = parse_csv(csv, "test").unwrap();
        assert_eq!(result.readings.len(), 1);
        assert_eq!(result.skipped, 3);
    }

    #[test]
    fn all_rows_bad_is_no_readings() {
        let err = parse_csv("timestamp,value\nx,y\n", "bad.csv").unwrap_err();
        assert!(matches!(err, AppError::NoReadings { .. }));
        let err = parse_csv("", "empty.csv").unwrap_err();
        assert!(matches!(err, AppError::NoReadings { .. }));
    }

    #[test]
    fn write_then_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let readings = parse_csv("timestamp,value\n2024-01-01 10:00:00,45.24\n", "t")
            .unwrap()
            .readings;
        write_csv(&path, &readings).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "timestamp,value\n2024-01-01 10:00:00,45.2\n");
        assert_eq!(load_csv(&path).unwrap().readings.len(), 1);
    }
}
