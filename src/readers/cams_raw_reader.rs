use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{RawRow, RawTimeSeries};
use crate::utils::parse_utc_timestamp;

/// Column holding the `start/end` observation interval in the expert CSV
/// format.
const OBSERVATION_PERIOD: &str = "Observation period";

/// Reader for the raw CAMS `csv_expert` download: metadata and the header
/// row arrive as `#`-prefixed comment lines, data rows are
/// semicolon-delimited.
pub struct CamsRawReader;

impl CamsRawReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, path: &Path) -> Result<RawTimeSeries> {
        // Header inspection uses its own scoped handle; the data pass
        // below reopens the file.
        let header_line = {
            let file = File::open(path)?;
            let reader = BufReader::new(file);
            let mut header = None;
            for line in reader.lines() {
                let line = line?;
                if line.starts_with('#') {
                    // the last comment line before data names the columns
                    header = Some(line);
                } else {
                    break;
                }
            }
            header.ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "no comment header line found in '{}'",
                    path.display()
                ))
            })?
        };

        let column_names: Vec<String> = header_line
            .trim_start_matches('#')
            .trim()
            .split(';')
            .map(|col| col.trim().to_string())
            .collect();

        let period_index = column_names
            .iter()
            .position(|col| col == OBSERVATION_PERIOD)
            .ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "column '{OBSERVATION_PERIOD}' missing from header of '{}'",
                    path.display()
                ))
            })?;

        let columns: Vec<String> = column_names
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != period_index)
            .map(|(_, name)| name.clone())
            .collect();

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut rows = Vec::new();
        let mut dropped = 0usize;

        for line in reader.lines() {
            let line = line?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(';').collect();
            let period = fields.get(period_index).copied().unwrap_or("");
            // the interval start stands in for the sample timestamp
            let start = period.split('/').next().unwrap_or("");
            let Some(time) = parse_utc_timestamp(start) else {
                dropped += 1;
                continue;
            };

            let values = fields
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != period_index)
                .map(|(_, field)| field.trim().parse::<f64>().ok())
                .collect();

            rows.push(RawRow { time, values });
        }

        if dropped > 0 {
            debug!(
                "dropped {} rows with unparseable timestamps from '{}'",
                dropped,
                path.display()
            );
        }

        Ok(RawTimeSeries { columns, rows })
    }
}

impl Default for CamsRawReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_raw(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_read_expert_format() {
        let file = write_raw(
            "# CAMS solar radiation time series\n\
             # Latitude: -6.6; Longitude: 106.8\n\
             # Observation period;GHI;DHI;BNI\n\
             2024-01-01T00:00:00.0/2024-01-01T00:01:00.0;0.1;0.05;0.0\n\
             2024-01-01T00:01:00.0/2024-01-01T00:02:00.0;0.2;0.08;0.0\n",
        );

        let series = CamsRawReader::new().read(file.path()).unwrap();
        assert_eq!(series.columns, vec!["GHI", "DHI", "BNI"]);
        assert_eq!(series.rows.len(), 2);
        assert_eq!(
            series.rows[0].time,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(series.rows[0].values, vec![Some(0.1), Some(0.05), Some(0.0)]);
    }

    #[test]
    fn test_last_comment_line_is_header() {
        let file = write_raw(
            "# metadata that looks;like;a;header\n\
             # Observation period;GHI\n\
             2024-01-01T00:00:00.0/2024-01-01T00:01:00.0;1.5\n",
        );

        let series = CamsRawReader::new().read(file.path()).unwrap();
        assert_eq!(series.columns, vec!["GHI"]);
        assert_eq!(series.rows[0].values, vec![Some(1.5)]);
    }

    #[test]
    fn test_bad_timestamp_rows_are_dropped() {
        let file = write_raw(
            "# Observation period;GHI\n\
             not-a-time/also-not;1.0\n\
             2024-01-01T00:00:00.0/2024-01-01T00:01:00.0;2.0\n",
        );

        let series = CamsRawReader::new().read(file.path()).unwrap();
        assert_eq!(series.rows.len(), 1);
        assert_eq!(series.rows[0].values, vec![Some(2.0)]);
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let file = write_raw("2024-01-01T00:00:00.0/2024-01-01T00:01:00.0;1.0\n");
        assert!(matches!(
            CamsRawReader::new().read(file.path()),
            Err(ProcessingError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_comments_only_file_is_empty() {
        let file = write_raw("# Observation period;GHI\n");
        let series = CamsRawReader::new().read(file.path()).unwrap();
        assert!(series.is_empty());
    }
}
