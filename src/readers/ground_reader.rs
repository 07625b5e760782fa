use std::path::Path;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::IrradianceSample;
use crate::utils::parse_utc_timestamp;

/// Timestamp column in the quality-controlled ground files.
const TIME_COLUMN: &str = "Datetime (UTC)";

/// QC-filtered ground measurements plus the row counts the filter saw,
/// for reporting.
#[derive(Debug)]
pub struct GroundSeries {
    pub samples: Vec<IrradianceSample>,
    pub total_rows: usize,
    pub kept_rows: usize,
}

/// Reader for flagged ground measurement files
/// (`QC_<location>_<year>_flagged.csv`).
///
/// A row survives only when the configured flag columns that exist in the
/// file sum to zero; a missing or unparseable flag cell contributes
/// nothing to the sum.
pub struct GroundReader {
    flag_columns: Vec<String>,
}

impl GroundReader {
    pub fn new(flag_columns: &[String]) -> Self {
        Self {
            flag_columns: flag_columns.to_vec(),
        }
    }

    pub fn read(&self, path: &Path) -> Result<GroundSeries> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| ProcessingError::MissingColumn {
                column: name.to_string(),
                file: path.display().to_string(),
            })
        };

        let time_index = require(TIME_COLUMN)?;
        let ghi_index = require("GHI")?;
        let dhi_index = require("DHI")?;
        let dni_index = require("DNI")?;
        let flag_indices: Vec<usize> = self
            .flag_columns
            .iter()
            .filter_map(|name| find(name))
            .collect();

        let mut samples = Vec::new();
        let mut total_rows = 0usize;
        let mut dropped_time = 0usize;

        for record in reader.records() {
            let record = record?;
            total_rows += 1;

            let Some(time) = record.get(time_index).and_then(parse_utc_timestamp) else {
                dropped_time += 1;
                continue;
            };

            let flag_sum: f64 = flag_indices
                .iter()
                .map(|&index| {
                    record
                        .get(index)
                        .and_then(|field| field.trim().parse::<f64>().ok())
                        .unwrap_or(0.0)
                })
                .sum();
            if flag_sum != 0.0 {
                continue;
            }

            samples.push(IrradianceSample {
                time,
                ghi: parse_value(&record, ghi_index),
                dhi: parse_value(&record, dhi_index),
                dni: parse_value(&record, dni_index),
            });
        }

        if dropped_time > 0 {
            debug!(
                "dropped {} rows with unparseable timestamps from '{}'",
                dropped_time,
                path.display()
            );
        }

        Ok(GroundSeries {
            kept_rows: samples.len(),
            total_rows,
            samples,
        })
    }
}

fn parse_value(record: &csv::StringRecord, index: usize) -> f64 {
    record
        .get(index)
        .and_then(|field| field.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompareConfig;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn reader() -> GroundReader {
        GroundReader::new(&CompareConfig::default_flag_columns())
    }

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_flagged_rows_are_dropped() {
        let file = write_csv(
            "Datetime (UTC),GHI,DHI,DNI,flag_ghi,flag_dhi\n\
             2024-01-01 04:00:00,600,200,300,0,0\n\
             2024-01-01 04:10:00,620,210,310,1,0\n\
             2024-01-01 04:20:00,640,220,320,0,2\n",
        );

        let series = reader().read(file.path()).unwrap();
        assert_eq!(series.total_rows, 3);
        assert_eq!(series.kept_rows, 1);
        assert_eq!(series.samples[0].ghi, 600.0);
    }

    #[test]
    fn test_only_present_flag_columns_are_consulted() {
        // no flag columns at all: nothing is filtered
        let file = write_csv(
            "Datetime (UTC),GHI,DHI,DNI\n\
             2024-01-01 04:00:00,600,200,300\n",
        );

        let series = reader().read(file.path()).unwrap();
        assert_eq!(series.kept_rows, 1);
    }

    #[test]
    fn test_aware_timestamps_convert_to_utc() {
        let file = write_csv(
            "Datetime (UTC),GHI,DHI,DNI\n\
             2024-01-01T11:00:00+07:00,600,200,300\n",
        );

        let series = reader().read(file.path()).unwrap();
        assert_eq!(
            series.samples[0].time,
            Utc.with_ymd_and_hms(2024, 1, 1, 4, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_component_column_is_named() {
        let file = write_csv("Datetime (UTC),GHI,DHI\n2024-01-01 04:00:00,600,200\n");
        let err = reader().read(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::MissingColumn { column, .. } if column == "DNI"
        ));
    }
}
