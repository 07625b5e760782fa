use std::path::Path;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{IrradianceSample, ModelSample};
use crate::utils::parse_utc_timestamp;

/// Optional cloud column emitted for the observed-cloud sky type.
const CLOUD_COLUMN: &str = "Cloud coverage";

/// Reader for the aggregated per-station CSV files
/// (`processed_10min_<station>_<sky type>.csv`). The source labels direct
/// normal irradiance `BNI`; it is renamed to `DNI` on the way in.
pub struct ProcessedReader;

struct ColumnMap {
    time: usize,
    ghi: usize,
    dhi: usize,
    bni: usize,
    cloud: Option<usize>,
}

impl ProcessedReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the irradiance components only (compile pipeline).
    pub fn read_irradiance(&self, path: &Path) -> Result<Vec<IrradianceSample>> {
        Ok(self
            .read_model(path)?
            .into_iter()
            .map(|sample| IrradianceSample {
                time: sample.time,
                ghi: sample.ghi,
                dhi: sample.dhi,
                dni: sample.dni,
            })
            .collect())
    }

    /// Read irradiance plus cloud cover when present (compare pipeline).
    pub fn read_model(&self, path: &Path) -> Result<Vec<ModelSample>> {
        let mut reader = csv::Reader::from_path(path)?;
        let columns = self.map_columns(&mut reader, path)?;

        let mut samples = Vec::new();
        let mut dropped = 0usize;

        for record in reader.records() {
            let record = record?;
            let Some(time) = record.get(columns.time).and_then(parse_utc_timestamp) else {
                dropped += 1;
                continue;
            };

            samples.push(ModelSample {
                time,
                ghi: parse_value(&record, columns.ghi),
                dhi: parse_value(&record, columns.dhi),
                dni: parse_value(&record, columns.bni),
                cloud_cover: columns
                    .cloud
                    .map(|index| parse_value(&record, index))
                    .filter(|value| value.is_finite()),
            });
        }

        if dropped > 0 {
            debug!(
                "dropped {} rows with unparseable timestamps from '{}'",
                dropped,
                path.display()
            );
        }

        Ok(samples)
    }

    fn map_columns(&self, reader: &mut csv::Reader<std::fs::File>, path: &Path) -> Result<ColumnMap> {
        let headers = reader.headers()?.clone();
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| ProcessingError::MissingColumn {
                column: name.to_string(),
                file: path.display().to_string(),
            })
        };

        Ok(ColumnMap {
            time: require("time")?,
            ghi: require("GHI")?,
            dhi: require("DHI")?,
            bni: require("BNI")?,
            cloud: find(CLOUD_COLUMN),
        })
    }
}

impl Default for ProcessedReader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_value(record: &csv::StringRecord, index: usize) -> f64 {
    record
        .get(index)
        .and_then(|field| field.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}
