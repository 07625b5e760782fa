use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampSecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::Utc;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::models::CompiledRecord;

/// Epoch-second encoding shared by both time columns so they serialize
/// consistently.
const TIME_UNITS: &str = "seconds since 1970-01-01 00:00:00";
const TIME_CALENDAR: &str = "proleptic_gregorian";

/// Writes the compiled multi-station dataset as a single Parquet file.
///
/// Dataset-level attributes travel as schema metadata and per-variable
/// attributes as field metadata, so the file stays self-describing the
/// way the downstream analysis tooling expects.
pub struct DatasetWriter {
    compression: Compression,
    source: String,
}

impl DatasetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            source: "Compiled from processed 10-minute CAMS station files".to_string(),
        }
    }

    /// Record where the input files came from in the dataset attributes.
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn write(&self, records: &[CompiledRecord], path: &Path) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let schema = self.create_schema();
        let batch = self.records_to_batch(records, schema.clone())?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    fn create_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new("station", DataType::Utf8, false).with_metadata(attributes(&[
                ("long_name", "Observation Station Name"),
                ("cf_role", "timeseries_id"),
            ])),
            Field::new(
                "time",
                DataType::Timestamp(TimeUnit::Second, Some("UTC".into())),
                false,
            )
            .with_metadata(attributes(&[
                ("long_name", "Time (UTC)"),
                ("standard_name", "time"),
                ("axis", "T"),
                ("units", TIME_UNITS),
                ("calendar", TIME_CALENDAR),
            ])),
            Field::new("time_local", DataType::Timestamp(TimeUnit::Second, None), false)
                .with_metadata(attributes(&[
                    (
                        "long_name",
                        "Local Time at Station",
                    ),
                    (
                        "description",
                        "Calculated local time corresponding to the UTC time column.",
                    ),
                    ("units", TIME_UNITS),
                    ("calendar", TIME_CALENDAR),
                ])),
            Field::new("latitude", DataType::Float64, false).with_metadata(attributes(&[
                ("long_name", "Latitude"),
                ("units", "degrees_north"),
                ("standard_name", "latitude"),
            ])),
            Field::new("longitude", DataType::Float64, false).with_metadata(attributes(&[
                ("long_name", "Longitude"),
                ("units", "degrees_east"),
                ("standard_name", "longitude"),
            ])),
            Field::new("elevation", DataType::Float64, false).with_metadata(attributes(&[
                ("long_name", "Elevation"),
                ("units", "m"),
                ("positive", "up"),
            ])),
            Field::new("GHI", DataType::Float64, false).with_metadata(attributes(&[
                ("long_name", "Global Horizontal Irradiance"),
                ("units", "Wh/m^2"),
                ("standard_name", "surface_solar_radiation_downwards"),
            ])),
            Field::new("DHI", DataType::Float64, false).with_metadata(attributes(&[
                ("long_name", "Diffuse Horizontal Irradiance"),
                ("units", "Wh/m^2"),
                ("standard_name", "diffuse_solar_radiation"),
            ])),
            Field::new("DNI", DataType::Float64, false).with_metadata(attributes(&[
                ("long_name", "Direct Normal Irradiance"),
                ("units", "Wh/m^2"),
                ("standard_name", "direct_solar_radiation"),
            ])),
        ];

        let history = format!(
            "Created on {} by cams-processor {}",
            Utc::now().to_rfc3339(),
            env!("CARGO_PKG_VERSION")
        );
        let dataset_attributes = attributes(&[
            ("title", "Compiled Solar Radiation Data from CAMS ECMWF"),
            ("institution", "BMKG for WETSA Project"),
            ("source", self.source.as_str()),
            ("history", history.as_str()),
            (
                "comment",
                "Data includes GHI, DHI and DNI for multiple stations in Indonesia.",
            ),
        ]);

        Arc::new(Schema::new_with_metadata(fields, dataset_attributes))
    }

    fn records_to_batch(
        &self,
        records: &[CompiledRecord],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let stations: Vec<&str> = records.iter().map(|r| r.station.as_str()).collect();
        let times: Vec<i64> = records.iter().map(|r| r.time.timestamp()).collect();
        let local_times: Vec<i64> = records
            .iter()
            .map(|r| r.time_local.and_utc().timestamp())
            .collect();
        let latitudes: Vec<f64> = records.iter().map(|r| r.latitude).collect();
        let longitudes: Vec<f64> = records.iter().map(|r| r.longitude).collect();
        let elevations: Vec<f64> = records.iter().map(|r| r.elevation).collect();
        let ghi: Vec<f64> = records.iter().map(|r| r.ghi).collect();
        let dhi: Vec<f64> = records.iter().map(|r| r.dhi).collect();
        let dni: Vec<f64> = records.iter().map(|r| r.dni).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(stations)),
            Arc::new(TimestampSecondArray::from(times).with_timezone("UTC")),
            Arc::new(TimestampSecondArray::from(local_times)),
            Arc::new(Float64Array::from(latitudes)),
            Arc::new(Float64Array::from(longitudes)),
            Arc::new(Float64Array::from(elevations)),
            Arc::new(Float64Array::from(ghi)),
            Arc::new(Float64Array::from(dhi)),
            Arc::new(Float64Array::from(dni)),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }
}

impl Default for DatasetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn attributes(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn record(station: &str, hour: u32) -> CompiledRecord {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap();
        CompiledRecord {
            station: station.to_string(),
            time,
            time_local: (time + chrono::Duration::hours(7)).naive_utc(),
            latitude: -6.6,
            longitude: 106.8,
            elevation: 190.0,
            ghi: 1.5,
            dhi: 0.4,
            dni: 2.0,
        }
    }

    #[test]
    fn test_write_empty_records_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compiled_solar_data.parquet");
        DatasetWriter::new().write(&[], &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_written_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compiled_solar_data.parquet");

        let records = vec![record("Bogor", 0), record("Bogor", 1)];
        DatasetWriter::new().write(&records, &path).unwrap();

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap()).unwrap();
        let schema = reader.schema().clone();
        assert_eq!(
            schema.metadata().get("title").map(String::as_str),
            Some("Compiled Solar Radiation Data from CAMS ECMWF")
        );
        let ghi_field = schema.field_with_name("GHI").unwrap();
        assert_eq!(
            ghi_field.metadata().get("units").map(String::as_str),
            Some("Wh/m^2")
        );

        let batches: Vec<RecordBatch> = reader
            .build()
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        let total_rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
        assert_eq!(total_rows, 2);

        let times = batches[0]
            .column(1)
            .as_any()
            .downcast_ref::<TimestampSecondArray>()
            .unwrap();
        let locals = batches[0]
            .column(2)
            .as_any()
            .downcast_ref::<TimestampSecondArray>()
            .unwrap();
        // local = UTC + 7h, both encoded as epoch seconds
        assert_eq!(locals.value(0) - times.value(0), 7 * 3600);
    }
}
