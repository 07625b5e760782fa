use glob::glob;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::CompileConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{CompiledRecord, StationIndex};
use crate::readers::{LocationReader, ProcessedReader};
use crate::utils::filename::extract_station_name;
use crate::utils::normalize_station_name;
use crate::writers::DatasetWriter;

#[derive(Debug)]
pub struct CompileSummary {
    pub stations_in_table: usize,
    pub files_found: usize,
    pub files_compiled: usize,
    pub files_skipped: usize,
    pub records: usize,
}

/// Merges every per-station processed file with the location table into
/// one compiled dataset.
///
/// A broken or unknown file is skipped with a warning; an unreadable
/// location table, an empty file match, or a run where nothing survives
/// aborts before any output is written.
pub struct Compiler {
    config: CompileConfig,
}

impl Compiler {
    pub fn new(config: CompileConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<CompileSummary> {
        let index = LocationReader::new().read_index(&self.config.location_file)?;

        let pattern = self
            .config
            .data_dir
            .join(format!(
                "processed_10min_*_{}.csv",
                self.config.sky_type.file_tag()
            ))
            .display()
            .to_string();

        let mut files: Vec<PathBuf> = glob(&pattern)
            .map_err(|err| ProcessingError::Config(format!("invalid glob pattern: {err}")))?
            .filter_map(std::result::Result::ok)
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(ProcessingError::MissingData(format!(
                "no files found matching the pattern '{pattern}'"
            )));
        }

        info!("processing {} station files", files.len());
        let mut records = Vec::new();
        let mut files_compiled = 0;
        let mut files_skipped = 0;

        for path in &files {
            match self.compile_file(path, &index) {
                Ok(Some(mut file_records)) => {
                    records.append(&mut file_records);
                    files_compiled += 1;
                }
                Ok(None) => files_skipped += 1,
                Err(err) => {
                    warn!("error processing file '{}': {}", path.display(), err);
                    files_skipped += 1;
                }
            }
        }

        if records.is_empty() {
            return Err(ProcessingError::MissingData(
                "no station data was successfully processed; aborting dataset creation".to_string(),
            ));
        }

        records.sort_by(|a, b| a.station.cmp(&b.station).then_with(|| a.time.cmp(&b.time)));

        DatasetWriter::new()
            .with_source(&format!("Compiled from CSV files matching '{pattern}'"))
            .write(&records, &self.config.output_file)?;
        info!(
            "compiled dataset written to '{}'",
            self.config.output_file.display()
        );

        Ok(CompileSummary {
            stations_in_table: index.len(),
            files_found: files.len(),
            files_compiled,
            files_skipped,
            records: records.len(),
        })
    }

    /// Compile one processed file into records, or `None` when the file
    /// is skipped for a reason that has already been logged.
    fn compile_file(
        &self,
        path: &Path,
        index: &StationIndex,
    ) -> Result<Option<Vec<CompiledRecord>>> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        let Some(raw_name) = extract_station_name(filename, self.config.sky_type) else {
            warn!("could not extract a station name from '{filename}'; skipping");
            return Ok(None);
        };
        let display_name = raw_name.replace('_', " ");
        let key = normalize_station_name(raw_name);

        if let Some(excluded) = &self.config.exclude_station {
            if key == normalize_station_name(excluded) {
                info!("excluding station: {display_name}");
                return Ok(None);
            }
        }

        let Some(station) = index.get(&key) else {
            warn!("no location info for '{display_name}'; skipping '{filename}'");
            return Ok(None);
        };

        let samples = ProcessedReader::new().read_irradiance(path)?;
        if samples.is_empty() {
            warn!("file '{filename}' is empty; skipping");
            return Ok(None);
        }

        let records = samples
            .into_iter()
            .map(|sample| CompiledRecord {
                station: station.name.clone(),
                time: sample.time,
                time_local: station.local_time(sample.time),
                latitude: station.latitude,
                longitude: station.longitude,
                elevation: station.elevation,
                ghi: sample.ghi,
                dhi: sample.dhi,
                dni: sample.dni,
            })
            .collect();

        info!("successfully processed: {}", station.name);
        Ok(Some(records))
    }
}
