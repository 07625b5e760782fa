use std::fs;
use tracing::{info, warn};

use crate::archive;
use crate::cams::{CamsClient, CamsRequest, SkyType};
use crate::config::FetchConfig;
use crate::error::Result;
use crate::models::Station;
use crate::processors::Resampler;
use crate::readers::{CamsRawReader, LocationReader};
use crate::utils::filename::{processed_filename, raw_filename};
use crate::utils::ProgressReporter;
use crate::writers::write_aggregated_csv;

#[derive(Debug)]
pub struct FetchSummary {
    pub stations: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Downloads the 1-minute CAMS time series for every station and sky
/// type, aggregates each to 10-minute means, and archives the raw
/// download. One station/sky-type pair failing never stops the loop.
pub struct Fetcher {
    config: FetchConfig,
    client: CamsClient,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Self {
        let client = CamsClient::new(&config.api_url, config.api_key.clone());
        Self { config, client }
    }

    pub fn run(&self) -> Result<FetchSummary> {
        let stations = LocationReader::new().read_stations(&self.config.location_file)?;
        fs::create_dir_all(&self.config.output_dir)?;

        let total = stations.len() * self.config.sky_types.len();
        let progress = ProgressReporter::new(
            total as u64,
            "Fetching CAMS time series...",
            self.config.silent,
        );

        let mut completed = 0;
        let mut failed = 0;
        for station in &stations {
            for &sky_type in &self.config.sky_types {
                progress.set_message(&format!("{} ({})", station.name, sky_type));
                match self.fetch_one(station, sky_type) {
                    Ok(()) => completed += 1,
                    Err(err) => {
                        warn!(
                            "station '{}', sky type '{}': {}; skipping to the next task",
                            station.name, sky_type, err
                        );
                        failed += 1;
                    }
                }
                progress.increment(1);
            }
        }
        progress.finish_with_message("All locations and sky types have been processed");

        Ok(FetchSummary {
            stations: stations.len(),
            completed,
            failed,
        })
    }

    fn fetch_one(&self, station: &Station, sky_type: SkyType) -> Result<()> {
        let raw_path = self
            .config
            .output_dir
            .join(raw_filename(&station.name, sky_type));
        let processed_path = self
            .config
            .output_dir
            .join(processed_filename(&station.name, sky_type));

        info!(
            "requesting 1-minute data for '{}' ({})",
            station.name, sky_type
        );
        let request = CamsRequest::for_station(station, sky_type, &self.config);
        self.client
            .retrieve(&self.config.dataset, &request, &raw_path)?;

        let series = CamsRawReader::new().read(&raw_path)?;
        if series.is_empty() {
            warn!(
                "raw file '{}' contains no data rows; leaving it unarchived",
                raw_path.display()
            );
            return Ok(());
        }

        let aggregated =
            Resampler::with_bucket_minutes(self.config.bucket_minutes).resample(&series);
        write_aggregated_csv(&processed_path, &aggregated)?;
        info!("aggregated data saved to '{}'", processed_path.display());

        let zip_path = archive::compress_and_remove(&raw_path)?;
        info!("raw download archived as '{}'", zip_path.display());

        Ok(())
    }
}
