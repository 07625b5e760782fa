use glob::glob;
use std::collections::HashMap;
use std::fs;
use tracing::{info, warn};

use crate::charts;
use crate::config::CompareConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{Component, ComparisonRecord, IrradianceSample, ModelSample};
use crate::readers::{GroundReader, ProcessedReader};
use crate::utils::filename::{
    comparison_chart_filename, extract_ground_location, ground_filename, processed_filename,
};
use crate::utils::{linear_fit, LinearFit};

#[derive(Debug)]
pub struct CompareSummary {
    pub locations: usize,
    pub rendered: usize,
    pub skipped: usize,
}

/// Per-component least-squares fit of model on ground values, used to
/// annotate the comparison scatter panels.
pub type ComponentFits = Vec<(Component, Option<LinearFit>)>;

/// Compares ground measurements against the CAMS model per location and
/// renders one comparison figure each. A failing location is logged and
/// the loop moves on.
pub struct Comparator {
    config: CompareConfig,
}

impl Comparator {
    pub fn new(config: CompareConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<CompareSummary> {
        let locations = if self.config.locations.is_empty() {
            self.discover_locations()?
        } else {
            self.config.locations.clone()
        };

        if locations.is_empty() {
            return Err(ProcessingError::MissingData(format!(
                "no ground files matching 'QC_*_{}_flagged.csv' in '{}'",
                self.config.year,
                self.config.data_dir.display()
            )));
        }

        fs::create_dir_all(&self.config.output_dir)?;

        let mut rendered = 0;
        let mut skipped = 0;
        for location in &locations {
            info!("processing data for {}", location.replace('_', " "));
            match self.process_location(location) {
                Ok(true) => rendered += 1,
                Ok(false) => skipped += 1,
                Err(err) => {
                    warn!("unexpected error while processing {location}: {err}");
                    skipped += 1;
                }
            }
        }

        Ok(CompareSummary {
            locations: locations.len(),
            rendered,
            skipped,
        })
    }

    fn discover_locations(&self) -> Result<Vec<String>> {
        let pattern = self
            .config
            .data_dir
            .join(format!("QC_*_{}_flagged.csv", self.config.year))
            .display()
            .to_string();

        let mut locations: Vec<String> = glob(&pattern)
            .map_err(|err| ProcessingError::Config(format!("invalid glob pattern: {err}")))?
            .filter_map(std::result::Result::ok)
            .filter_map(|path| {
                let filename = path.file_name()?.to_str()?;
                extract_ground_location(filename, self.config.year).map(str::to_string)
            })
            .collect();
        locations.sort();

        Ok(locations)
    }

    /// Returns `Ok(true)` when a figure was rendered, `Ok(false)` when
    /// the location was skipped for an already-logged reason.
    fn process_location(&self, location: &str) -> Result<bool> {
        let ground_path = self
            .config
            .data_dir
            .join(ground_filename(location, self.config.year));
        let model_path = self
            .config
            .data_dir
            .join(processed_filename(location, self.config.sky_type));

        if !ground_path.exists() {
            warn!(
                "ground data file not found, skipping {location}: {}",
                ground_path.display()
            );
            return Ok(false);
        }
        if !model_path.exists() {
            warn!(
                "model data file not found, skipping {location}: {}",
                model_path.display()
            );
            return Ok(false);
        }

        let ground = GroundReader::new(&self.config.flag_columns).read(&ground_path)?;
        info!(
            "ground data: loaded {} rows, {} remain after QC filtering",
            ground.total_rows, ground.kept_rows
        );

        let model = ProcessedReader::new().read_model(&model_path)?;
        let records =
            merge_observations(&ground.samples, &model, self.config.unit_conversion_factor);
        info!(
            "merged data: found {} common data points for comparison",
            records.len()
        );

        if records.is_empty() {
            warn!("no common data points found for {location}; cannot generate a figure");
            return Ok(false);
        }

        let fits = component_fits(&records);
        for (component, fit) in &fits {
            if let Some(fit) = fit {
                info!(
                    "{component} fit: slope {:.2}, intercept {:.1}, R² {:.3} (n={})",
                    fit.slope, fit.intercept, fit.r_squared, fit.n
                );
            }
        }

        let output_path = self
            .config
            .output_dir
            .join(comparison_chart_filename(location));
        let title = format!("{} ({})", location.replace('_', " "), self.config.year);
        charts::render_comparison(&title, &records, &fits, &output_path)?;
        info!("figure saved to '{}'", output_path.display());

        Ok(true)
    }
}

/// Inner-join ground and model samples on their UTC timestamp, applying
/// the unit conversion to the model components. Pairs with any
/// non-finite component are dropped.
pub fn merge_observations(
    ground: &[IrradianceSample],
    model: &[ModelSample],
    unit_conversion_factor: f64,
) -> Vec<ComparisonRecord> {
    let ground_by_time: HashMap<i64, &IrradianceSample> = ground
        .iter()
        .map(|sample| (sample.time.timestamp(), sample))
        .collect();

    let mut records: Vec<ComparisonRecord> = model
        .iter()
        .filter_map(|m| {
            let g = ground_by_time.get(&m.time.timestamp())?;
            let record = ComparisonRecord {
                time: m.time,
                ghi_ground: g.ghi,
                dhi_ground: g.dhi,
                dni_ground: g.dni,
                ghi_cams: m.ghi * unit_conversion_factor,
                dhi_cams: m.dhi * unit_conversion_factor,
                dni_cams: m.dni * unit_conversion_factor,
                cloud_cover: m.cloud_cover,
            };
            let complete = record.ghi_ground.is_finite()
                && record.dhi_ground.is_finite()
                && record.dni_ground.is_finite()
                && record.ghi_cams.is_finite()
                && record.dhi_cams.is_finite()
                && record.dni_cams.is_finite();
            complete.then_some(record)
        })
        .collect();
    records.sort_by_key(|record| record.time);

    records
}

/// Fit model against ground per component.
pub fn component_fits(records: &[ComparisonRecord]) -> ComponentFits {
    Component::ALL
        .iter()
        .map(|&component| {
            let points: Vec<(f64, f64)> = records
                .iter()
                .map(|record| (record.ground(component), record.model(component)))
                .collect();
            (component, linear_fit(&points))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn ground_at(hour: u32, ghi: f64) -> IrradianceSample {
        IrradianceSample {
            time: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            ghi,
            dhi: 200.0,
            dni: 300.0,
        }
    }

    fn model_at(hour: u32, ghi: f64) -> ModelSample {
        ModelSample {
            time: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            ghi,
            dhi: 3.0,
            dni: 5.0,
            cloud_cover: Some(50.0),
        }
    }

    #[test]
    fn test_merge_is_an_inner_join() {
        let ground = vec![ground_at(4, 600.0), ground_at(5, 650.0)];
        let model = vec![model_at(5, 10.0), model_at(6, 11.0)];

        let merged = merge_observations(&ground, &model, 60.0);
        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged[0].time,
            Utc.with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unit_conversion_applies_to_model_only() {
        let merged = merge_observations(&[ground_at(4, 600.0)], &[model_at(4, 10.0)], 60.0);
        assert_eq!(merged[0].ghi_cams, 600.0);
        assert_eq!(merged[0].dhi_cams, 180.0);
        assert_eq!(merged[0].ghi_ground, 600.0);
    }

    #[test]
    fn test_pairs_with_missing_values_are_dropped() {
        let ground = vec![ground_at(4, f64::NAN), ground_at(5, 650.0)];
        let model = vec![model_at(4, 10.0), model_at(5, 11.0)];

        let merged = merge_observations(&ground, &model, 60.0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].ghi_ground, 650.0);
    }

    #[test]
    fn test_component_fits_recover_conversion_slope() {
        // model = ground / 60 before conversion, so the fit is the identity
        let ground: Vec<IrradianceSample> = (1..=5).map(|h| ground_at(h, 100.0 * f64::from(h))).collect();
        let model: Vec<ModelSample> = (1..=5)
            .map(|h| model_at(h, 100.0 * f64::from(h) / 60.0))
            .collect();

        let merged = merge_observations(&ground, &model, 60.0);
        let fits = component_fits(&merged);
        let (component, ghi_fit) = &fits[0];
        assert_eq!(*component, Component::Ghi);
        let ghi_fit = ghi_fit.unwrap();
        assert!((ghi_fit.slope - 1.0).abs() < 1e-9);
        assert!(ghi_fit.intercept.abs() < 1e-6);
        assert!((ghi_fit.r_squared - 1.0).abs() < 1e-9);
    }
}
