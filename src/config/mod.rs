use std::path::PathBuf;

use crate::cams::SkyType;

/// Default location table, as produced by the station survey.
pub const DEFAULT_LOCATION_FILE: &str = "asrs_location.csv";

/// Default directory for fetched and processed per-station files.
pub const DEFAULT_DATA_DIR: &str = "solar_data_output";

/// Settings for the fetch pipeline. Defaults mirror the values the
/// workflow has always used; entry points take the struct explicitly
/// instead of reading module-level globals.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub location_file: PathBuf,
    pub output_dir: PathBuf,
    /// CAMS dataset identifier.
    pub dataset: String,
    /// Base URL of the retrieval endpoint.
    pub api_url: String,
    /// Personal access token for the CAMS service, if required.
    pub api_key: Option<String>,
    pub sky_types: Vec<SkyType>,
    /// Inclusive request range, `start/end` in ISO dates.
    pub date_range: String,
    pub time_step: String,
    /// Width of the aggregation buckets, in minutes.
    pub bucket_minutes: i64,
    /// Suppress the progress bar (tests).
    pub silent: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            location_file: PathBuf::from(DEFAULT_LOCATION_FILE),
            output_dir: PathBuf::from(DEFAULT_DATA_DIR),
            dataset: "cams-solar-radiation-timeseries".to_string(),
            api_url: "https://ads.atmosphere.copernicus.eu/api/retrieve".to_string(),
            api_key: None,
            sky_types: vec![SkyType::Clear, SkyType::ObservedCloud],
            date_range: "2024-01-01/2024-12-31".to_string(),
            time_step: "1minute".to_string(),
            bucket_minutes: 10,
            silent: false,
        }
    }
}

/// Settings for the compile pipeline.
#[derive(Debug, Clone)]
pub struct CompileConfig {
    pub location_file: PathBuf,
    /// Directory searched for processed per-station files.
    pub data_dir: PathBuf,
    pub output_file: PathBuf,
    /// Sky type whose processed files are compiled.
    pub sky_type: SkyType,
    /// Station excluded from the compilation, matched through the
    /// normalizer so any spelling works.
    pub exclude_station: Option<String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            location_file: PathBuf::from(DEFAULT_LOCATION_FILE),
            data_dir: PathBuf::from("."),
            output_file: PathBuf::from("compiled_solar_data.parquet"),
            sky_type: SkyType::ObservedCloud,
            exclude_station: Some("Sleman".to_string()),
        }
    }
}

/// Settings for the compare pipeline.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Directory holding both ground QC files and processed model files.
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Year embedded in the ground QC filenames.
    pub year: i32,
    pub sky_type: SkyType,
    /// Multiplier applied to model irradiance before comparison. The
    /// upstream files carry Wh/m² per minute-equivalent values; 60.0
    /// brings them to W/m². An assumption about the source units, hence
    /// configurable rather than baked in.
    pub unit_conversion_factor: f64,
    /// QC flag columns summed per row; any nonzero sum drops the row.
    /// Only columns actually present in the file are consulted.
    pub flag_columns: Vec<String>,
    /// Explicit location list; empty means discover from ground files.
    pub locations: Vec<String>,
}

impl CompareConfig {
    pub fn default_flag_columns() -> Vec<String> {
        [
            "flag_ghi",
            "flag_dhi",
            "flag_dni",
            "flag_ghi_rare",
            "flag_dhi_rare",
            "flag_dni_rare",
            "flag_comp1",
            "flag_comp2",
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            year: 2024,
            sky_type: SkyType::ObservedCloud,
            unit_conversion_factor: 60.0,
            flag_columns: Self::default_flag_columns(),
            locations: Vec::new(),
        }
    }
}
