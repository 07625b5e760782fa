use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_DATA_DIR, DEFAULT_LOCATION_FILE};

#[derive(Parser)]
#[command(name = "cams-processor")]
#[command(about = "CAMS solar radiation fetch, compile and compare pipeline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download per-station time series and aggregate to 10-minute means
    Fetch {
        #[arg(short, long, default_value = DEFAULT_LOCATION_FILE, help = "Station location table")]
        location_file: PathBuf,

        #[arg(short, long, default_value = DEFAULT_DATA_DIR, help = "Directory for raw and processed files")]
        output_dir: PathBuf,

        #[arg(long, help = "CAMS API key [default: the CAMS_API_KEY environment variable]")]
        api_key: Option<String>,

        #[arg(long, help = "Override the CAMS retrieval endpoint")]
        api_url: Option<String>,

        #[arg(long, help = "Request date range, start/end ISO dates")]
        date_range: Option<String>,
    },

    /// Merge processed station files into one compiled dataset
    Compile {
        #[arg(short, long, default_value = DEFAULT_LOCATION_FILE, help = "Station location table")]
        location_file: PathBuf,

        #[arg(short, long, default_value = ".", help = "Directory searched for processed files")]
        data_dir: PathBuf,

        #[arg(
            short,
            long,
            default_value = "compiled_solar_data.parquet",
            help = "Output dataset path"
        )]
        output_file: PathBuf,

        #[arg(long, default_value = "Sleman", help = "Station to exclude (any spelling)")]
        exclude_station: String,
    },

    /// Compare ground measurements against the model and render figures
    Compare {
        #[arg(short, long, default_value = ".", help = "Directory with ground and model files")]
        data_dir: PathBuf,

        #[arg(short, long, default_value = ".", help = "Directory for output figures")]
        output_dir: PathBuf,

        #[arg(
            long,
            help = "Locations to process [default: discovered from ground files]"
        )]
        location: Vec<String>,

        #[arg(
            long,
            default_value_t = 60.0,
            help = "Multiplier applied to model irradiance before comparison"
        )]
        unit_conversion: f64,

        #[arg(long, default_value_t = 2024, help = "Year embedded in ground filenames")]
        year: i32,
    },
}
