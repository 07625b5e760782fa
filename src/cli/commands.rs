use tracing::Level;

use crate::cli::args::{Cli, Commands};
use crate::config::{CompareConfig, CompileConfig, FetchConfig};
use crate::error::Result;
use crate::processors::{Comparator, Compiler, Fetcher};

pub fn run(cli: Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Fetch {
            location_file,
            output_dir,
            api_key,
            api_url,
            date_range,
        } => {
            let mut config = FetchConfig {
                location_file,
                output_dir,
                api_key: api_key.or_else(|| std::env::var("CAMS_API_KEY").ok()),
                ..FetchConfig::default()
            };
            if let Some(api_url) = api_url {
                config.api_url = api_url;
            }
            if let Some(date_range) = date_range {
                config.date_range = date_range;
            }

            println!("Fetching CAMS solar radiation time series...");
            println!("Location table: {}", config.location_file.display());
            println!("Output directory: {}", config.output_dir.display());

            let summary = Fetcher::new(config).run()?;
            println!(
                "\nFetch complete: {} stations, {} downloads processed, {} failed",
                summary.stations, summary.completed, summary.failed
            );
        }

        Commands::Compile {
            location_file,
            data_dir,
            output_file,
            exclude_station,
        } => {
            let config = CompileConfig {
                location_file,
                data_dir,
                output_file,
                exclude_station: Some(exclude_station),
                ..CompileConfig::default()
            };

            println!("Compiling solar radiation dataset...");
            println!("Location table: {}", config.location_file.display());
            println!("Data directory: {}", config.data_dir.display());

            let summary = Compiler::new(config).run()?;
            println!(
                "\nCompile complete: {} records from {} of {} files ({} skipped), {} stations in table",
                summary.records,
                summary.files_compiled,
                summary.files_found,
                summary.files_skipped,
                summary.stations_in_table
            );
        }

        Commands::Compare {
            data_dir,
            output_dir,
            location,
            unit_conversion,
            year,
        } => {
            let config = CompareConfig {
                data_dir,
                output_dir,
                locations: location,
                unit_conversion_factor: unit_conversion,
                year,
                ..CompareConfig::default()
            };

            println!("Comparing ground measurements against the CAMS model...");
            println!("Data directory: {}", config.data_dir.display());

            let summary = Comparator::new(config).run()?;
            println!(
                "\nAll locations processed: {} figures rendered, {} of {} locations skipped",
                summary.rendered, summary.skipped, summary.locations
            );
        }
    }

    Ok(())
}
