pub mod filename;
pub mod progress;
pub mod station_name;
pub mod stats;
pub mod time;

pub use progress::ProgressReporter;
pub use station_name::{normalize_station_name, sanitize_station_filename};
pub use stats::{linear_fit, LinearFit};
pub use time::{floor_to_bucket, parse_utc_timestamp};
