pub mod cams_raw_reader;
pub mod ground_reader;
pub mod location_reader;
pub mod processed_reader;

pub use cams_raw_reader::CamsRawReader;
pub use ground_reader::{GroundReader, GroundSeries};
pub use location_reader::LocationReader;
pub use processed_reader::ProcessedReader;
