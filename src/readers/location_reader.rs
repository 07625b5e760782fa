use serde::Deserialize;
use std::path::Path;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::{parse_utc_offset, Station, StationIndex};

/// Columns the location table must provide.
const REQUIRED_COLUMNS: [&str; 5] = ["station", "latitude", "longitude", "elevation", "timezone"];

#[derive(Debug, Deserialize)]
struct LocationRow {
    station: String,
    latitude: f64,
    longitude: f64,
    elevation: f64,
    timezone: String,
}

/// Reads the station location table.
///
/// Column presence is checked up front so a misnamed header produces a
/// named error instead of a failure deep inside row deserialization.
pub struct LocationReader;

impl LocationReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_stations(&self, path: &Path) -> Result<Vec<Station>> {
        let file = std::fs::File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h.trim() == column) {
                return Err(ProcessingError::MissingColumn {
                    column: column.to_string(),
                    file: path.display().to_string(),
                });
            }
        }

        let mut stations = Vec::new();
        for row in reader.deserialize() {
            let row: LocationRow = row?;
            let utc_offset = parse_utc_offset(&row.timezone)?;
            let station = Station::new(
                &row.station,
                row.latitude,
                row.longitude,
                row.elevation,
                utc_offset,
            );
            station.validate()?;
            stations.push(station);
        }

        Ok(stations)
    }

    /// Read the table and index it by normalized key, failing fast on
    /// duplicate keys.
    pub fn read_index(&self, path: &Path) -> Result<StationIndex> {
        StationIndex::from_stations(self.read_stations(path)?)
    }
}

impl Default for LocationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_table(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_read_stations() {
        let file = write_table(
            "station,latitude,longitude,elevation,timezone\n\
             Bogor,-6.6,106.8,190,UTC+7\n\
             Bone_Bolango,0.55,123.26,25,UTC+8\n",
        );

        let stations = LocationReader::new().read_stations(file.path()).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].name, "Bogor");
        assert_eq!(stations[0].utc_offset, 7);
        assert_eq!(stations[1].key, "bone bolango");
        assert_eq!(stations[1].utc_offset, 8);
    }

    #[test]
    fn test_missing_column_is_named() {
        let file = write_table("station,latitude,longitude,elevation\nBogor,-6.6,106.8,190\n");

        let err = LocationReader::new().read_stations(file.path()).unwrap_err();
        match err {
            ProcessingError::MissingColumn { column, .. } => assert_eq!(column, "timezone"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_timezone_fails() {
        let file = write_table(
            "station,latitude,longitude,elevation,timezone\nBogor,-6.6,106.8,190,GMT+7\n",
        );

        assert!(matches!(
            LocationReader::new().read_stations(file.path()),
            Err(ProcessingError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_out_of_range_coordinates_fail_validation() {
        let file = write_table(
            "station,latitude,longitude,elevation,timezone\nNowhere,95.0,106.8,190,UTC+7\n",
        );

        assert!(matches!(
            LocationReader::new().read_stations(file.path()),
            Err(ProcessingError::Validation(_))
        ));
    }

    #[test]
    fn test_duplicate_keys_rejected_by_index() {
        let file = write_table(
            "station,latitude,longitude,elevation,timezone\n\
             Bone_Bolango,0.55,123.26,25,UTC+8\n\
             bone bolango,0.56,123.27,30,UTC+8\n",
        );

        assert!(matches!(
            LocationReader::new().read_index(file.path()),
            Err(ProcessingError::DuplicateStationKey(_))
        ));
    }
}
