use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::utils::normalize_station_name;

/// One ground station from the location table.
///
/// `key` is the normalized matching identity; `name` keeps the original
/// capitalization for output files.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Station {
    pub name: String,
    pub key: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub elevation: f64,

    /// Signed whole hours added to UTC to obtain station local time.
    pub utc_offset: i32,
}

impl Station {
    pub fn new(name: &str, latitude: f64, longitude: f64, elevation: f64, utc_offset: i32) -> Self {
        let name = name.trim().to_string();
        let key = normalize_station_name(&name);
        Self {
            name,
            key,
            latitude,
            longitude,
            elevation,
            utc_offset,
        }
    }

    /// Station-local wall-clock time for a UTC instant.
    pub fn local_time(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        (utc + Duration::hours(i64::from(self.utc_offset))).naive_utc()
    }
}

/// Parse a `UTC+N` / `UTC-N` timezone label into signed whole hours.
pub fn parse_utc_offset(timezone: &str) -> Result<i32> {
    let trimmed = timezone.trim();
    let rest = trimmed
        .strip_prefix("UTC")
        .ok_or_else(|| ProcessingError::InvalidTimezone(timezone.to_string()))?;

    rest.parse::<i32>()
        .map_err(|_| ProcessingError::InvalidTimezone(timezone.to_string()))
}

/// Read-only lookup from normalized station key to station metadata,
/// built once per run. Construction fails when two location rows collapse
/// onto the same key, since the match would be ambiguous.
#[derive(Debug, Default)]
pub struct StationIndex {
    stations: HashMap<String, Station>,
}

impl StationIndex {
    pub fn from_stations(stations: Vec<Station>) -> Result<Self> {
        let mut map = HashMap::with_capacity(stations.len());
        for station in stations {
            if let Some(previous) = map.insert(station.key.clone(), station) {
                return Err(ProcessingError::DuplicateStationKey(previous.key));
            }
        }
        Ok(Self { stations: map })
    }

    pub fn get(&self, key: &str) -> Option<&Station> {
        self.stations.get(key)
    }

    /// Look up by any spelling of the name (normalized internally).
    pub fn lookup(&self, raw_name: &str) -> Option<&Station> {
        self.stations.get(&normalize_station_name(raw_name))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn bogor() -> Station {
        Station::new("Bogor", -6.6, 106.8, 190.0, 7)
    }

    #[test]
    fn test_station_key_is_normalized() {
        let station = Station::new(" Bone_Bolango ", 0.5, 123.2, 25.0, 8);
        assert_eq!(station.name, "Bone_Bolango");
        assert_eq!(station.key, "bone bolango");
    }

    #[test]
    fn test_station_coordinate_validation() {
        assert!(bogor().validate().is_ok());
        assert!(Station::new("Nowhere", 91.0, 0.0, 0.0, 0).validate().is_err());
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("UTC+7").unwrap(), 7);
        assert_eq!(parse_utc_offset("UTC-3").unwrap(), -3);
        assert_eq!(parse_utc_offset("UTC+0").unwrap(), 0);
        assert!(parse_utc_offset("WIB").is_err());
        assert!(parse_utc_offset("UTC+").is_err());
        assert!(parse_utc_offset("UTC+7.5").is_err());
    }

    #[test]
    fn test_local_time_adds_offset() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let local = bogor().local_time(utc);
        assert_eq!(local.to_string(), "2024-01-01 07:00:00");
    }

    #[test]
    fn test_index_lookup_through_normalizer() {
        let index = StationIndex::from_stations(vec![bogor()]).unwrap();
        assert!(index.lookup("BOGOR").is_some());
        assert!(index.lookup("bogor ").is_some());
        assert!(index.lookup("Sleman").is_none());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_index_rejects_duplicate_keys() {
        let result = StationIndex::from_stations(vec![
            Station::new("Bone_Bolango", 0.5, 123.2, 25.0, 8),
            Station::new("bone bolango", 0.6, 123.3, 30.0, 8),
        ]);
        assert!(matches!(
            result,
            Err(ProcessingError::DuplicateStationKey(key)) if key == "bone bolango"
        ));
    }
}
