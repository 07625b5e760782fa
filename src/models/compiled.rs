use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the compiled multi-station dataset, keyed by
/// (station, UTC time). Station coordinates repeat on every row so the
/// dataset is self-contained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledRecord {
    pub station: String,
    pub time: DateTime<Utc>,
    pub time_local: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub ghi: f64,
    pub dhi: f64,
    pub dni: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_round_trips_through_serde() {
        let record = CompiledRecord {
            station: "Bogor".to_string(),
            time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            time_local: Utc
                .with_ymd_and_hms(2024, 1, 1, 7, 0, 0)
                .unwrap()
                .naive_utc(),
            latitude: -6.6,
            longitude: 106.8,
            elevation: 190.0,
            ghi: 1.0,
            dhi: 0.5,
            dni: 0.2,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: CompiledRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.station, "Bogor");
        assert_eq!(back.time, record.time);
        assert_eq!(back.time_local, record.time_local);
    }
}
