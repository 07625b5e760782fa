use reqwest::blocking::Client;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::cams::SkyType;
use crate::config::FetchConfig;
use crate::error::Result;
use crate::models::Station;

/// One retrieval request for the CAMS solar radiation time series
/// service. Field names follow the service's request schema.
#[derive(Debug, Clone, Serialize)]
pub struct CamsRequest {
    pub sky_type: SkyType,
    pub location: CamsLocation,
    /// The service expects altitude as a string.
    pub altitude: String,
    pub date: String,
    pub time_step: String,
    pub time_reference: String,
    pub format: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CamsLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl CamsRequest {
    pub fn for_station(station: &Station, sky_type: SkyType, config: &FetchConfig) -> Self {
        Self {
            sky_type,
            location: CamsLocation {
                latitude: station.latitude,
                longitude: station.longitude,
            },
            altitude: station.elevation.to_string(),
            date: config.date_range.clone(),
            time_step: config.time_step.clone(),
            time_reference: "universal_time".to_string(),
            format: "csv_expert".to_string(),
        }
    }
}

/// Thin blocking client for the CAMS retrieval endpoint: posts the JSON
/// request and streams the response body straight into the destination
/// file. Retry policy and anything smarter belongs to the caller.
pub struct CamsClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CamsClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn retrieve(&self, dataset: &str, request: &CamsRequest, destination: &Path) -> Result<()> {
        let url = format!("{}/{}", self.base_url, dataset);

        let mut builder = self.http.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header("PRIVATE-TOKEN", key.as_str());
        }

        let mut response = builder.send()?.error_for_status()?;
        let mut file = File::create(destination)?;
        std::io::copy(&mut response, &mut file)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cams::SkyType;

    #[test]
    fn test_request_payload_shape() {
        let station = Station::new("Bogor", -6.6, 106.8, 190.0, 7);
        let config = FetchConfig::default();
        let request = CamsRequest::for_station(&station, SkyType::ObservedCloud, &config);

        let payload = serde_json::to_value(&request).unwrap();
        assert_eq!(payload["sky_type"], "observed_cloud");
        assert_eq!(payload["location"]["latitude"], -6.6);
        assert_eq!(payload["location"]["longitude"], 106.8);
        assert_eq!(payload["altitude"], "190");
        assert_eq!(payload["date"], "2024-01-01/2024-12-31");
        assert_eq!(payload["time_step"], "1minute");
        assert_eq!(payload["time_reference"], "universal_time");
        assert_eq!(payload["format"], "csv_expert");
    }
}
