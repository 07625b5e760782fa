pub mod client;

pub use client::{CamsClient, CamsLocation, CamsRequest};

use serde::{Deserialize, Serialize};

/// Sky condition assumption under which the CAMS service computes the
/// radiation time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyType {
    Clear,
    ObservedCloud,
}

impl SkyType {
    /// Value sent in the retrieval request.
    pub fn request_value(&self) -> &'static str {
        match self {
            SkyType::Clear => "clear",
            SkyType::ObservedCloud => "observed_cloud",
        }
    }

    /// Tag embedded in raw and processed filenames.
    pub fn file_tag(&self) -> &'static str {
        self.request_value()
    }
}

impl std::fmt::Display for SkyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.request_value())
    }
}
