use chrono::{DateTime, Utc};

/// One timestamped set of the three irradiance components, in whatever
/// unit the source file carries. Missing values survive as NaN until the
/// comparison join filters them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrradianceSample {
    pub time: DateTime<Utc>,
    pub ghi: f64,
    pub dhi: f64,
    pub dni: f64,
}

impl IrradianceSample {
    pub fn is_complete(&self) -> bool {
        self.ghi.is_finite() && self.dhi.is_finite() && self.dni.is_finite()
    }
}

/// A model (CAMS) sample; cloud cover is only present in the
/// observed-cloud sky type output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSample {
    pub time: DateTime<Utc>,
    pub ghi: f64,
    pub dhi: f64,
    pub dni: f64,
    pub cloud_cover: Option<f64>,
}

/// Raw CAMS time series as downloaded: a header of numeric column names
/// and one row per observation period.
#[derive(Debug, Clone)]
pub struct RawTimeSeries {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone)]
pub struct RawRow {
    pub time: DateTime<Utc>,
    /// Aligned with `columns`; `None` marks an empty or non-numeric cell.
    pub values: Vec<Option<f64>>,
}

impl RawTimeSeries {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
