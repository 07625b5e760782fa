use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Required column '{column}' missing from '{file}'")]
    MissingColumn { column: String, file: String },

    #[error("Duplicate station key '{0}' in location table")]
    DuplicateStationKey(String),

    #[error("Station '{0}' not found in location table")]
    StationNotFound(String),

    #[error("Invalid timezone '{0}': expected format 'UTC+N' or 'UTC-N'")]
    InvalidTimezone(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Chart rendering error: {0}")]
    Chart(String),
}
