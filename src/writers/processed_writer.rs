use std::path::Path;

use crate::error::Result;
use crate::processors::AggregatedSeries;

/// Write an aggregated series as a plain CSV with a leading `time`
/// column. Timestamps are naive UTC; missing means stay empty.
pub fn write_aggregated_csv(path: &Path, series: &AggregatedSeries) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = Vec::with_capacity(series.columns.len() + 1);
    header.push("time".to_string());
    header.extend(series.columns.iter().cloned());
    writer.write_record(&header)?;

    for row in &series.rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.time.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string());
        for value in &row.values {
            record.push(value.map(|v| v.to_string()).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
