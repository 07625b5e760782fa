use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::models::RawTimeSeries;
use crate::utils::floor_to_bucket;

/// Time-bucket averaged output of the [`Resampler`].
#[derive(Debug, Clone)]
pub struct AggregatedSeries {
    pub columns: Vec<String>,
    pub rows: Vec<AggregatedRow>,
}

#[derive(Debug, Clone)]
pub struct AggregatedRow {
    pub time: DateTime<Utc>,
    pub values: Vec<Option<f64>>,
}

/// Downsamples a 1-minute series to fixed clock-aligned bucket means.
///
/// Columns that never produce a numeric value are dropped from the
/// output; within a kept column, empty cells are skipped by the mean
/// rather than pulling it toward zero.
pub struct Resampler {
    bucket_minutes: i64,
}

impl Resampler {
    pub fn new() -> Self {
        Self { bucket_minutes: 10 }
    }

    pub fn with_bucket_minutes(bucket_minutes: i64) -> Self {
        Self { bucket_minutes }
    }

    pub fn resample(&self, series: &RawTimeSeries) -> AggregatedSeries {
        // a column is numeric if any row parsed a value for it
        let mut numeric = vec![false; series.columns.len()];
        for row in &series.rows {
            for (index, value) in row.values.iter().enumerate() {
                if value.is_some() {
                    numeric[index] = true;
                }
            }
        }
        let kept: Vec<usize> = (0..series.columns.len()).filter(|&i| numeric[i]).collect();

        let mut buckets: BTreeMap<DateTime<Utc>, Vec<(f64, u32)>> = BTreeMap::new();
        for row in &series.rows {
            let bucket = floor_to_bucket(row.time, self.bucket_minutes);
            let sums = buckets
                .entry(bucket)
                .or_insert_with(|| vec![(0.0, 0); kept.len()]);
            for (slot, &column) in kept.iter().enumerate() {
                if let Some(value) = row.values.get(column).copied().flatten() {
                    sums[slot].0 += value;
                    sums[slot].1 += 1;
                }
            }
        }

        let rows = buckets
            .into_iter()
            .map(|(time, sums)| AggregatedRow {
                time,
                values: sums
                    .into_iter()
                    .map(|(sum, count)| {
                        if count == 0 {
                            None
                        } else {
                            Some(sum / f64::from(count))
                        }
                    })
                    .collect(),
            })
            .collect();

        AggregatedSeries {
            columns: kept
                .into_iter()
                .map(|index| series.columns[index].clone())
                .collect(),
            rows,
        }
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRow;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn minute_series(values: &[(u32, u32, f64)]) -> RawTimeSeries {
        RawTimeSeries {
            columns: vec!["GHI".to_string()],
            rows: values
                .iter()
                .map(|&(minute, second, value)| RawRow {
                    time: Utc
                        .with_ymd_and_hms(2024, 1, 1, 0, minute, second)
                        .unwrap(),
                    values: vec![Some(value)],
                })
                .collect(),
        }
    }

    #[test]
    fn test_ten_minute_mean() {
        let values: Vec<(u32, u32, f64)> = (0..10).map(|m| (m, 0, f64::from(m))).collect();
        let aggregated = Resampler::new().resample(&minute_series(&values));

        assert_eq!(aggregated.columns, vec!["GHI"]);
        assert_eq!(aggregated.rows.len(), 1);
        assert_eq!(
            aggregated.rows[0].time,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(aggregated.rows[0].values, vec![Some(4.5)]);
    }

    #[test]
    fn test_bucket_boundary_starts_new_bucket() {
        let aggregated =
            Resampler::new().resample(&minute_series(&[(9, 59, 1.0), (10, 0, 3.0)]));

        assert_eq!(aggregated.rows.len(), 2);
        assert_eq!(aggregated.rows[0].values, vec![Some(1.0)]);
        assert_eq!(
            aggregated.rows[1].time,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 10, 0).unwrap()
        );
        assert_eq!(aggregated.rows[1].values, vec![Some(3.0)]);
    }

    #[test]
    fn test_missing_cells_do_not_skew_the_mean() {
        let series = RawTimeSeries {
            columns: vec!["GHI".to_string()],
            rows: vec![
                RawRow {
                    time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    values: vec![Some(2.0)],
                },
                RawRow {
                    time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).unwrap(),
                    values: vec![None],
                },
                RawRow {
                    time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 2, 0).unwrap(),
                    values: vec![Some(4.0)],
                },
            ],
        };

        let aggregated = Resampler::new().resample(&series);
        assert_eq!(aggregated.rows[0].values, vec![Some(3.0)]);
    }

    #[test]
    fn test_non_numeric_columns_are_dropped() {
        let series = RawTimeSeries {
            columns: vec!["Note".to_string(), "GHI".to_string()],
            rows: vec![RawRow {
                time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                values: vec![None, Some(1.0)],
            }],
        };

        let aggregated = Resampler::new().resample(&series);
        assert_eq!(aggregated.columns, vec!["GHI"]);
        assert_eq!(aggregated.rows[0].values, vec![Some(1.0)]);
    }
}
