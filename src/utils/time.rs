use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Parse a timestamp string into UTC.
///
/// Timezone-aware inputs are converted to UTC; naive inputs are assumed
/// to already be UTC and are tagged as such. Returns `None` when the
/// string matches none of the accepted layouts, so callers can drop the
/// row rather than abort the file.
pub fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    None
}

/// Floor a timestamp to the start of its `bucket_minutes` bucket, aligned
/// to clock time (00, 10, 20, ... for 10-minute buckets). Sub-second
/// precision is discarded.
pub fn floor_to_bucket(time: DateTime<Utc>, bucket_minutes: i64) -> DateTime<Utc> {
    let bucket_secs = bucket_minutes * 60;
    let rem = time.timestamp().rem_euclid(bucket_secs);
    let subsec = i64::from(time.timestamp_subsec_nanos());
    time - Duration::seconds(rem) - Duration::nanoseconds(subsec)
}
