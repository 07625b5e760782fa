/// Produce the canonical matching key for a station name.
///
/// Underscores and hyphens are treated as word separators, every other
/// character outside ASCII alphanumerics and whitespace is stripped, the
/// result is lowercased, and runs of whitespace collapse to a single
/// space. The same key must come out of a metadata table entry and a
/// filename fragment for the two to match.
///
/// # Examples
/// ```
/// use cams_processor::utils::normalize_station_name;
///
/// assert_eq!(normalize_station_name("Bone_Bolango"), "bone bolango");
/// assert_eq!(normalize_station_name("BONE-BOLANGO!"), "bone bolango");
/// ```
pub fn normalize_station_name(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut pending_space = false;

    for ch in name.chars() {
        let ch = match ch {
            '_' | '-' => ' ',
            other => other,
        };

        if ch.is_ascii_alphanumeric() {
            if pending_space && !key.is_empty() {
                key.push(' ');
            }
            pending_space = false;
            key.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() {
            pending_space = true;
        }
        // anything else is stripped without acting as a separator
    }

    key
}

/// Filename-safe form of a station name, used when building per-station
/// output paths. Every byte outside `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_station_filename(name: &str) -> String {
    name.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect()
}
