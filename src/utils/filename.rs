use crate::cams::SkyType;
use crate::utils::station_name::sanitize_station_filename;

/// Raw 1-minute download for one station under one sky type.
pub fn raw_filename(station: &str, sky_type: SkyType) -> String {
    format!(
        "raw_1min_{}_{}.csv",
        sanitize_station_filename(station),
        sky_type.file_tag()
    )
}

/// Aggregated 10-minute output for one station under one sky type.
pub fn processed_filename(station: &str, sky_type: SkyType) -> String {
    format!(
        "processed_10min_{}_{}.csv",
        sanitize_station_filename(station),
        sky_type.file_tag()
    )
}

/// Extract the station name fragment from a processed filename
/// (e.g. `processed_10min_Bone_Bolango_observed_cloud.csv` -> `Bone_Bolango`).
///
/// Returns `None` when the filename does not follow the convention. The
/// fragment still carries filename sanitization; callers must normalize it
/// before matching against the location table.
pub fn extract_station_name(filename: &str, sky_type: SkyType) -> Option<&str> {
    let suffix = format!("_{}.csv", sky_type.file_tag());
    let station = filename
        .strip_prefix("processed_10min_")?
        .strip_suffix(suffix.as_str())?;
    if station.is_empty() {
        None
    } else {
        Some(station)
    }
}

/// Quality-controlled ground measurement file for one location and year.
pub fn ground_filename(location: &str, year: i32) -> String {
    format!("QC_{location}_{year}_flagged.csv")
}

/// Extract the location fragment from a ground filename
/// (e.g. `QC_Sleman_2024_flagged.csv` -> `Sleman`).
pub fn extract_ground_location(filename: &str, year: i32) -> Option<&str> {
    let suffix = format!("_{year}_flagged.csv");
    let location = filename.strip_prefix("QC_")?.strip_suffix(suffix.as_str())?;
    if location.is_empty() {
        None
    } else {
        Some(location)
    }
}

/// Output figure for one location's model-vs-ground comparison.
pub fn comparison_chart_filename(location: &str) -> String {
    format!(
        "solar_radiation_comparison_{}.png",
        sanitize_station_filename(location)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_raw_and_processed_filenames() {
        assert_eq!(
            raw_filename("Bone Bolango", SkyType::Clear),
            "raw_1min_Bone_Bolango_clear.csv"
        );
        assert_eq!(
            processed_filename("Kupang", SkyType::ObservedCloud),
            "processed_10min_Kupang_observed_cloud.csv"
        );
    }

    #[test]
    fn test_extract_station_name() {
        assert_eq!(
            extract_station_name(
                "processed_10min_Bone_Bolango_observed_cloud.csv",
                SkyType::ObservedCloud
            ),
            Some("Bone_Bolango")
        );
        assert_eq!(
            extract_station_name("processed_10min_Kupang_clear.csv", SkyType::Clear),
            Some("Kupang")
        );
    }

    #[test]
    fn test_extract_station_name_rejects_other_files() {
        assert_eq!(
            extract_station_name("raw_1min_Kupang_clear.csv", SkyType::Clear),
            None
        );
        assert_eq!(
            extract_station_name(
                "processed_10min_Kupang_clear.csv",
                SkyType::ObservedCloud
            ),
            None
        );
        assert_eq!(
            extract_station_name(
                "processed_10min__observed_cloud.csv",
                SkyType::ObservedCloud
            ),
            None
        );
    }

    #[test]
    fn test_ground_filenames() {
        assert_eq!(ground_filename("Sleman", 2024), "QC_Sleman_2024_flagged.csv");
        assert_eq!(
            extract_ground_location("QC_Sleman_2024_flagged.csv", 2024),
            Some("Sleman")
        );
        assert_eq!(extract_ground_location("QC_Sleman_2023_flagged.csv", 2024), None);
        assert_eq!(extract_ground_location("other.csv", 2024), None);
    }

    #[test]
    fn test_comparison_chart_filename() {
        assert_eq!(
            comparison_chart_filename("Bone_Bolango"),
            "solar_radiation_comparison_Bone_Bolango.png"
        );
    }
}
