use crate::types::date_range::DateRange;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "paca_climate";
const ARTIFACT_PREFIX: &str = "openmeteo_paca";

/// Platform data directory for the pipeline, or `./data` when none is known.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn artifact_stem(range: DateRange) -> String {
    format!(
        "{}_{}_{}",
        ARTIFACT_PREFIX,
        range.start().format("%Y-%m-%d"),
        range.end().format("%Y-%m-%d")
    )
}

pub fn raw_artifact_path(data_dir: &Path, range: DateRange) -> PathBuf {
    data_dir
        .join("raw")
        .join(format!("{}.csv", artifact_stem(range)))
}

pub fn processed_artifact_path(data_dir: &Path, range: DateRange) -> PathBuf {
    data_dir
        .join("processed")
        .join(format!("{}_processed.csv", artifact_stem(range)))
}

pub fn summary_artifact_path(data_dir: &Path, range: DateRange) -> PathBuf {
    data_dir
        .join("processed")
        .join(format!("{}_yearly.csv", artifact_stem(range)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_artifact_paths() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2013, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        )
        .unwrap();
        let root = Path::new("data");
        assert_eq!(
            raw_artifact_path(root, range),
            Path::new("data/raw/openmeteo_paca_2013-01-01_2023-12-31.csv")
        );
        assert_eq!(
            processed_artifact_path(root, range),
            Path::new("data/processed/openmeteo_paca_2013-01-01_2023-12-31_processed.csv")
        );
        assert_eq!(
            summary_artifact_path(root, range),
            Path::new("data/processed/openmeteo_paca_2013-01-01_2023-12-31_yearly.csv")
        );
    }
}
