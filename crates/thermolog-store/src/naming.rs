//! Dataset file naming.
//!
//! A dataset's identity is its file name: `LOCATION_TIMESTAMP_SUFFIX.dat`,
//! where TIMESTAMP is the creation time at a fixed granularity. Second
//! granularity keeps names unique even when a location restarts within the
//! same minute; minute granularity matches the legacy naming of already
//! archived files.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::error::Result;

/// Extension shared by all dataset files.
pub const DATASET_EXTENSION: &str = "dat";

const MINUTE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day][hour][minute]");
const SECOND_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");

/// Granularity of the creation timestamp embedded in a dataset name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampGranularity {
    /// `YYYYMMDDHHMM`, unique per location per minute.
    Minute,
    /// `YYYYMMDD_HHMMSS`, unique per location per second.
    #[default]
    Second,
}

impl TimestampGranularity {
    fn format_items(self) -> &'static [BorrowedFormatItem<'static>] {
        match self {
            TimestampGranularity::Minute => MINUTE_FORMAT,
            TimestampGranularity::Second => SECOND_FORMAT,
        }
    }
}

/// Identity of a dataset: location tag, creation time, acquisition kind.
#[derive(Debug, Clone)]
pub struct DatasetName {
    location: String,
    created_at: OffsetDateTime,
    suffix: String,
    granularity: TimestampGranularity,
}

impl DatasetName {
    /// Suffix naming the acquisition kind.
    pub const DEFAULT_SUFFIX: &'static str = "Temperature";

    /// Create a dataset name with the default suffix.
    pub fn new(
        location: impl Into<String>,
        created_at: OffsetDateTime,
        granularity: TimestampGranularity,
    ) -> Self {
        Self {
            location: location.into(),
            created_at,
            suffix: Self::DEFAULT_SUFFIX.to_string(),
            granularity,
        }
    }

    /// Override the acquisition-kind suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// The location tag this dataset belongs to.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The dataset's logical creation time.
    #[must_use]
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Render the file name, e.g. `HoughtonMI_20240102_030405_Temperature.dat`.
    pub fn file_name(&self) -> Result<String> {
        let timestamp = self.created_at.format(self.granularity.format_items())?;
        Ok(format!(
            "{}_{}_{}.{}",
            self.location, timestamp, self.suffix, DATASET_EXTENSION
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_second_granularity_name() {
        let name = DatasetName::new(
            "HoughtonMI",
            datetime!(2024-01-02 03:04:05 UTC),
            TimestampGranularity::Second,
        );
        assert_eq!(
            name.file_name().unwrap(),
            "HoughtonMI_20240102_030405_Temperature.dat"
        );
    }

    #[test]
    fn test_minute_granularity_name() {
        let name = DatasetName::new(
            "TrondheimNOR",
            datetime!(2024-01-02 03:04:05 UTC),
            TimestampGranularity::Minute,
        );
        assert_eq!(
            name.file_name().unwrap(),
            "TrondheimNOR_202401020304_Temperature.dat"
        );
    }

    #[test]
    fn test_custom_suffix() {
        let name = DatasetName::new(
            "ParkCityUT",
            datetime!(2024-12-31 23:59:59 UTC),
            TimestampGranularity::Second,
        )
        .with_suffix("SnowTemperature");
        assert_eq!(
            name.file_name().unwrap(),
            "ParkCityUT_20241231_235959_SnowTemperature.dat"
        );
    }

    #[test]
    fn test_default_granularity_is_second() {
        assert_eq!(
            TimestampGranularity::default(),
            TimestampGranularity::Second
        );
    }

    #[test]
    fn test_created_at_is_preserved() {
        let created = datetime!(2024-06-15 12:00:00 UTC);
        let name = DatasetName::new("CableWI", created, TimestampGranularity::Second);
        assert_eq!(name.created_at(), created);
        assert_eq!(name.location(), "CableWI");
    }
}
