//! The sealed dataset artifact and its descriptive metadata.

use std::path::PathBuf;

use time::OffsetDateTime;

/// Static description of the dataset being recorded, written into the
/// header block once at creation.
#[derive(Debug, Clone)]
pub struct DatasetMeta {
    /// Identifier of the probe the data came from.
    pub sensor_id: String,
    /// Human-readable sensor description.
    pub sensor_description: String,
    /// Base URL under which the archived copy will be browsable, if any.
    pub browse_url: Option<String>,
}

impl DatasetMeta {
    /// Metadata for a DS18B20 probe with the given identifier.
    pub fn for_sensor(sensor_id: impl Into<String>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            sensor_description: "DS18B20 w/ Raspberry Pi".to_string(),
            browse_url: None,
        }
    }

    /// Set the base URL under which the archived copy will be browsable.
    #[must_use]
    pub fn browse_url(mut self, url: impl Into<String>) -> Self {
        self.browse_url = Some(url.into());
        self
    }
}

/// A sealed, immutable acquisition artifact.
///
/// Produced exactly once per run by [`crate::DatasetWriter::close`]. The
/// backing file is never reopened for writing; the only operation left is
/// handing it to archival.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Where the file lives on local storage.
    pub path: PathBuf,
    /// The file name (the dataset's identity).
    pub file_name: String,
    /// Location tag the run was recorded for.
    pub location: String,
    /// Identifier of the probe the data came from.
    pub sensor_id: String,
    /// Logical creation time of the dataset.
    pub created_at: OffsetDateTime,
    /// Number of samples in the body.
    pub samples: u32,
}
