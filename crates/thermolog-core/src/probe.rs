//! Probe discovery and reading via the one-wire sysfs registry.
//!
//! Every DS18B20 wired into the host shows up as a directory named
//! `28-xxxxxxxxxxxx` under the one-wire device registry (the `28-` family
//! prefix is common to all DS18B20 sensors). The kernel exposes each
//! sensor's latest conversion in a `w1_slave` file inside that directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use thermolog_types::Measurement;

use crate::error::{Error, Result};
use crate::traits::TemperatureProbe;

/// Family prefix shared by all DS18B20 registry entries.
pub const FAMILY_PREFIX: &str = "28-";

/// Default one-wire device registry on a Raspberry Pi.
pub const DEFAULT_DEVICE_ROOT: &str = "/sys/bus/w1/devices";

/// File inside a probe's registry entry holding the latest conversion.
const SLAVE_FILE: &str = "w1_slave";

/// A discovered DS18B20 probe.
///
/// The handle is resolved once at startup and never mutated afterwards; it
/// carries the probe's identifier and the path of its backing data file.
#[derive(Debug, Clone)]
pub struct W1Probe {
    id: String,
    slave_path: PathBuf,
}

impl W1Probe {
    /// Scan the device registry for a DS18B20 entry.
    ///
    /// When several probes are wired in, the first entry in lexical order
    /// wins; multi-sensor fan-in is not supported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProbeNotFound`] when the registry does not exist or
    /// holds no `28-*` entry. A missing sensor is fatal and operator
    /// actionable; callers should not retry.
    pub async fn discover(device_root: impl AsRef<Path>) -> Result<Self> {
        let root = device_root.as_ref();

        let mut entries = tokio::fs::read_dir(root)
            .await
            .map_err(|_| Error::probe_not_found(root))?;

        let mut matches = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|_| Error::probe_not_found(root))?
        {
            let name = entry.file_name();
            if let Some(name) = name.to_str()
                && name.starts_with(FAMILY_PREFIX)
            {
                debug!("found one-wire entry {}", name);
                matches.push(name.to_string());
            }
        }

        matches.sort();
        let id = matches
            .into_iter()
            .next()
            .ok_or_else(|| Error::probe_not_found(root))?;

        info!("using probe {}", id);
        let slave_path = root.join(&id).join(SLAVE_FILE);
        Ok(Self { id, slave_path })
    }

    /// The probe's identifier (its registry directory name).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path of the probe's backing `w1_slave` file.
    #[must_use]
    pub fn slave_path(&self) -> &Path {
        &self.slave_path
    }
}

#[async_trait]
impl TemperatureProbe for W1Probe {
    fn id(&self) -> &str {
        &self.id
    }

    async fn read_temperature(&self) -> Result<Measurement> {
        let payload = tokio::fs::read_to_string(&self.slave_path)
            .await
            .map_err(|e| Error::probe_read(&self.id, e))?;
        Ok(Measurement::from_w1_payload(&payload)?)
    }
}
