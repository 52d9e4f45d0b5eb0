//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use thermolog_store::TimestampGranularity;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Acquisition settings.
    pub acquisition: AcquisitionConfig,
    /// Remote archival settings.
    pub remote: RemoteConfig,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when no file exists.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.acquisition.validate());
        errors.extend(self.remote.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Minimum poll interval in seconds.
pub const MIN_POLL_INTERVAL: u64 = 1;
/// Maximum poll interval in seconds (1 hour).
pub const MAX_POLL_INTERVAL: u64 = 3600;
/// Maximum archival attempt budget.
pub const MAX_ARCHIVE_ATTEMPTS: u32 = 10;

/// Acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Seconds to sleep between measurements. 55 approximates a one-minute
    /// cadence once the 2-3 seconds of sensor read overhead are counted.
    pub poll_interval_secs: u64,
    /// Force a flush to stable storage every this many samples.
    pub flush_every: u32,
    /// Timestamp granularity used in dataset file names.
    pub granularity: TimestampGranularity,
    /// Echo each recorded sample to the console.
    pub echo: bool,
    /// Root of the one-wire device registry.
    pub device_root: PathBuf,
    /// Directory the dataset file is created in.
    pub output_dir: PathBuf,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 55,
            flush_every: 5,
            granularity: TimestampGranularity::default(),
            echo: true,
            device_root: PathBuf::from(thermolog_core::DEFAULT_DEVICE_ROOT),
            output_dir: PathBuf::from("."),
        }
    }
}

impl AcquisitionConfig {
    /// Validate acquisition settings.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.poll_interval_secs < MIN_POLL_INTERVAL {
            errors.push(ValidationError {
                field: "acquisition.poll_interval_secs".to_string(),
                message: format!(
                    "poll interval {} is too short (minimum {} second)",
                    self.poll_interval_secs, MIN_POLL_INTERVAL
                ),
            });
        } else if self.poll_interval_secs > MAX_POLL_INTERVAL {
            errors.push(ValidationError {
                field: "acquisition.poll_interval_secs".to_string(),
                message: format!(
                    "poll interval {} is too long (maximum {} seconds / 1 hour)",
                    self.poll_interval_secs, MAX_POLL_INTERVAL
                ),
            });
        }

        if self.flush_every == 0 {
            errors.push(ValidationError {
                field: "acquisition.flush_every".to_string(),
                message: "flush cadence cannot be 0".to_string(),
            });
        }

        if self.device_root.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "acquisition.device_root".to_string(),
                message: "device registry path cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// Remote archival settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Account on the archive host (passwordless ssh is assumed).
    pub user: String,
    /// Archive host name.
    pub host: String,
    /// Destination directory on the archive host.
    pub path: String,
    /// How many pushes to perform per archival (all of them, always).
    pub attempts: u32,
    /// Seconds to pause between consecutive pushes.
    pub pause_secs: u64,
    /// Base URL under which archived datasets are browsable.
    pub browse_url: Option<String>,
    /// Transfer program invoked per push.
    pub command: String,
    /// Arguments passed to the transfer program before the file and
    /// destination.
    pub args: Vec<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            user: "pi".to_string(),
            host: "archive.local".to_string(),
            path: "/var/lib/thermolog/datasets".to_string(),
            attempts: 3,
            pause_secs: 1,
            browse_url: None,
            command: "rsync".to_string(),
            args: vec!["-az".to_string(), "-e".to_string(), "ssh".to_string()],
        }
    }
}

impl RemoteConfig {
    /// The `user@host:path` destination string passed to the transfer
    /// program.
    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.path)
    }

    /// Validate remote settings.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("remote.user", &self.user),
            ("remote.host", &self.host),
            ("remote.path", &self.path),
            ("remote.command", &self.command),
        ] {
            if value.is_empty() {
                errors.push(ValidationError {
                    field: field.to_string(),
                    message: "cannot be empty".to_string(),
                });
            }
        }

        if self.attempts == 0 {
            errors.push(ValidationError {
                field: "remote.attempts".to_string(),
                message: "attempt budget cannot be 0".to_string(),
            });
        } else if self.attempts > MAX_ARCHIVE_ATTEMPTS {
            errors.push(ValidationError {
                field: "remote.attempts".to_string(),
                message: format!(
                    "attempt budget {} is too large (maximum {})",
                    self.attempts, MAX_ARCHIVE_ATTEMPTS
                ),
            });
        }

        errors
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g. `remote.host`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("thermolog")
        .join("config.toml")
}
