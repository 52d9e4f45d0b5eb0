//! Error types for thermolog-core.
//!
//! Errors fall into two classes that the polling loop treats differently:
//!
//! - **Fatal**: [`Error::ProbeNotFound`]. The sensor is missing from the
//!   device registry; no retry will help, the operator has to fix the wiring
//!   or reboot the host.
//! - **Transient**: [`Error::ProbeRead`] and [`Error::Parse`]. A single
//!   conversion was garbled or the backing file read failed. The next poll
//!   usually succeeds, so the caller skips the tick and tries again.
//!
//! [`Error::is_transient`] encodes this classification.

use std::path::PathBuf;

use thiserror::Error;

use thermolog_types::ParseError;

/// Errors that can occur when discovering or reading a probe.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No DS18B20 entry was found under the one-wire device registry.
    #[error("no DS18B20 probe found under {path} (expected a '{prefix}*' entry)")]
    ProbeNotFound {
        /// The registry directory that was scanned.
        path: PathBuf,
        /// The family prefix that was searched for.
        prefix: &'static str,
    },

    /// Reading the probe's backing `w1_slave` file failed.
    #[error("failed to read probe {id}: {source}")]
    ProbeRead {
        /// Identifier of the probe being read.
        id: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The probe returned a payload that could not be parsed.
    #[error("invalid probe payload: {0}")]
    Parse(#[from] ParseError),

    /// I/O error outside of a probe read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a probe-not-found error for a registry path.
    pub fn probe_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ProbeNotFound {
            path: path.into(),
            prefix: crate::probe::FAMILY_PREFIX,
        }
    }

    /// Create a probe read error with the probe's identifier.
    pub fn probe_read(id: impl Into<String>, source: std::io::Error) -> Self {
        Self::ProbeRead {
            id: id.into(),
            source,
        }
    }

    /// Whether the condition is expected to clear on a later poll.
    ///
    /// A transient error means the current tick should be skipped without
    /// advancing the sample sequence; a non-transient error means further
    /// progress is impossible.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            // A missing sensor will not reappear without operator action.
            Error::ProbeNotFound { .. } => false,
            // A garbled conversion or a failed file read clears on the next poll.
            Error::ProbeRead { .. } => true,
            Error::Parse(_) => true,
            Error::Io(_) => true,
        }
    }
}

/// Result type alias using thermolog-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
