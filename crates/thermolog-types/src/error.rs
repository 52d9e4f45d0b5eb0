//! Error types for payload parsing.

use thiserror::Error;

/// Errors that can occur when parsing a sensor payload.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The payload had fewer lines than the format requires.
    #[error("truncated payload: expected at least {expected} line(s), got {actual}")]
    TruncatedPayload {
        /// Number of lines the format requires.
        expected: usize,
        /// Number of lines actually present.
        actual: usize,
    },

    /// The temperature marker token was not present in the payload.
    #[error("temperature marker '{marker}' not found in payload")]
    MarkerNotFound {
        /// The marker token that was searched for.
        marker: &'static str,
    },

    /// The value after the marker was not a valid milli-degree integer.
    #[error("invalid temperature value '{0}'")]
    InvalidValue(String),

    /// The sensor reported a failed CRC check for this conversion.
    #[error("sensor reported a CRC failure")]
    CrcFailed,
}

/// Result type alias for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
