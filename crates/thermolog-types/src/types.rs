//! Core types for temperature acquisition.

use time::OffsetDateTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// Marker token preceding the milli-degree value in a `w1_slave` payload.
pub const TEMPERATURE_MARKER: &str = "t=";

/// Convert a temperature from Celsius to Fahrenheit.
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

/// One calibrated temperature pair as read from a probe.
///
/// Fahrenheit is always derived from Celsius; construct values through
/// [`Measurement::from_celsius`] or [`Measurement::from_w1_payload`] so the
/// two fields never drift apart.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    /// Temperature in degrees Celsius.
    pub celsius: f64,
    /// Temperature in degrees Fahrenheit, derived from `celsius`.
    pub fahrenheit: f64,
}

impl Measurement {
    /// Create a measurement from a Celsius value, deriving Fahrenheit.
    #[must_use]
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius,
            fahrenheit: celsius_to_fahrenheit(celsius),
        }
    }

    /// Parse a DS18B20 `w1_slave` payload into a measurement.
    ///
    /// The payload is line-oriented. The first line ends with the result of
    /// the sensor's CRC check (`YES` or `NO`); the second line carries the
    /// temperature as an integer in milli-degrees Celsius after the `t=`
    /// marker:
    ///
    /// ```text
    /// 4b 46 7f ff 0c 10 da : crc=da YES
    /// 4b 46 7f ff 0c 10 da t=23062
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::TruncatedPayload`] when fewer than two lines are
    /// present, [`ParseError::CrcFailed`] when the sensor reported a failed
    /// check, [`ParseError::MarkerNotFound`] when the `t=` token is absent,
    /// and [`ParseError::InvalidValue`] when the value after the marker is
    /// not an integer.
    pub fn from_w1_payload(payload: &str) -> ParseResult<Self> {
        let mut lines = payload.lines();
        let crc_line = lines.next().ok_or(ParseError::TruncatedPayload {
            expected: 2,
            actual: 0,
        })?;
        let data_line = lines.next().ok_or(ParseError::TruncatedPayload {
            expected: 2,
            actual: 1,
        })?;

        if crc_line.trim_end().ends_with("NO") {
            return Err(ParseError::CrcFailed);
        }

        let (_, raw) = data_line
            .rsplit_once(TEMPERATURE_MARKER)
            .ok_or(ParseError::MarkerNotFound {
                marker: TEMPERATURE_MARKER,
            })?;

        let millidegrees: i32 = raw
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidValue(raw.trim().to_string()))?;

        Ok(Self::from_celsius(f64::from(millidegrees) / 1000.0))
    }
}

/// One timestamped temperature reading with its sequence number.
///
/// Sequence numbers start at 1 and increase by exactly 1 per recorded
/// sample; the acquisition loop only advances the counter after a sample has
/// been appended successfully, so a dataset never contains gaps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Position of this sample within its dataset (1-based, gapless).
    pub sequence: u32,
    /// When the reading was taken, at second precision.
    pub timestamp: OffsetDateTime,
    /// Temperature in degrees Celsius.
    pub celsius: f64,
    /// Temperature in degrees Fahrenheit, derived from `celsius`.
    pub fahrenheit: f64,
}

impl Sample {
    /// Stamp a measurement with its sequence number and timestamp.
    #[must_use]
    pub fn new(sequence: u32, timestamp: OffsetDateTime, measurement: Measurement) -> Self {
        Self {
            sequence,
            timestamp,
            celsius: measurement.celsius,
            fahrenheit: measurement.fahrenheit,
        }
    }
}
