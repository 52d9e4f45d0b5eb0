//! Platform-agnostic types for DS18B20 temperature acquisition.
//!
//! This crate provides the shared data types used by the acquisition
//! pipeline: the calibrated [`Measurement`] pair, the sequenced [`Sample`],
//! and parsing of the one-wire `w1_slave` payload format.
//!
//! # Example
//!
//! ```
//! use thermolog_types::Measurement;
//!
//! let payload = "4b 46 7f ff 0c 10 da : crc=da YES\n4b 46 7f ff 0c 10 da t=23062\n";
//! let measurement = Measurement::from_w1_payload(payload).unwrap();
//! assert!((measurement.celsius - 23.062).abs() < 1e-9);
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{Measurement, Sample, celsius_to_fahrenheit};
