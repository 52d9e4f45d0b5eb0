//! One-wire probe discovery and reading for DS18B20 temperature sensors.
//!
//! This crate provides the sensor side of the acquisition pipeline:
//!
//! - **Discovery**: locate a DS18B20 entry under the one-wire sysfs registry
//! - **Reading**: parse the probe's `w1_slave` payload into a calibrated
//!   Celsius/Fahrenheit pair
//! - **Testing**: a [`MockProbe`] with failure injection, usable anywhere a
//!   [`TemperatureProbe`] is accepted
//! - **Repetition**: a fixed-budget combinator for idempotent operations
//!   that are re-run unconditionally
//!
//! # Quick Start
//!
//! ```no_run
//! use thermolog_core::{TemperatureProbe, W1Probe};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let probe = W1Probe::discover(thermolog_core::DEFAULT_DEVICE_ROOT).await?;
//!     let measurement = probe.read_temperature().await?;
//!     println!("{:.3} C / {:.3} F", measurement.celsius, measurement.fahrenheit);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod mock;
pub mod probe;
pub mod repeat;
pub mod traits;

pub use error::{Error, Result};
pub use mock::MockProbe;
pub use probe::{DEFAULT_DEVICE_ROOT, FAMILY_PREFIX, W1Probe};
pub use repeat::{RepeatConfig, RepeatSummary, repeat_attempts};
pub use traits::TemperatureProbe;
