//! Trait abstraction for temperature probes.
//!
//! The [`TemperatureProbe`] trait abstracts over the real sysfs-backed
//! [`crate::W1Probe`] and the [`crate::MockProbe`] used in tests.

use async_trait::async_trait;

use thermolog_types::Measurement;

use crate::error::Result;

/// Trait abstracting a single temperature probe.
///
/// Implement this for any source that can produce a calibrated
/// Celsius/Fahrenheit pair on demand.
///
/// # Example
///
/// ```
/// use thermolog_core::{MockProbe, Result, TemperatureProbe};
///
/// async fn print_reading<P: TemperatureProbe>(probe: &P) -> Result<()> {
///     let m = probe.read_temperature().await?;
///     println!("{}: {:.3} C", probe.id(), m.celsius);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait TemperatureProbe: Send + Sync {
    /// The probe's identifier (e.g. `28-000004b5a2f1`).
    fn id(&self) -> &str;

    /// Take one reading from the probe.
    ///
    /// A transient failure (garbled conversion, I/O hiccup) is returned as
    /// an error with [`crate::Error::is_transient`] set; callers polling on
    /// an interval should skip the tick and try again rather than abort.
    async fn read_temperature(&self) -> Result<Measurement>;
}
