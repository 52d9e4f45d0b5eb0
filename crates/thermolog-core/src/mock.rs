//! Mock probe implementation for testing.
//!
//! [`MockProbe`] implements the [`TemperatureProbe`] trait, allowing it to
//! stand in for real hardware in the acquisition loop and in unit tests.
//!
//! # Features
//!
//! - **Fixed readings**: returns a configurable Celsius value
//! - **Failure injection**: fail the next N reads, or fail every read
//! - **Latency simulation**: add artificial delays to reads

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use thermolog_types::{Measurement, ParseError};

use crate::error::{Error, Result};
use crate::traits::TemperatureProbe;

/// A mock temperature probe for testing.
///
/// # Example
///
/// ```
/// use thermolog_core::{MockProbe, TemperatureProbe};
///
/// #[tokio::main]
/// async fn main() {
///     let probe = MockProbe::new(20.0);
///     let m = probe.read_temperature().await.unwrap();
///     assert_eq!(m.fahrenheit, 68.0);
/// }
/// ```
pub struct MockProbe {
    id: String,
    celsius: RwLock<f64>,
    read_count: AtomicU32,
    should_fail: AtomicBool,
    /// Number of upcoming reads to fail before succeeding again.
    remaining_failures: AtomicU32,
    /// Simulated read latency in milliseconds (0 = no delay).
    read_latency_ms: AtomicU64,
}

impl std::fmt::Debug for MockProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProbe")
            .field("id", &self.id)
            .field("read_count", &self.read_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl MockProbe {
    /// Create a mock probe that reports the given Celsius value.
    pub fn new(celsius: f64) -> Self {
        Self::with_id(
            &format!("28-{:012x}", rand::random::<u64>() & 0xffff_ffff_ffff),
            celsius,
        )
    }

    /// Create a mock probe with a specific identifier.
    pub fn with_id(id: &str, celsius: f64) -> Self {
        Self {
            id: id.to_string(),
            celsius: RwLock::new(celsius),
            read_count: AtomicU32::new(0),
            should_fail: AtomicBool::new(false),
            remaining_failures: AtomicU32::new(0),
            read_latency_ms: AtomicU64::new(0),
        }
    }

    /// Change the reported Celsius value.
    pub async fn set_celsius(&self, celsius: f64) {
        *self.celsius.write().await = celsius;
    }

    /// Make every subsequent read fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    /// Fail the next `count` reads, then succeed again.
    pub fn fail_next(&self, count: u32) {
        self.remaining_failures.store(count, Ordering::SeqCst);
    }

    /// Add an artificial delay to each read.
    pub fn set_read_latency(&self, latency: Duration) {
        self.read_latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of reads attempted so far (including failed ones).
    pub fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> bool {
        if self.should_fail.load(Ordering::SeqCst) {
            return true;
        }
        self.remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl TemperatureProbe for MockProbe {
    fn id(&self) -> &str {
        &self.id
    }

    async fn read_temperature(&self) -> Result<Measurement> {
        self.read_count.fetch_add(1, Ordering::SeqCst);

        let latency = self.read_latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.take_failure() {
            // Simulate a garbled conversion, the common transient failure mode.
            return Err(Error::Parse(ParseError::CrcFailed));
        }

        Ok(Measurement::from_celsius(*self.celsius.read().await))
    }
}
