//! Fixed-budget repetition for idempotent operations.
//!
//! Unlike a conventional retry loop, [`repeat_attempts`] runs its operation
//! a fixed number of times UNCONDITIONALLY: it never stops early on success
//! and never bails out on failure. This fits operations that are themselves
//! idempotent and resumable (such as an rsync push), where a partial attempt
//! N is completed by attempt N+1 and re-running a finished attempt changes
//! nothing on the remote side.
//!
//! # Example
//!
//! ```
//! use thermolog_core::{RepeatConfig, repeat_attempts};
//!
//! # async fn example() {
//! let config = RepeatConfig::new(3);
//! let summary = repeat_attempts(&config, "archive push", || async {
//!     Ok::<(), std::io::Error>(())
//! })
//! .await;
//! assert_eq!(summary.attempts, 3);
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for unconditional repetition.
#[derive(Debug, Clone)]
pub struct RepeatConfig {
    /// Total number of attempts to perform (always all of them).
    pub attempts: u32,
    /// Pause between consecutive attempts.
    pub pause: Duration,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            pause: Duration::from_secs(1),
        }
    }
}

impl RepeatConfig {
    /// Create a config with a custom attempt budget.
    #[must_use]
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts,
            ..Default::default()
        }
    }

    /// Set the pause between attempts.
    #[must_use]
    pub fn pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }
}

/// Outcome of a repeated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatSummary {
    /// How many attempts were performed.
    pub attempts: u32,
    /// How many of them reported success.
    pub succeeded: u32,
}

impl RepeatSummary {
    /// Whether not a single attempt succeeded.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.succeeded == 0
    }
}

/// Run `operation` exactly `config.attempts` times.
///
/// Every attempt is performed regardless of the outcomes of earlier ones.
/// Failures are logged per attempt and folded into the returned
/// [`RepeatSummary`]; the caller decides whether zero successes matters.
pub async fn repeat_attempts<F, Fut, E>(
    config: &RepeatConfig,
    operation_name: &str,
    operation: F,
) -> RepeatSummary
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let mut succeeded = 0;

    for attempt in 1..=config.attempts {
        match operation().await {
            Ok(()) => {
                debug!(
                    "{} attempt {}/{} succeeded",
                    operation_name, attempt, config.attempts
                );
                succeeded += 1;
            }
            Err(e) => {
                warn!(
                    "{} attempt {}/{} failed: {}",
                    operation_name, attempt, config.attempts, e
                );
            }
        }

        if attempt < config.attempts && !config.pause.is_zero() {
            sleep(config.pause).await;
        }
    }

    RepeatSummary {
        attempts: config.attempts,
        succeeded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_repeat_config_default() {
        let config = RepeatConfig::default();
        assert_eq!(config.attempts, 3);
        assert_eq!(config.pause, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_attempts_run_even_on_success() {
        let config = RepeatConfig::new(3);
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let summary = repeat_attempts(&config, "test", || {
            let calls = Arc::clone(&calls_clone);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<(), std::io::Error>(())
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.succeeded, 3);
        assert!(!summary.all_failed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_attempts_run_on_failure() {
        let config = RepeatConfig::new(3);
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let summary = repeat_attempts(&config, "test", || {
            let calls = Arc::clone(&calls_clone);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(std::io::Error::other("transfer refused"))
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(summary.succeeded, 0);
        assert!(summary.all_failed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_outcomes_are_counted() {
        let config = RepeatConfig::new(3).pause(Duration::ZERO);
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let summary = repeat_attempts(&config, "test", || {
            let calls = Arc::clone(&calls_clone);
            async move {
                // Fail the first attempt only.
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(std::io::Error::other("network loss"))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.succeeded, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_budget() {
        let config = RepeatConfig::new(1);
        let summary = repeat_attempts(&config, "test", || async {
            Ok::<(), std::io::Error>(())
        })
        .await;
        assert_eq!(summary, RepeatSummary {
            attempts: 1,
            succeeded: 1
        });
    }
}
