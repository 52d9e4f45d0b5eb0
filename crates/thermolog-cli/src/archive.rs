//! Best-effort transfer of sealed datasets to the archive host.
//!
//! Archival never conditions its retries on observed success: the push is
//! performed a fixed number of times because the transfer primitive (rsync
//! over ssh) is resumable and idempotent: a partial first attempt is
//! completed by the second, and re-pushing a complete file is a no-op on
//! the remote side. Archival failure is reported but never escalated; the
//! dataset stays on local storage for manual recovery.

use std::time::{Duration, SystemTime};

use tokio::process::Command;
use tracing::{info, warn};

use thermolog_core::{RepeatConfig, repeat_attempts};
use thermolog_store::Dataset;

use crate::config::RemoteConfig;

/// Result of one archival call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Push attempts performed (always the full budget).
    pub attempts: u32,
    /// How many pushes exited successfully.
    pub succeeded: u32,
    /// The `user@host:path` destination that was pushed to.
    pub destination: String,
}

impl TransferOutcome {
    /// Whether not a single push succeeded.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.succeeded == 0
    }
}

/// Pushes sealed datasets to the configured archive host.
pub struct Archiver {
    remote: RemoteConfig,
    repeat: RepeatConfig,
}

impl Archiver {
    /// Create an archiver from remote settings.
    pub fn new(remote: RemoteConfig) -> Self {
        let repeat = RepeatConfig::new(remote.attempts)
            .pause(Duration::from_secs(remote.pause_secs));
        Self { remote, repeat }
    }

    /// Re-stamp the artifact's modified time to its logical creation time,
    /// then push it the full attempt budget.
    ///
    /// Never fails: individual push failures are logged and folded into the
    /// returned [`TransferOutcome`].
    pub async fn send(&self, dataset: &Dataset) -> TransferOutcome {
        // Downstream systems sort by mtime; restore the logical creation
        // time in case archival happens long after the run started.
        if let Err(e) = restamp(dataset) {
            warn!(
                "could not restore creation timestamp on {}: {e}",
                dataset.path.display()
            );
        }

        let destination = self.remote.destination();
        info!(
            "archiving {} to {} ({} attempt(s))",
            dataset.file_name, destination, self.repeat.attempts
        );

        let summary =
            repeat_attempts(&self.repeat, "archive push", || self.push(dataset)).await;

        if summary.all_failed() {
            warn!(
                "archival failed after {} attempt(s); {} remains on local storage",
                summary.attempts,
                dataset.path.display()
            );
        }

        TransferOutcome {
            attempts: summary.attempts,
            succeeded: summary.succeeded,
            destination,
        }
    }

    async fn push(&self, dataset: &Dataset) -> std::io::Result<()> {
        let status = Command::new(&self.remote.command)
            .args(&self.remote.args)
            .arg(&dataset.path)
            .arg(self.remote.destination())
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::other(format!(
                "{} exited with {status}",
                self.remote.command
            )))
        }
    }
}

fn restamp(dataset: &Dataset) -> std::io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .append(true)
        .open(&dataset.path)?;
    file.set_modified(SystemTime::from(dataset.created_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use time::macros::datetime;

    fn dataset_in(dir: &Path) -> Dataset {
        let path = dir.join("TestSite_20240102_030405_Temperature.dat");
        std::fs::write(&path, "#\n0001|2024-01-02 03:04:05|020.000|068.000\n").unwrap();
        Dataset {
            path,
            file_name: "TestSite_20240102_030405_Temperature.dat".to_string(),
            location: "TestSite".to_string(),
            sensor_id: "28-000004b5a2f1".to_string(),
            created_at: datetime!(2024-01-02 03:04:05 UTC),
            samples: 1,
        }
    }

    fn remote_running(command: &str, args: Vec<String>) -> RemoteConfig {
        RemoteConfig {
            command: command.to_string(),
            args,
            pause_secs: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_send_performs_full_attempt_budget() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dataset_in(dir.path());
        let count_file = dir.path().join("pushes");

        // A stand-in transfer program that appends one line per invocation;
        // the dataset path and destination arrive as extra arguments.
        let script = format!("echo pushed >> {}", count_file.display());
        let archiver = Archiver::new(remote_running(
            "sh",
            vec!["-c".to_string(), script, "push".to_string()],
        ));

        let outcome = archiver.send(&dataset).await;
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.succeeded, 3);
        assert!(!outcome.all_failed());

        let pushes = std::fs::read_to_string(&count_file).unwrap();
        assert_eq!(pushes.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_send_tolerates_total_failure() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dataset_in(dir.path());

        let archiver = Archiver::new(remote_running("false", vec![]));
        let outcome = archiver.send(&dataset).await;

        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.succeeded, 0);
        assert!(outcome.all_failed());
        // The artifact stays on local storage for manual recovery.
        assert!(dataset.path.exists());
    }

    #[tokio::test]
    async fn test_send_tolerates_missing_transfer_program() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dataset_in(dir.path());

        let archiver = Archiver::new(remote_running("/nonexistent/transfer-program", vec![]));
        let outcome = archiver.send(&dataset).await;

        assert_eq!(outcome.attempts, 3);
        assert!(outcome.all_failed());
    }

    #[tokio::test]
    async fn test_restamp_sets_creation_time() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dataset_in(dir.path());

        let archiver = Archiver::new(remote_running("true", vec![]));
        archiver.send(&dataset).await;

        let mtime = std::fs::metadata(&dataset.path).unwrap().modified().unwrap();
        assert_eq!(mtime, SystemTime::from(dataset.created_at));
    }

    #[tokio::test]
    async fn test_destination_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dataset_in(dir.path());

        let mut remote = remote_running("true", vec![]);
        remote.user = "logger".to_string();
        remote.host = "archive.example.com".to_string();
        remote.path = "/srv/datasets".to_string();

        let outcome = Archiver::new(remote).send(&dataset).await;
        assert_eq!(outcome.destination, "logger@archive.example.com:/srv/datasets");
    }
}
