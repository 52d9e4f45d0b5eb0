//! End-to-end acquisition tests against a mock probe.
//!
//! These drive the full loop (poll, record, drain, archive) without
//! hardware, using paused tokio time so the 55-second cadence costs
//! nothing.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use thermolog_cli::acquisition::{AcquisitionLoop, RunOptions};
use thermolog_cli::archive::Archiver;
use thermolog_cli::config::RemoteConfig;
use thermolog_core::{MockProbe, Result, TemperatureProbe};
use thermolog_store::TimestampGranularity;
use thermolog_types::Measurement;

fn options(dir: &Path, location: &str, counter_max: u32) -> RunOptions {
    RunOptions {
        location: location.to_string(),
        counter_max,
        poll_interval: Duration::from_secs(55),
        flush_every: 5,
        granularity: TimestampGranularity::Second,
        echo: false,
        output_dir: dir.to_path_buf(),
        browse_url: None,
    }
}

fn body_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn fields(line: &str) -> Vec<String> {
    line.split('|').map(str::to_string).collect()
}

#[tokio::test(start_paused = true)]
async fn records_gapless_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let looper = AcquisitionLoop::with_probe(
        MockProbe::new(21.5),
        options(dir.path(), "HoughtonMI", 10),
    );
    let summary = looper.run(None, CancellationToken::new()).await.unwrap();

    assert_eq!(summary.recorded, 10);
    let lines = body_lines(&summary.dataset.path);
    assert_eq!(lines.len(), 10);
    for (i, line) in lines.iter().enumerate() {
        let fields = fields(line);
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], format!("{:04}", i + 1));
    }
}

#[tokio::test(start_paused = true)]
async fn constant_reading_scenario() {
    // LOCATION="TestSite", COUNTER_MAX=3, sensor pinned at 20.000 C.
    let dir = tempfile::tempdir().unwrap();
    let looper = AcquisitionLoop::with_probe(
        MockProbe::new(20.0),
        options(dir.path(), "TestSite", 3),
    );
    let summary = looper.run(None, CancellationToken::new()).await.unwrap();

    let lines = body_lines(&summary.dataset.path);
    assert_eq!(lines.len(), 3);
    for (i, line) in lines.iter().enumerate() {
        let fields = fields(line);
        assert_eq!(fields[0], format!("{:04}", i + 1));
        assert_eq!(fields[2], "020.000");
        assert_eq!(fields[3], "068.000");
    }
}

#[tokio::test(start_paused = true)]
async fn failed_reads_never_consume_sequence_numbers() {
    // 1 failure among the polls with COUNTER_MAX=5: exactly 5 valid
    // samples recorded, 1 tick skipped, no gap in the numbering.
    let dir = tempfile::tempdir().unwrap();
    let probe = MockProbe::new(20.0);
    probe.fail_next(1);

    let looper = AcquisitionLoop::with_probe(probe, options(dir.path(), "TestSite", 5));
    let summary = looper.run(None, CancellationToken::new()).await.unwrap();

    assert_eq!(summary.recorded, 5);
    assert_eq!(summary.skipped, 1);

    let lines = body_lines(&summary.dataset.path);
    let sequences: Vec<String> = lines.iter().map(|l| fields(l)[0].clone()).collect();
    assert_eq!(sequences, vec!["0001", "0002", "0003", "0004", "0005"]);
}

/// Probe wrapper that fires a cancellation after a fixed number of reads,
/// simulating an operator interrupt landing mid-run.
struct InterruptingProbe {
    inner: MockProbe,
    cancel: CancellationToken,
    after: u32,
}

#[async_trait]
impl TemperatureProbe for InterruptingProbe {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn read_temperature(&self) -> Result<Measurement> {
        if self.inner.read_count() == self.after {
            self.cancel.cancel();
        }
        self.inner.read_temperature().await
    }
}

#[tokio::test(start_paused = true)]
async fn cancellation_mid_run_drains_and_keeps_all_samples() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancellationToken::new();
    let probe = InterruptingProbe {
        inner: MockProbe::new(20.0),
        cancel: cancel.clone(),
        after: 3,
    };

    let looper = AcquisitionLoop::with_probe(probe, options(dir.path(), "TestSite", 100));
    let summary = looper.run(None, cancel).await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.recorded, 4);
    assert_eq!(summary.dataset.samples, 4);

    // Everything appended before the interrupt is on disk, sealed.
    let lines = body_lines(&summary.dataset.path);
    assert_eq!(lines.len(), 4);
    assert_eq!(fields(&lines[3])[0], "0004");
}

#[tokio::test(start_paused = true)]
async fn both_termination_paths_archive_the_dataset() {
    // Count-reached path and cancellation path both run the same drain:
    // the archiver is invoked exactly once with the full attempt budget.
    for cancel_early in [false, true] {
        let dir = tempfile::tempdir().unwrap();
        let count_file = dir.path().join("pushes");
        let remote = RemoteConfig {
            command: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                format!("echo pushed >> {}", count_file.display()),
                "push".to_string(),
            ],
            pause_secs: 0,
            ..Default::default()
        };
        let archiver = Archiver::new(remote);

        let cancel = CancellationToken::new();
        if cancel_early {
            cancel.cancel();
        }

        let looper = AcquisitionLoop::with_probe(
            MockProbe::new(20.0),
            options(dir.path(), "TestSite", 2),
        );
        let summary = looper.run(Some(&archiver), cancel).await.unwrap();

        assert_eq!(summary.cancelled, cancel_early);
        let outcome = summary.transfer.unwrap();
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.succeeded, 3);

        let pushes = std::fs::read_to_string(&count_file).unwrap();
        assert_eq!(pushes.lines().count(), 3, "cancel_early={cancel_early}");
    }
}

#[tokio::test(start_paused = true)]
async fn archival_failure_does_not_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let remote = RemoteConfig {
        command: "false".to_string(),
        args: vec![],
        pause_secs: 0,
        ..Default::default()
    };
    let archiver = Archiver::new(remote);

    let looper = AcquisitionLoop::with_probe(
        MockProbe::new(20.0),
        options(dir.path(), "TestSite", 2),
    );
    let summary = looper.run(Some(&archiver), CancellationToken::new()).await.unwrap();

    let outcome = summary.transfer.unwrap();
    assert!(outcome.all_failed());
    // The dataset is intact on local storage for manual recovery.
    assert_eq!(body_lines(&summary.dataset.path).len(), 2);
}
