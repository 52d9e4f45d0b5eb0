//! The acquisition state machine.
//!
//! One [`AcquisitionLoop`] instance owns everything a run needs: the probe,
//! the dataset writer, and the sample counter. The lifecycle is
//!
//! ```text
//! Idle -> Discovering -> Running -> Draining -> Terminated
//! ```
//!
//! Both terminal triggers, the configured sample count being reached and
//! an operator interrupt, funnel through the same [`drain`] sequence
//! (flush, close, archive), so the artifact is archived regardless of how
//! the run ended.
//!
//! [`drain`]: AcquisitionLoop::run

use std::path::{Path, PathBuf};
use std::time::Duration;

use time::OffsetDateTime;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use thermolog_core::{TemperatureProbe, W1Probe};
use thermolog_store::{
    Dataset, DatasetMeta, DatasetName, DatasetWriter, RecorderOptions, TimestampGranularity,
};
use thermolog_types::Sample;

use crate::archive::{Archiver, TransferOutcome};

/// Lifecycle phase of an acquisition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, nothing touched yet.
    Idle,
    /// Looking for the probe in the device registry.
    Discovering,
    /// Polling, recording, sleeping.
    Running,
    /// Sealing the dataset and archiving it.
    Draining,
    /// Run finished; the summary is final.
    Terminated,
}

/// Parameters for one acquisition run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Location tag used to name the dataset.
    pub location: String,
    /// Stop after this many recorded samples.
    pub counter_max: u32,
    /// Sleep between successive polls.
    pub poll_interval: Duration,
    /// Force-flush cadence of the dataset writer.
    pub flush_every: u32,
    /// Timestamp granularity of the dataset file name.
    pub granularity: TimestampGranularity,
    /// Echo each recorded sample to the console.
    pub echo: bool,
    /// Directory the dataset file is created in.
    pub output_dir: PathBuf,
    /// Base URL written into the header, if archived copies are browsable.
    pub browse_url: Option<String>,
}

/// Summary of a finished run.
#[derive(Debug)]
pub struct RunSummary {
    /// Samples recorded into the dataset.
    pub recorded: u32,
    /// Polls skipped because of transient read failures.
    pub skipped: u32,
    /// Whether the run was cut short by an operator interrupt.
    pub cancelled: bool,
    /// The sealed artifact.
    pub dataset: Dataset,
    /// Archival outcome, when archival was enabled.
    pub transfer: Option<TransferOutcome>,
}

/// Errors that end a run early.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    /// Probe discovery or a non-transient read failure.
    #[error("probe failure: {0}")]
    Probe(#[from] thermolog_core::Error),
    /// The dataset could not be written or sealed.
    #[error("dataset failure: {0}")]
    Record(#[from] thermolog_store::Error),
}

/// The acquisition loop, generic over the probe so tests can substitute a
/// mock.
pub struct AcquisitionLoop<P> {
    probe: P,
    options: RunOptions,
    phase: Phase,
}

impl AcquisitionLoop<W1Probe> {
    /// Discover the probe under `device_root` and prepare a run.
    ///
    /// # Errors
    ///
    /// Returns [`thermolog_core::Error::ProbeNotFound`] when no DS18B20 is
    /// wired in; this is fatal and operator-actionable.
    pub async fn discover(
        device_root: impl AsRef<Path>,
        options: RunOptions,
    ) -> Result<Self, AcquisitionError> {
        debug!("scanning {} for a probe", device_root.as_ref().display());
        let probe = W1Probe::discover(device_root).await?;
        Ok(Self {
            probe,
            options,
            phase: Phase::Discovering,
        })
    }
}

impl<P: TemperatureProbe> AcquisitionLoop<P> {
    /// Prepare a run with an already-resolved probe.
    pub fn with_probe(probe: P, options: RunOptions) -> Self {
        Self {
            probe,
            options,
            phase: Phase::Idle,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run to completion: poll, record, then drain (seal and archive).
    ///
    /// The loop polls the probe once per tick. A transient read failure
    /// skips the tick without advancing the sequence counter, so recorded
    /// sequence numbers stay gapless. Cancelling the token at any point
    /// during the run still executes the full drain.
    pub async fn run(
        mut self,
        archiver: Option<&Archiver>,
        cancel: CancellationToken,
    ) -> Result<RunSummary, AcquisitionError> {
        let name = DatasetName::new(
            self.options.location.clone(),
            OffsetDateTime::now_utc(),
            self.options.granularity,
        );
        let mut meta = DatasetMeta::for_sensor(self.probe.id());
        if let Some(url) = &self.options.browse_url {
            meta = meta.browse_url(url.clone());
        }
        let mut writer = DatasetWriter::create(
            &self.options.output_dir,
            name,
            meta,
            RecorderOptions {
                flush_every: self.options.flush_every,
            },
        )?;

        self.phase = Phase::Running;
        info!(
            "recording {} measurement(s) for {} every {:?}",
            self.options.counter_max, self.options.location, self.options.poll_interval
        );

        let mut recorded = 0u32;
        let mut skipped = 0u32;
        let mut cancelled = false;

        while recorded < self.options.counter_max {
            match self.probe.read_temperature().await {
                Ok(measurement) => {
                    let sample =
                        Sample::new(recorded + 1, OffsetDateTime::now_utc(), measurement);
                    let line = writer.append(&sample)?;
                    recorded += 1;
                    if self.options.echo {
                        println!("{line}");
                    }
                }
                Err(e) if e.is_transient() => {
                    skipped += 1;
                    warn!("probe read failed, skipping this tick: {e}");
                }
                Err(e) => return Err(e.into()),
            }

            if recorded == self.options.counter_max {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("interrupt received during run");
                    cancelled = true;
                    break;
                }
                _ = sleep(self.options.poll_interval) => {}
            }
        }

        self.phase = Phase::Draining;
        info!("{recorded} measurement(s) recorded, sealing the dataset");

        let dataset = writer.close()?;
        let transfer = match archiver {
            Some(archiver) => Some(archiver.send(&dataset).await),
            None => None,
        };

        self.phase = Phase::Terminated;
        Ok(RunSummary {
            recorded,
            skipped,
            cancelled,
            dataset,
            transfer,
        })
    }
}
