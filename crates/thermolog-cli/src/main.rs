use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use thermolog_cli::acquisition::{AcquisitionLoop, RunOptions};
use thermolog_cli::archive::Archiver;
use thermolog_cli::cli::Cli;
use thermolog_cli::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => Config::load_validated(path)?,
        None => Config::load_default()?,
    };

    // CLI flags override file values.
    if let Some(interval) = cli.interval {
        config.acquisition.poll_interval_secs = interval;
    }
    if let Some(device_root) = &cli.device_root {
        config.acquisition.device_root = device_root.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.acquisition.output_dir = output_dir.clone();
    }
    config.validate()?;

    let options = RunOptions {
        location: cli.location.clone(),
        counter_max: cli.counter_max,
        poll_interval: Duration::from_secs(config.acquisition.poll_interval_secs),
        flush_every: config.acquisition.flush_every,
        granularity: config.acquisition.granularity,
        echo: config.acquisition.echo && !cli.quiet,
        output_dir: config.acquisition.output_dir.clone(),
        browse_url: config.remote.browse_url.clone(),
    };

    let looper = match AcquisitionLoop::discover(&config.acquisition.device_root, options).await
    {
        Ok(looper) => looper,
        Err(e) => {
            eprintln!();
            eprintln!("  {e}");
            eprintln!();
            eprintln!("  The following steps might help before the next attempt:");
            eprintln!("    1. Check the sensor and its connections");
            eprintln!("    2. Reboot the host");
            eprintln!();
            std::process::exit(1);
        }
    };

    let archiver = if cli.no_archive {
        None
    } else {
        Some(Archiver::new(config.remote.clone()))
    };

    // An operator interrupt cancels the run; the loop still drains (flush,
    // close, archive) before the process exits.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, draining before exit");
                cancel.cancel();
            }
        });
    }

    let summary = looper.run(archiver.as_ref(), cancel).await?;

    if !cli.quiet {
        println!();
        println!(
            "# {} measurement(s) recorded to {}",
            summary.recorded,
            summary.dataset.path.display()
        );
        if summary.skipped > 0 {
            println!("# {} poll(s) skipped due to transient read errors", summary.skipped);
        }
        match &summary.transfer {
            Some(outcome) if outcome.all_failed() => {
                println!(
                    "# WARNING: archival to {} failed; the file remains on local storage",
                    outcome.destination
                );
            }
            Some(outcome) => {
                println!(
                    "# archived to {} ({}/{} push(es) succeeded)",
                    outcome.destination, outcome.succeeded, outcome.attempts
                );
            }
            None => {
                println!("# archival skipped");
            }
        }
    }

    // A cancelled run that drained cleanly still exits 0: no data was lost.
    Ok(())
}
