//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

const EXAMPLES: &str = "Examples:
  thermolog BendOR        100
  thermolog CableWI       100
  thermolog HoughtonMI    100
  thermolog MarquetteMI   100
  thermolog ParkCityUT    100
  thermolog TrondheimNOR  100";

/// Record DS18B20 temperature readings and archive them remotely.
#[derive(Debug, Parser)]
#[command(name = "thermolog", version, about, after_help = EXAMPLES)]
pub struct Cli {
    /// Location tag used to name the dataset (e.g. HoughtonMI)
    pub location: String,

    /// Number of measurements to record before stopping
    #[arg(value_name = "COUNTER_MAX", value_parser = clap::value_parser!(u32).range(1..))]
    pub counter_max: u32,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seconds to sleep between measurements (overrides config)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Root of the one-wire device registry (overrides config)
    #[arg(long, value_name = "DIR")]
    pub device_root: Option<PathBuf>,

    /// Directory to create the dataset file in (overrides config)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip the remote archival step
    #[arg(long)]
    pub no_archive: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output (including the per-sample echo)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
