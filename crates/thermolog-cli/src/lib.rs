//! DS18B20 temperature datalogger with remote archival.
//!
//! This crate provides the `thermolog` binary: a long-running acquisition
//! process that
//!
//! - polls a one-wire DS18B20 probe at a fixed cadence,
//! - appends readings to a durable dataset file with periodic force-flush,
//! - and on completion or interrupt seals the file and pushes it to a
//!   remote archive host, best-effort.
//!
//! # Usage
//!
//! ```text
//! thermolog LOCATION COUNTER_MAX
//! thermolog HoughtonMI 100
//! ```
//!
//! # Configuration
//!
//! Settings are read from `~/.config/thermolog/config.toml`:
//!
//! ```toml
//! [acquisition]
//! poll_interval_secs = 55
//! flush_every = 5
//! granularity = "second"
//! echo = true
//!
//! [remote]
//! user = "pi"
//! host = "archive.example.com"
//! path = "/var/lib/thermolog/datasets"
//! attempts = 3
//! ```

pub mod acquisition;
pub mod archive;
pub mod cli;
pub mod config;
