//! Durable dataset persistence for temperature acquisition runs.
//!
//! This crate owns the on-disk artifact produced by an acquisition run:
//!
//! - [`DatasetName`]: the `LOCATION_TIMESTAMP_SUFFIX.dat` naming scheme,
//!   with configurable timestamp granularity
//! - [`DatasetWriter`]: append-only record writer with a comment-marked
//!   header block and periodic force-flush to stable storage
//! - [`Dataset`]: the sealed, immutable artifact returned by
//!   [`DatasetWriter::close`]
//!
//! # File format
//!
//! Plain text, newline-terminated. The header is a block of `#`-prefixed
//! lines; the body is one fixed-width record per sample:
//!
//! ```text
//! 0001|2024-01-02 03:04:05|020.000|068.000
//! ```

pub mod dataset;
pub mod error;
pub mod naming;
pub mod recorder;

pub use dataset::{Dataset, DatasetMeta};
pub use error::{Error, Result};
pub use naming::{DatasetName, TimestampGranularity};
pub use recorder::{DatasetWriter, FIELD_SEPARATOR, RecorderOptions, format_record};
