//! Append-only dataset writer with periodic force-flush.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::{debug, info};

use thermolog_types::Sample;

use crate::dataset::{Dataset, DatasetMeta};
use crate::error::{Error, Result};
use crate::naming::DatasetName;

/// Separator between record fields. Reserved: it never appears inside a
/// field payload.
pub const FIELD_SEPARATOR: char = '|';

const RECORD_TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Options controlling the writer's flush behavior.
#[derive(Debug, Clone)]
pub struct RecorderOptions {
    /// Force a flush to stable storage after every this many appends.
    pub flush_every: u32,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        Self { flush_every: 5 }
    }
}

/// Serialize one sample as a fixed-width record line (without newline).
///
/// Layout: zero-padded 4-digit sequence, `YYYY-MM-DD HH:MM:SS` timestamp,
/// then Celsius and Fahrenheit zero-padded to width 7 with 3 decimals.
pub fn format_record(sample: &Sample) -> Result<String> {
    let timestamp = sample.timestamp.format(RECORD_TIMESTAMP)?;
    Ok(format!(
        "{seq:04}{sep}{timestamp}{sep}{c:07.3}{sep}{f:07.3}",
        seq = sample.sequence,
        sep = FIELD_SEPARATOR,
        c = sample.celsius,
        f = sample.fahrenheit,
    ))
}

struct Inner {
    writer: BufWriter<File>,
    path: PathBuf,
}

/// Append-only writer for one acquisition run.
///
/// Created once per run; records are buffered and forced to stable storage
/// every [`RecorderOptions::flush_every`] appends, so an abrupt power loss
/// costs at most the records since the last flush boundary. [`close`]
/// flushes once more and seals the file into a [`Dataset`].
///
/// [`close`]: DatasetWriter::close
pub struct DatasetWriter {
    inner: Option<Inner>,
    name: DatasetName,
    meta: DatasetMeta,
    options: RecorderOptions,
    appended: u32,
}

impl DatasetWriter {
    /// Create the dataset file in `dir` and write its header block.
    ///
    /// An existing file of the same name is truncated.
    pub fn create(
        dir: impl AsRef<Path>,
        name: DatasetName,
        meta: DatasetMeta,
        options: RecorderOptions,
    ) -> Result<Self> {
        let file_name = name.file_name()?;
        let path = dir.as_ref().join(&file_name);

        let file = File::create(&path).map_err(|e| Error::Create {
            path: path.clone(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, &file_name, &meta).map_err(Error::Append)?;

        info!("recording to {}", path.display());

        Ok(Self {
            inner: Some(Inner { writer, path }),
            name,
            meta,
            options,
            appended: 0,
        })
    }

    /// Path of the backing file, if the writer is still open.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.inner.as_ref().map(|inner| inner.path.as_path())
    }

    /// Number of samples appended so far.
    #[must_use]
    pub fn appended(&self) -> u32 {
        self.appended
    }

    /// Append one sample, returning the formatted record line for console
    /// echo.
    ///
    /// Every [`RecorderOptions::flush_every`]-th successful append forces
    /// the buffer to stable storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyClosed`] if the writer has been closed.
    pub fn append(&mut self, sample: &Sample) -> Result<String> {
        let inner = self.inner.as_mut().ok_or(Error::AlreadyClosed)?;

        let line = format_record(sample)?;
        writeln!(inner.writer, "{line}").map_err(Error::Append)?;
        self.appended += 1;

        if self.appended % self.options.flush_every == 0 {
            debug!("flushing after {} sample(s)", self.appended);
            flush_inner(inner)?;
        }

        Ok(line)
    }

    /// Force buffered records to stable storage.
    pub fn flush(&mut self) -> Result<()> {
        let inner = self.inner.as_mut().ok_or(Error::AlreadyClosed)?;
        flush_inner(inner)
    }

    /// Flush, release the file handle, and seal the artifact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyClosed`] on a second close; closing twice is
    /// a programming error.
    pub fn close(&mut self) -> Result<Dataset> {
        let mut inner = self.inner.take().ok_or(Error::AlreadyClosed)?;
        flush_inner(&mut inner)?;

        info!(
            "closed {} with {} sample(s)",
            inner.path.display(),
            self.appended
        );

        Ok(Dataset {
            file_name: self.name.file_name()?,
            location: self.name.location().to_string(),
            sensor_id: self.meta.sensor_id.clone(),
            created_at: self.name.created_at(),
            samples: self.appended,
            path: inner.path,
        })
    }
}

fn flush_inner(inner: &mut Inner) -> Result<()> {
    inner.writer.flush().map_err(Error::Flush)?;
    inner.writer.get_ref().sync_data().map_err(Error::Flush)
}

fn write_header(writer: &mut impl Write, file_name: &str, meta: &DatasetMeta) -> std::io::Result<()> {
    writeln!(writer, "#")?;
    writeln!(writer, "# Filename  : {file_name}")?;
    writeln!(writer, "# Sensor    : {}", meta.sensor_description)?;
    writeln!(writer, "# Sensor ID : {}", meta.sensor_id)?;
    writeln!(writer, "# Format    : Counter, Time Stamp, Celsius, Fahrenheit")?;
    writeln!(
        writer,
        "#             Fields are separated by the {FIELD_SEPARATOR} character"
    )?;
    writeln!(writer, "#")?;
    if let Some(url) = &meta.browse_url {
        writeln!(writer, "# Upon successful completion, the file may be viewed at")?;
        writeln!(writer, "# {url}/{file_name}")?;
        writeln!(writer, "#")?;
    }
    Ok(())
}
