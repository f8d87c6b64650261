use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
};

/// A line-oriented destination for rendered log records.
///
/// The writer thread owns the sink while appending, so implementations
/// only need to be [`Send`]. Resources are released on drop.
pub trait RecordSink: Send {
    /// Appends one rendered record.
    fn append(&mut self, line: &str) -> io::Result<()>;

    /// Flushes buffered output, if any.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A [`RecordSink`] appending records to a file, one per line.
#[derive(Debug)]
pub struct FileSink {
    file: File,
}

impl FileSink {
    /// Opens the file at `path` for appending, creating it if it does
    /// not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl RecordSink for FileSink {
    fn append(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.file, "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
