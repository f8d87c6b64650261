use std::{
    io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicU8, Ordering},
        Arc,
    },
    thread,
};

use baton_queue::HandoffQueue;
use log::Log;
use parking_lot::Mutex;
use thiserror::Error;

use crate::{FileSink, Level, RecordSink};

/// The log file used when no explicit path is configured, relative
/// to the working directory.
pub const DEFAULT_LOG_PATH: &str = "baton.log";

/// The default bound on rendered records awaiting the writer thread.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

const WRITER_NAME: &str = "baton-logger";

/// Errors that may occur while configuring a [`Logger`].
#[derive(Debug, Error)]
pub enum LogError {
    /// The log file could not be opened. The previously active sink,
    /// if any, stays in place.
    #[error("failed to open log file '{}': {source}", .path.display())]
    Open {
        /// The path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The writer thread could not be spawned.
    #[error("failed to spawn log writer thread: {0}")]
    Spawn(io::Error),
}

/// Renders one record: local timestamp, level tag, message.
pub fn format_record(level: Level, message: &str) -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("{timestamp} [{level}] {message}")
}

// State shared between the logger handle and its writer thread.
struct Shared {
    records: HandoffQueue<String>,
    sink: Mutex<Box<dyn RecordSink>>,
}

fn writer_loop(shared: &Shared) {
    while let Some(line) = shared.records.take() {
        // A failing sink must not take the writer down; a broken one
        // gets replaced through `set_path` or `set_sink`.
        let _ = shared.sink.lock().append(&line);
    }
}

/// An asynchronous log sink.
///
/// Records below the severity threshold are discarded outright; the
/// rest are rendered and enqueued for a dedicated writer thread which
/// appends them to the configured [`RecordSink`]. Logging calls block
/// only while the record queue is at capacity.
///
/// [`Logger::stop`] stops the queue and joins the writer; records not
/// yet written stay buffered and get flushed by the writer spawned on
/// a subsequent [`Logger::start`]. Dropping the logger stops it.
pub struct Logger {
    shared: Arc<Shared>,
    threshold: AtomicU8,
    // The path backing the current sink, `None` after `set_sink`.
    path: Mutex<Option<PathBuf>>,
    writer: Mutex<Option<thread::JoinHandle<()>>>,
    running: AtomicBool,
}

impl Logger {
    /// Returns a [`Builder`] for configuring a logger.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Creates a logger appending to [`DEFAULT_LOG_PATH`].
    pub fn new(threshold: Level) -> Result<Self, LogError> {
        Self::builder().threshold(threshold).build()
    }

    /// Creates a logger appending to the file at `path`.
    pub fn to_file<P: Into<PathBuf>>(threshold: Level, path: P) -> Result<Self, LogError> {
        Self::builder().threshold(threshold).path(path).build()
    }

    /// Creates a logger draining into a caller-provided sink.
    pub fn with_sink(threshold: Level, sink: Box<dyn RecordSink>) -> Result<Self, LogError> {
        Self::builder().threshold(threshold).sink(sink).build()
    }

    /// Renders `message` and enqueues it for the writer thread, if
    /// `level` meets the threshold.
    ///
    /// Blocks while the record queue is at capacity. Records offered
    /// while the logger is stopped are discarded.
    pub fn write(&self, level: Level, message: &str) {
        if level > self.threshold() {
            return;
        }

        let record = format_record(level, message);
        let _ = self.shared.records.put(record);
    }

    /// The minimum severity currently retained.
    pub fn threshold(&self) -> Level {
        Level::from_repr(self.threshold.load(Ordering::Relaxed))
    }

    /// Changes the severity threshold for records offered from now
    /// on. Already-enqueued records are unaffected.
    pub fn set_threshold(&self, level: Level) {
        self.threshold.store(level as u8, Ordering::Relaxed);
    }

    /// Redirects output to the file at `path`, creating it if needed.
    ///
    /// The new file is opened first and swapped in only on success,
    /// so a failure leaves the previous sink active. Setting the path
    /// the sink already writes to is a no-op.
    pub fn set_path<P: AsRef<Path>>(&self, path: P) -> Result<(), LogError> {
        let path = path.as_ref();

        let mut current = self.path.lock();
        if current.as_deref() == Some(path) {
            return Ok(());
        }

        let sink = FileSink::open(path).map_err(|source| LogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        *self.shared.sink.lock() = Box::new(sink);
        *current = Some(path.to_path_buf());

        Ok(())
    }

    /// Replaces the sink with a caller-provided one.
    pub fn set_sink(&self, sink: Box<dyn RecordSink>) {
        let mut current = self.path.lock();
        *self.shared.sink.lock() = sink;
        *current = None;
    }

    /// The path backing the current sink, if it is a file this logger
    /// opened itself.
    pub fn path(&self) -> Option<PathBuf> {
        self.path.lock().clone()
    }

    /// Stops the logger: the record queue is stopped, the writer
    /// finishes the record it is currently appending and the thread
    /// is joined.
    ///
    /// Records still queued are not written; they stay buffered until
    /// the next [`Logger::start`]. Idempotent, also under concurrent
    /// calls.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        self.shared.records.stop();
        let writer = self.writer.lock().take();
        if let Some(writer) = writer {
            let _ = writer.join();
        }
    }

    /// Restarts a stopped logger with a fresh writer thread, which
    /// first works off any records buffered before the stop. No-op
    /// while the logger is running.
    pub fn start(&self) -> Result<(), LogError> {
        let mut writer = self.writer.lock();
        if self.running.load(Ordering::SeqCst) {
            return Ok(());
        }

        self.shared.records.start();

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name(WRITER_NAME.into())
            .spawn(move || writer_loop(&shared))
            .map_err(LogError::Spawn)?;

        *writer = Some(handle);
        self.running.store(true, Ordering::SeqCst);

        Ok(())
    }

    /// Whether the writer thread is currently draining records.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        Level::from(metadata.level()) <= self.threshold()
    }

    fn log(&self, record: &log::Record<'_>) {
        let level = Level::from(record.level());
        if level <= self.threshold() {
            self.write(level, &record.args().to_string());
        }
    }

    fn flush(&self) {
        let _ = self.shared.sink.lock().flush();
    }
}

/// Installs `logger` as the backend of the [`log`] macro facade, so
/// the `log::info!` family feeds this sink.
///
/// The facade accepts one logger per process; further calls fail.
/// The facade's max level is set to match the logger's threshold at
/// install time and does not track later threshold changes.
pub fn install(logger: Arc<Logger>) -> Result<(), log::SetLoggerError> {
    let threshold = logger.threshold();
    log::set_boxed_logger(Box::new(Installed(logger)))?;
    log::set_max_level(threshold.to_level_filter());

    Ok(())
}

// Facade adapter over a shared logger handle.
struct Installed(Arc<Logger>);

impl Log for Installed {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.0.enabled(metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        self.0.log(record);
    }

    fn flush(&self) {
        self.0.flush();
    }
}

enum Target {
    Path(PathBuf),
    Sink(Box<dyn RecordSink>),
}

/// A builder for configuring a [`Logger`].
///
/// Obtained through [`Logger::builder`].
pub struct Builder {
    threshold: Level,
    queue_capacity: usize,
    target: Target,
}

impl Builder {
    fn new() -> Self {
        Self {
            threshold: Level::Debug,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            target: Target::Path(DEFAULT_LOG_PATH.into()),
        }
    }

    /// Sets the minimum severity to retain. Defaults to
    /// [`Level::Debug`], which retains everything.
    pub fn threshold(mut self, level: Level) -> Self {
        self.threshold = level;
        self
    }

    /// Bounds the record queue to `capacity` rendered records.
    ///
    /// Once the bound is reached, [`Logger::write`] blocks until the
    /// writer catches up. Defaults to [`DEFAULT_QUEUE_CAPACITY`].
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Appends records to the file at `path`, created on demand.
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.target = Target::Path(path.into());
        self
    }

    /// Drains records into a caller-provided sink instead of a file.
    pub fn sink(mut self, sink: Box<dyn RecordSink>) -> Self {
        self.target = Target::Sink(sink);
        self
    }

    /// Builds the logger and spawns its writer thread.
    pub fn build(self) -> Result<Logger, LogError> {
        let (sink, path): (Box<dyn RecordSink>, _) = match self.target {
            Target::Path(path) => {
                let sink = FileSink::open(&path).map_err(|source| LogError::Open {
                    path: path.clone(),
                    source,
                })?;
                (Box::new(sink), Some(path))
            }
            Target::Sink(sink) => (sink, None),
        };

        let logger = Logger {
            shared: Arc::new(Shared {
                records: HandoffQueue::with_capacity(self.queue_capacity),
                sink: Mutex::new(sink),
            }),
            threshold: AtomicU8::new(self.threshold as u8),
            path: Mutex::new(path),
            writer: Mutex::new(None),
            running: AtomicBool::new(false),
        };
        logger.start()?;

        Ok(logger)
    }
}
