use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Level, LogError, Logger};

// The process-wide logger handed out by `instance`.
static INSTANCE: Mutex<Option<Arc<Logger>>> = Mutex::new(None);

/// Returns the process-wide shared logger, creating it on first use.
///
/// The shared logger appends to [`DEFAULT_LOG_PATH`] in the working
/// directory. When the existing instance's threshold differs from
/// `level`, it is stopped and replaced by a fresh logger; records the
/// old instance had buffered but not yet written are dropped with it.
///
/// [`DEFAULT_LOG_PATH`]: crate::DEFAULT_LOG_PATH
pub fn instance(level: Level) -> Result<Arc<Logger>, LogError> {
    let mut slot = INSTANCE.lock();

    if let Some(logger) = slot.as_ref() {
        if logger.threshold() == level {
            return Ok(Arc::clone(logger));
        }
    }

    // Mismatched threshold: release the old instance before opening
    // the replacement.
    if let Some(old) = slot.take() {
        old.stop();
    }

    let fresh = Arc::new(Logger::new(level)?);
    *slot = Some(Arc::clone(&fresh));

    Ok(fresh)
}

/// Stops and releases the process-wide logger, if one exists.
pub fn teardown() {
    if let Some(logger) = INSTANCE.lock().take() {
        logger.stop();
    }
}
