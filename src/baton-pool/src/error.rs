use std::io;

use thiserror::Error;

use crate::BadConfiguration;

/// Errors that may occur while building or starting a [`WorkerPool`].
///
/// [`WorkerPool`]: crate::WorkerPool
#[derive(Debug, Error)]
pub enum PoolError {
    /// The environment supplied an unusable worker thread count.
    #[error(transparent)]
    Config(#[from] BadConfiguration),

    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Errors that may occur while submitting a task to a [`WorkerPool`].
///
/// The task itself is dropped on rejection.
///
/// [`WorkerPool`]: crate::WorkerPool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The pool is shut down and does not accept new tasks.
    #[error("worker pool is shut down")]
    Shutdown,

    /// The task queue is at its limit right now.
    ///
    /// Only returned by the non-blocking
    /// [`try_submit`](crate::WorkerPool::try_submit).
    #[error("task queue is at its limit")]
    Full,
}
