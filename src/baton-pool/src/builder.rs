use std::{env, thread};

use thiserror::Error;

use crate::{PoolError, WorkerPool};

/// Environment variable overriding the default worker thread count.
pub const BATON_WORKER_THREADS: &str = "BATON_WORKER_THREADS";

/// The default bound on queued tasks before [`WorkerPool::submit`]
/// blocks.
pub const DEFAULT_TASK_LIMIT: usize = 100;

const WORKER_NAME: &str = "baton-worker";

/// The configured number of worker threads cannot be used.
#[derive(Clone, Debug, Error)]
#[error("invalid value in {}; must be a natural number", BATON_WORKER_THREADS)]
pub struct BadConfiguration;

/// Determines the number of worker threads to use.
///
/// This respects the [`BATON_WORKER_THREADS`] environment variable
/// when set, and falls back to the available parallelism reported by
/// the OS otherwise.
pub fn available_threads() -> Result<usize, BadConfiguration> {
    match env::var(BATON_WORKER_THREADS) {
        Ok(value) => value
            .parse()
            .ok()
            .filter(|&threads| threads > 0)
            .ok_or(BadConfiguration),

        Err(_) => Ok(thread::available_parallelism().map_or(1, |n| n.get())),
    }
}

/// A builder for configuring a [`WorkerPool`].
///
/// Obtained through [`WorkerPool::builder`].
#[derive(Clone, Debug)]
pub struct Builder {
    pub(crate) workers: Option<usize>,
    pub(crate) task_limit: usize,
    pub(crate) thread_name: String,
    pub(crate) thread_stack_size: Option<usize>,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            workers: None,
            task_limit: DEFAULT_TASK_LIMIT,
            thread_name: WORKER_NAME.into(),
            thread_stack_size: None,
        }
    }

    /// Sets the number of worker threads to spawn.
    ///
    /// When not given, the count is determined through
    /// [`available_threads`].
    pub fn workers(mut self, count: usize) -> Self {
        self.workers = Some(count);
        self
    }

    /// Bounds the task queue to `limit` pending tasks.
    ///
    /// Once the limit is reached, [`WorkerPool::submit`] blocks until
    /// a worker makes room. Defaults to [`DEFAULT_TASK_LIMIT`].
    pub fn task_limit(mut self, limit: usize) -> Self {
        self.task_limit = limit;
        self
    }

    /// Names the worker threads for debuggers and panic messages.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Sets the stack size of each worker thread, in bytes.
    ///
    /// The platform default is used when not given.
    pub fn thread_stack_size(mut self, bytes: usize) -> Self {
        self.thread_stack_size = Some(bytes);
        self
    }

    /// Builds the pool and spawns its worker threads.
    pub fn build(self) -> Result<WorkerPool, PoolError> {
        WorkerPool::from_builder(self)
    }
}
