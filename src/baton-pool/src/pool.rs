use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use baton_queue::{HandoffQueue, TryPutError};
use parking_lot::{Condvar, Mutex};

use crate::{available_threads, Builder, PoolError, SubmitError};

/// A unit of work executed by the pool.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

// State shared between the pool handle and its worker threads.
struct Shared {
    tasks: HandoffQueue<Task>,
    // Tasks accepted but not yet finished: waiting in the queue,
    // mid-submission, or currently executing on a worker.
    pending: Mutex<usize>,
    all_done: Condvar,
}

impl Shared {
    fn task_accepted(&self) {
        *self.pending.lock() += 1;
    }

    fn task_retired(&self) {
        let mut pending = self.pending.lock();
        *pending -= 1;
        if *pending == 0 {
            self.all_done.notify_all();
        }
    }
}

// Retires the task from `Drop` so that a panicking task cannot leave
// the pending count stuck and hang `WorkerPool::join`.
struct Retire<'a>(&'a Shared);

impl Drop for Retire<'_> {
    fn drop(&mut self) {
        self.0.task_retired();
    }
}

fn worker_loop(shared: &Shared) {
    while let Some(task) = shared.tasks.take() {
        let _retire = Retire(shared);
        task();
    }
    log::trace!("worker exiting");
}

/// A fixed-size pool of OS threads executing submitted tasks.
///
/// Tasks are handed to the workers through a bounded queue; once the
/// queue is at its limit, [`WorkerPool::submit`] applies backpressure
/// by blocking the caller.
///
/// # Shutdown
///
/// [`WorkerPool::shutdown_now`] lets every worker finish the task it
/// is currently executing, then joins them. Tasks still waiting in
/// the queue are not run; they stay buffered and a later
/// [`WorkerPool::start`] hands them to fresh workers. Draining the
/// backlog gracefully is the composition of both primitives:
///
/// ```no_run
/// # let pool = baton_pool::WorkerPool::new().unwrap();
/// pool.join();
/// pool.shutdown_now();
/// ```
///
/// # Panics in tasks
///
/// A panicking task unwinds its worker thread, which is not respawned
/// until the next [`WorkerPool::start`]. The pending-task accounting
/// used by [`WorkerPool::join`] stays accurate regardless.
pub struct WorkerPool {
    shared: Arc<Shared>,
    workers: Mutex<Vec<thread::JoinHandle<()>>>,
    running: AtomicBool,
    thread_name: String,
    thread_stack_size: Option<usize>,
}

impl WorkerPool {
    /// Creates a pool with default configuration.
    ///
    /// The worker count comes from [`available_threads`], the queue
    /// bound from [`DEFAULT_TASK_LIMIT`](crate::DEFAULT_TASK_LIMIT).
    pub fn new() -> Result<Self, PoolError> {
        Self::builder().build()
    }

    /// Returns a [`Builder`] for configuring a pool.
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn from_builder(builder: Builder) -> Result<Self, PoolError> {
        let workers = match builder.workers {
            Some(count) => count,
            None => available_threads()?,
        };

        let pool = Self {
            shared: Arc::new(Shared {
                tasks: HandoffQueue::with_capacity(builder.task_limit),
                pending: Mutex::new(0),
                all_done: Condvar::new(),
            }),
            workers: Mutex::new(Vec::new()),
            running: AtomicBool::new(false),
            thread_name: builder.thread_name,
            thread_stack_size: builder.thread_stack_size,
        };
        pool.start(workers, builder.task_limit)?;

        Ok(pool)
    }

    /// Submits a task for execution, waiting while the task queue is
    /// at its limit.
    ///
    /// Acceptance is not a guarantee of execution; tasks still queued
    /// when [`WorkerPool::shutdown_now`] hits are discarded from the
    /// current run.
    pub fn submit<F>(&self, task: F) -> Result<(), SubmitError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.task_accepted();
        match self.shared.tasks.put(Box::new(task) as Task) {
            Ok(()) => Ok(()),
            Err(_) => {
                self.shared.task_retired();
                Err(SubmitError::Shutdown)
            }
        }
    }

    /// Submits a task for execution if the queue has room right now.
    pub fn try_submit<F>(&self, task: F) -> Result<(), SubmitError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.task_accepted();
        match self.shared.tasks.try_put(Box::new(task) as Task) {
            Ok(()) => Ok(()),
            Err(rejected) => {
                self.shared.task_retired();
                Err(match rejected {
                    TryPutError::Full(_) => SubmitError::Full,
                    TryPutError::Stopped(_) => SubmitError::Shutdown,
                })
            }
        }
    }

    /// Shuts the pool down and joins every worker thread.
    ///
    /// Workers finish the task they are executing and exit; the
    /// queued backlog is retained but not run. Exactly one caller
    /// performs the join, repeat and concurrent calls return
    /// immediately.
    pub fn shutdown_now(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        log::debug!("shutting down worker pool");
        self.shared.tasks.stop();

        // Wake join callers so they observe the cleared running flag.
        // Taking the lock orders the wakeup after their predicate
        // check.
        {
            let _pending = self.shared.pending.lock();
            self.shared.all_done.notify_all();
        }

        let mut workers = self.workers.lock();
        for worker in workers.drain(..) {
            let _ = worker.join();
        }
    }

    /// Restarts a pool that has been shut down, spawning `workers`
    /// fresh threads and re-bounding the queue to `task_limit`.
    ///
    /// Backlog retained from before the shutdown becomes visible to
    /// the new workers. No-op while the pool is running.
    pub fn start(&self, workers: usize, task_limit: usize) -> Result<(), PoolError> {
        let mut handles = self.workers.lock();
        if self.running.load(Ordering::SeqCst) {
            return Ok(());
        }

        log::debug!("starting worker pool with {workers} workers");
        self.shared.tasks.start();
        self.shared.tasks.set_capacity(task_limit);

        *handles = self.spawn_workers(workers)?;
        self.running.store(true, Ordering::SeqCst);

        Ok(())
    }

    /// Blocks until every accepted task has finished executing, or
    /// until the pool is shut down, whichever happens first.
    pub fn join(&self) {
        let mut pending = self.shared.pending.lock();
        while *pending > 0 && self.running.load(Ordering::SeqCst) {
            self.shared.all_done.wait(&mut pending);
        }
    }

    /// Adjusts how many tasks may wait in the queue before
    /// [`WorkerPool::submit`] blocks.
    ///
    /// Shrinking below the current backlog only delays new
    /// submissions; already-queued tasks are unaffected.
    pub fn set_task_limit(&self, limit: usize) {
        self.shared.tasks.set_capacity(limit);
    }

    /// The number of live worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.lock().len()
    }

    /// The number of tasks currently waiting in the queue.
    pub fn queued_tasks(&self) -> usize {
        self.shared.tasks.len()
    }

    /// Whether the pool currently dispatches tasks to workers.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn spawn_workers(&self, count: usize) -> Result<Vec<thread::JoinHandle<()>>, PoolError> {
        let mut handles = Vec::with_capacity(count);
        for _ in 0..count {
            let mut builder = thread::Builder::new().name(self.thread_name.clone());
            if let Some(bytes) = self.thread_stack_size {
                builder = builder.stack_size(bytes);
            }

            let shared = Arc::clone(&self.shared);
            match builder.spawn(move || worker_loop(&shared)) {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    // Unwind the partially spawned set before
                    // reporting the failure.
                    self.shared.tasks.stop();
                    for handle in handles {
                        let _ = handle.join();
                    }

                    return Err(PoolError::Spawn(source));
                }
            }
        }

        Ok(handles)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown_now();
    }
}
