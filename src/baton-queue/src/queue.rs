use std::{collections::VecDeque, fmt, mem};

use parking_lot::{Condvar, Mutex};

use crate::{Stopped, TryPutError};

/// The capacity bound used by [`HandoffQueue::default`], effectively
/// unbounded.
pub const DEFAULT_CAPACITY: usize = usize::MAX;

// Everything the queue guards lives behind one mutex, including the
// stop flag. Waiters therefore observe stop requests together with
// the storage and can never sleep through one.
struct State<T> {
    items: VecDeque<T>,
    capacity: usize,
    stopped: bool,
}

impl<T> State<T> {
    #[inline]
    fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }
}

/// A bounded, blocking FIFO queue for handing values between threads.
///
/// Any number of producers and consumers may share one queue behind an
/// [`Arc`][std::sync::Arc]. Producers block while the queue is full,
/// consumers block while it is empty, and every blocking operation can
/// be interrupted through [`HandoffQueue::stop`].
///
/// Stop takes priority over draining: once stopped, consumers return
/// empty-handed even when values remain buffered. The buffer itself is
/// retained and becomes visible again after [`HandoffQueue::start`].
pub struct HandoffQueue<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> HandoffQueue<T> {
    /// Creates a queue holding at most `capacity` values.
    ///
    /// The bound is clamped to at least one; a queue that can never
    /// hold a value could never hand one off.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                capacity: capacity.max(1),
                stopped: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// Appends `value` at the back, waiting while the queue is full.
    ///
    /// When the queue is stopped, whether it already was at call time
    /// or became so during the wait, the value is handed back in the
    /// error without having been enqueued.
    pub fn put(&self, value: T) -> Result<(), Stopped<T>> {
        let mut state = self.state.lock();
        while !state.stopped && state.is_full() {
            self.not_full.wait(&mut state);
        }

        if state.stopped {
            return Err(Stopped(value));
        }

        state.items.push_back(value);
        self.not_empty.notify_one();

        Ok(())
    }

    /// Appends `value` at the back if there is room right now.
    pub fn try_put(&self, value: T) -> Result<(), TryPutError<T>> {
        let mut state = self.state.lock();
        if state.stopped {
            return Err(TryPutError::Stopped(value));
        }
        if state.is_full() {
            return Err(TryPutError::Full(value));
        }

        state.items.push_back(value);
        self.not_empty.notify_one();

        Ok(())
    }

    /// Removes and returns the front value, waiting while the queue
    /// is empty.
    ///
    /// Returns [`None`] only when the queue is stopped, regardless of
    /// whether values remain buffered.
    pub fn take(&self) -> Option<T> {
        let mut state = self.state.lock();
        while !state.stopped && state.items.is_empty() {
            self.not_empty.wait(&mut state);
        }

        if state.stopped {
            return None;
        }

        let value = state.items.pop_front();
        self.not_full.notify_one();

        value
    }

    /// Removes and returns the front value if one is available right
    /// now and the queue is not stopped.
    pub fn try_take(&self) -> Option<T> {
        let mut state = self.state.lock();
        if state.stopped {
            return None;
        }

        let value = state.items.pop_front()?;
        self.not_full.notify_one();

        Some(value)
    }

    /// Removes and returns the entire buffer in FIFO order, waiting
    /// while the queue is empty.
    ///
    /// The drain happens in a single critical section; no concurrent
    /// operation can observe or interleave with a partial drain.
    /// Returns [`None`] only when the queue is stopped.
    pub fn take_all(&self) -> Option<Vec<T>> {
        let mut state = self.state.lock();
        while !state.stopped && state.items.is_empty() {
            self.not_empty.wait(&mut state);
        }

        if state.stopped {
            return None;
        }

        let drained = Vec::from(mem::take(&mut state.items));
        self.not_full.notify_all();

        Some(drained)
    }

    /// Removes and returns the entire buffer in FIFO order if it is
    /// non-empty right now and the queue is not stopped.
    pub fn try_take_all(&self) -> Option<Vec<T>> {
        let mut state = self.state.lock();
        if state.stopped || state.items.is_empty() {
            return None;
        }

        let drained = Vec::from(mem::take(&mut state.items));
        self.not_full.notify_all();

        Some(drained)
    }

    /// Stops the queue, waking every thread blocked in [`put`],
    /// [`take`], or [`take_all`] so it can return to its caller.
    ///
    /// Buffered values are retained across a stop. Idempotent, also
    /// under concurrent calls.
    ///
    /// [`put`]: HandoffQueue::put
    /// [`take`]: HandoffQueue::take
    /// [`take_all`]: HandoffQueue::take_all
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if !state.stopped {
            state.stopped = true;
            self.not_full.notify_all();
            self.not_empty.notify_all();
        }
    }

    /// Reopens a stopped queue, making the retained buffer visible to
    /// consumers again. Idempotent.
    pub fn start(&self) {
        self.state.lock().stopped = false;
    }

    /// Adjusts the capacity bound, clamped to at least one.
    ///
    /// Blocked producers are always woken so they re-check the new
    /// bound; after a grow they may proceed immediately. Shrinking
    /// below the current length rejects new values but leaves the
    /// excess in place until consumers drain it.
    pub fn set_capacity(&self, capacity: usize) {
        let mut state = self.state.lock();
        state.capacity = capacity.max(1);
        self.not_full.notify_all();
    }

    /// Discards all buffered values, waking producers blocked on a
    /// full queue. The stop flag is unaffected.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.items.clear();
        self.not_full.notify_all();
    }

    /// The number of values currently buffered.
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Whether the queue currently buffers no values.
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Whether the queue is at its capacity bound, or above it after
    /// a shrink.
    pub fn is_full(&self) -> bool {
        self.state.lock().is_full()
    }

    /// The current capacity bound.
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }

    /// Whether the queue is stopped.
    pub fn is_stopped(&self) -> bool {
        self.state.lock().stopped
    }
}

impl<T> Default for HandoffQueue<T> {
    /// Creates an effectively unbounded queue of [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<T> fmt::Debug for HandoffQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HandoffQueue")
            .field("len", &state.items.len())
            .field("capacity", &state.capacity)
            .field("stopped", &state.stopped)
            .finish_non_exhaustive()
    }
}
