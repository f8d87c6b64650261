use std::{error::Error, fmt};

/// Error returned by [`put`](crate::HandoffQueue::put) when the queue
/// is stopped.
///
/// The rejected value is handed back so the caller can retry or
/// dispose of it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Stopped<T>(pub T);

impl<T> Stopped<T> {
    /// Recovers the value that was not enqueued.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Stopped<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Stopped(..)")
    }
}

impl<T> fmt::Display for Stopped<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("queue is stopped")
    }
}

impl<T> Error for Stopped<T> {}

/// Error returned by [`try_put`](crate::HandoffQueue::try_put).
///
/// Either way, the rejected value is handed back to the caller.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum TryPutError<T> {
    /// The queue was at capacity.
    Full(T),
    /// The queue was stopped.
    Stopped(T),
}

impl<T> TryPutError<T> {
    /// Recovers the value that was not enqueued.
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(value) | Self::Stopped(value) => value,
        }
    }

    /// Whether the value was rejected because the queue was at
    /// capacity.
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }

    /// Whether the value was rejected because the queue was stopped.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped(_))
    }
}

impl<T> fmt::Debug for TryPutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => f.write_str("Full(..)"),
            Self::Stopped(_) => f.write_str("Stopped(..)"),
        }
    }
}

impl<T> fmt::Display for TryPutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full(_) => f.write_str("queue is full"),
            Self::Stopped(_) => f.write_str("queue is stopped"),
        }
    }
}

impl<T> Error for TryPutError<T> {}
