//! A bounded, blocking FIFO queue for handing values between threads.
//!
//! [`HandoffQueue`] pairs a capacity bound with an explicit stop/start
//! lifecycle: producers block while the queue is full, consumers block
//! while it is empty, and [`HandoffQueue::stop`] wakes every blocked
//! thread at once so the queue can be torn down without leaking
//! parked threads. Stopping retains buffered values; a later
//! [`HandoffQueue::start`] makes them visible again.
//!
//! All operations come in a blocking and a non-blocking flavor, and
//! capacity may be adjusted while the queue is in use.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod queue;
pub use queue::*;
