//! A fixed-size pool of worker threads fed by a bounded handoff
//! queue.
//!
//! Submitted tasks are buffered in a [`baton_queue::HandoffQueue`]
//! and picked up by a configurable number of OS threads. When the
//! queue is at its limit, [`WorkerPool::submit`] blocks instead of
//! growing the backlog without bound.
//!
//! Shutdown semantics follow the queue's stop behavior: workers
//! finish the task they are currently executing and exit, while
//! still-queued tasks are discarded from execution but retained in
//! the buffer. A subsequent [`WorkerPool::start`] spawns fresh
//! workers which pick the retained backlog up again. For a graceful
//! drain instead, call [`WorkerPool::join`] first.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod builder;
pub use builder::*;

mod error;
pub use error::*;

mod pool;
pub use pool::*;
