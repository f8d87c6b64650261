//! An asynchronous log sink built on a bounded handoff queue.
//!
//! Logging calls render their record up front and enqueue it; a
//! single writer thread drains the queue into an append-mode file or
//! any other [`RecordSink`]. Callers therefore never wait on disk
//! I/O, they only block when the record queue is full, trading a
//! little latency for complete, ordered logs.
//!
//! The primary surface is the handle-passing [`Logger`]. On top of
//! it, [`instance`] maintains a process-wide shared logger and
//! [`install`] hooks any logger into the [`log`] macro facade.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod global;
pub use global::*;

mod level;
pub use level::*;

mod logger;
pub use logger::*;

mod sink;
pub use sink::*;
