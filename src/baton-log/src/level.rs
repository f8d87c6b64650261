use std::{fmt, str::FromStr};

use thiserror::Error;

/// Severity of a log record, most severe first.
///
/// The discriminants mirror [`log::Level`] in that numerically
/// smaller means more severe, so `level <= threshold` reads as
/// "severe enough to retain".
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// The application cannot reasonably continue.
    Fatal = 1,
    /// An operation failed but the application carries on.
    Error,
    /// Something unexpected that did not fail an operation.
    Warn,
    /// Routine operational messages.
    Info,
    /// Diagnostics during development; the most verbose setting.
    Debug,
}

impl Level {
    /// Every level, ordered from most to least severe.
    pub const ALL: [Level; 5] = [
        Level::Fatal,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
    ];

    /// The upper-case tag rendered into records.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Fatal => "FATAL",
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }

    /// The [`log::LevelFilter`] admitting exactly the facade records
    /// a logger with this threshold would retain.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            // The facade cannot produce records above ERROR.
            Level::Fatal => log::LevelFilter::Off,
            Level::Error => log::LevelFilter::Error,
            Level::Warn => log::LevelFilter::Warn,
            Level::Info => log::LevelFilter::Info,
            Level::Debug => log::LevelFilter::Trace,
        }
    }

    pub(crate) fn from_repr(value: u8) -> Self {
        match value {
            1 => Level::Fatal,
            2 => Level::Error,
            3 => Level::Warn,
            4 => Level::Info,
            _ => Level::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            // TRACE has no equivalent here and folds into DEBUG.
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

impl From<Level> for log::Level {
    fn from(level: Level) -> Self {
        match level {
            // The facade has no FATAL; it degrades to ERROR.
            Level::Fatal | Level::Error => log::Level::Error,
            Level::Warn => log::Level::Warn,
            Level::Info => log::Level::Info,
            Level::Debug => log::Level::Debug,
        }
    }
}

/// The string did not name a log level.
#[derive(Clone, Debug, Error)]
#[error("unknown log level '{0}'")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| s.eq_ignore_ascii_case(level.as_str()))
            .ok_or_else(|| ParseLevelError(s.into()))
    }
}
