//! The logging capability threaded through every component.
//!
//! Library crates never log through process-wide state.  Builders and
//! scorers receive a `&dyn Logger` (or hold an `Arc<dyn Logger>`) and emit
//! progress, debug and error messages through it.  The binary hands in a
//! [`TracingLogger`]; tests hand in a [`MemoryLogger`] and assert on what
//! was recorded.

use std::fmt;
use std::sync::Mutex;

/// Severity of a log message.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// Sink for structured progress and diagnostic messages.
///
/// Only [`log`](Logger::log) is required; the level helpers forward to it.
/// Implementations must be `Send + Sync` because deme sub-populations may
/// evaluate genomes on several threads at once.
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn fatal(&self, message: &str) {
        self.log(LogLevel::Fatal, message);
    }
}

// ── TracingLogger ─────────────────────────────────────────────────────────────

/// Forwards every message to the `tracing` macros.
///
/// `Fatal` has no `tracing` counterpart; it is emitted at error level with a
/// `fatal = true` field.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warning => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
            LogLevel::Fatal => tracing::error!(fatal = true, "{message}"),
        }
    }
}

// ── NoopLogger ────────────────────────────────────────────────────────────────

/// A [`Logger`] that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

// ── MemoryLogger ──────────────────────────────────────────────────────────────

/// A [`Logger`] that keeps every message in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far, oldest first.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Messages recorded at exactly `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// `true` if any message at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.messages_at(level).iter().any(|m| m.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((level, message.to_owned()));
    }
}
