//! Log sinks receiving the metric's warnings and rendered reports.

use std::sync::{Arc, Mutex};

/// Destination for the metric's human-readable output.
pub trait LogSink {
    /// Writes an informational message, such as a rendered report.
    fn info(&self, message: &str);

    /// Writes a warning, such as a deprecation notice.
    fn warn(&self, message: &str);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn info(&self, message: &str) {
        (**self).info(message);
    }

    fn warn(&self, message: &str) {
        (**self).warn(message);
    }
}

/// Forwards messages to the active `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(target: "instance_seg_metric", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "instance_seg_metric", "{message}");
    }
}

/// Severity of a captured message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

/// Keeps every message in memory.
///
/// Clones share the same buffer, so a clone can be handed to the metric
/// while the original is used to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<(Level, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured messages, oldest first.
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.lock().clone()
    }

    /// Captured messages of one level, oldest first.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(entry_level, _)| *entry_level == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// Drops every captured message, for all clones.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Level, String)>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn push(&self, level: Level, message: &str) {
        self.lock().push((level, message.to_owned()));
    }
}

impl LogSink for MemorySink {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }
}
