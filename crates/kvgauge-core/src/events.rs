//! Event sink capability for operation diagnostics.
//!
//! Drivers report faults and progress through a sink handed in at init,
//! rather than writing to process-global output. Tests substitute
//! [`MemorySink`] to assert on logged events.

use parking_lot::Mutex;
use tracing::{debug, error, info};

/// Severity of a driver event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Error,
}

/// Logging capability handed to a driver at init.
pub trait EventSink: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards events to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn debug(&self, message: &str) {
        debug!("{}", message);
    }

    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }
}

/// Buffers events in memory for test assertions.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, in order.
    pub fn events(&self) -> Vec<(Level, String)> {
        self.events.lock().clone()
    }

    /// Snapshot of error-level messages only.
    pub fn errors(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl EventSink for MemorySink {
    fn debug(&self, message: &str) {
        self.events.lock().push((Level::Debug, message.to_string()));
    }

    fn info(&self, message: &str) {
        self.events.lock().push((Level::Info, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.events.lock().push((Level::Error, message.to_string()));
    }
}
