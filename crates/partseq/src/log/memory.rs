use crate::{
    LogSink,
    allocator::{Mutex, MutexGuard},
};

/// One event recorded by a [`MemoryLog`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub source: String,
    pub message: String,
}

/// A [`LogSink`] that keeps every event in memory.
#[derive(Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all events logged so far, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Returns only the messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.message.clone()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        #[cfg(feature = "parking-lot")]
        {
            self.entries.lock()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            self.entries
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }
}

impl LogSink for MemoryLog {
    fn log_event(&self, source: &str, message: &str) {
        self.lock().push(LogEntry {
            source: source.to_owned(),
            message: message.to_owned(),
        });
    }
}
