use std::sync::Arc;

/// The audit log the allocator reports its outcomes to.
///
/// Logging is fire-and-forget: an implementation must never fail or block the
/// allocation that emitted the event.
pub trait LogSink {
    fn log_event(&self, source: &str, message: &str);
}

impl<L: LogSink + ?Sized> LogSink for &L {
    fn log_event(&self, source: &str, message: &str) {
        (**self).log_event(source, message);
    }
}

impl<L: LogSink + ?Sized> LogSink for Arc<L> {
    fn log_event(&self, source: &str, message: &str) {
        (**self).log_event(source, message);
    }
}
