use crate::LogSink;

/// A [`LogSink`] that forwards every event to `tracing` at `INFO` level under
/// the `partseq::audit` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log_event(&self, source: &str, message: &str) {
        tracing::info!(target: "partseq::audit", source, "{message}");
    }
}
