use partseq::{Allocator, RecordStore, TracingLogSink};
use std::sync::Arc;

/// Record store handle shared by every worker.
pub type SharedStore = Arc<dyn RecordStore + Send + Sync>;

/// Allocator shared by every worker. Audit events go to `tracing`.
pub type SharedAllocator = Allocator<SharedStore, TracingLogSink>;
