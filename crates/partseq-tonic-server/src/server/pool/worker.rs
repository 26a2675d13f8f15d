use crate::server::{pool::request::WorkRequest, service::config::SharedAllocator};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Worker loop that handles [`WorkRequest`]s on a dedicated thread.
///
/// Allocation talks to the record store synchronously, so each worker runs on
/// its own OS thread and blocks on its channel instead of occupying a Tokio
/// task. All workers share one [`SharedAllocator`], and therefore one set of
/// partition locks.
///
/// The loop exits on [`WorkRequest::Shutdown`] or when every sender is gone.
pub fn worker_loop(
    worker_id: usize,
    mut rx: mpsc::Receiver<WorkRequest>,
    allocator: Arc<SharedAllocator>,
) {
    tracing::trace!("Worker {worker_id} started");

    while let Some(work) = rx.blocking_recv() {
        match work {
            WorkRequest::Allocate { event, response } => {
                let outcome = allocator.try_allocate(&event);
                if let Err(e) = &outcome {
                    tracing::warn!(worker_id, record_id = %event.record_id, "allocation aborted: {e}");
                }
                if response.send(outcome).is_err() {
                    // The caller went away; the allocation itself has already
                    // been written and logged.
                    tracing::debug!(worker_id, record_id = %event.record_id, "requester dropped");
                }
            }
            WorkRequest::Shutdown { response } => {
                tracing::debug!("Worker {worker_id} received shutdown signal");

                if response.send(()).is_err() {
                    tracing::error!("Worker {worker_id} failed to acknowledge shutdown");
                }
                break;
            }
        }
    }

    tracing::trace!("Worker {worker_id} stopped");
}
