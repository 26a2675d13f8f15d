//! Worker pool for save-event handling.
//!
//! [`WorkerPool`] owns the sending half of each worker's bounded channel and
//! the worker threads' join handles. It distributes requests round-robin and
//! coordinates shutdown via a shared [`CancellationToken`].

use crate::server::pool::request::WorkRequest;
use core::time::Duration;
use parking_lot::Mutex;
use partseq_tonic_core::Error;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    thread::JoinHandle,
};
use tokio::{
    sync::{mpsc, oneshot},
    task::spawn_blocking,
    time::timeout,
};
use tokio_util::sync::CancellationToken;

/// A pool of allocation workers fed over bounded MPSC channels.
pub struct WorkerPool {
    workers: Vec<mpsc::Sender<WorkRequest>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    next_worker: AtomicUsize,
    shutdown_token: CancellationToken,
    shutdown_timeout: Duration,
}

impl WorkerPool {
    /// `handles[i]` must be the thread serving `workers[i]`.
    pub fn new(
        workers: Vec<mpsc::Sender<WorkRequest>>,
        handles: Vec<JoinHandle<()>>,
        shutdown_token: CancellationToken,
        shutdown_timeout: Duration,
    ) -> Self {
        Self {
            workers,
            handles: Mutex::new(handles),
            next_worker: AtomicUsize::new(0),
            shutdown_token,
            shutdown_timeout,
        }
    }

    /// Returns the index of the next worker to receive work (round-robin).
    pub fn next_worker_index(&self) -> usize {
        self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len()
    }

    /// Sends a [`WorkRequest`] to the next worker in the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The service is shutting down (`shutdown_token` was cancelled).
    /// - The worker's channel is closed.
    pub async fn send_to_next_worker(&self, request: WorkRequest) -> Result<(), Error> {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::ServiceShutdown);
        }

        let worker_idx = self.next_worker_index();
        let worker = &self.workers[worker_idx];

        tokio::select! {
            () = self.shutdown_token.cancelled() => Err(Error::ServiceShutdown),
            sent = worker.send(request) => sent.map_err(|_| Error::ChannelError {
                context: format!("Worker {worker_idx} channel closed"),
            }),
        }
    }

    /// Gracefully shuts down all workers in the pool.
    ///
    /// - Cancels the shared [`CancellationToken`] so no new work is accepted.
    /// - Queues a [`WorkRequest::Shutdown`] behind any events already queued
    ///   for each worker.
    /// - Waits up to `shutdown_timeout` per worker for the acknowledgement.
    /// - Joins the worker threads, again waiting up to `shutdown_timeout` each,
    ///   so no save is still in progress when this returns.
    pub async fn shutdown(&self) -> Result<(), Error> {
        tracing::info!("Refusing new requests");
        self.shutdown_token.cancel();

        tracing::debug!("Notifying all workers to shut down");
        let mut shutdown_handles = Vec::with_capacity(self.workers.len());

        for (i, worker) in self.workers.iter().enumerate() {
            let (tx, rx) = oneshot::channel();
            if let Err(e) = worker.send(WorkRequest::Shutdown { response: tx }).await {
                tracing::error!("Failed to send shutdown to worker {i}: {e}");
            } else {
                shutdown_handles.push((i, rx));
            }
        }

        tracing::debug!(
            "Waiting for up to {:?} per worker for shutdown acknowledgements",
            self.shutdown_timeout
        );

        let limit = self.shutdown_timeout;
        let timeout_futures = shutdown_handles.into_iter().map(|(i, rx)| async move {
            match timeout(limit, rx).await {
                Ok(Ok(())) => tracing::trace!("Worker {i} shutdown acknowledged"),
                Ok(Err(e)) => tracing::error!("Worker {i} returned error: {e}"),
                Err(_) => tracing::warn!("Worker {i} shutdown timed out"),
            }
        });

        futures::future::join_all(timeout_futures).await;

        let handles = core::mem::take(&mut *self.handles.lock());
        let join_futures = handles.into_iter().enumerate().map(|(i, handle)| async move {
            match timeout(limit, spawn_blocking(move || handle.join())).await {
                Ok(Ok(Ok(()))) => tracing::trace!("Worker {i} thread joined"),
                Ok(Ok(Err(_))) => tracing::error!("Worker {i} thread panicked"),
                Ok(Err(e)) => tracing::error!("Failed to join worker {i}: {e}"),
                Err(_) => tracing::warn!("Worker {i} thread still running after {limit:?}"),
            }
        });

        futures::future::join_all(join_futures).await;

        tracing::info!("Worker pool shutdown complete");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{
        pool::worker::worker_loop,
        service::config::{SharedAllocator, SharedStore},
    };
    use partseq::{Allocator, AllocatorConfig, MemoryStore, TracingLogSink};
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        thread,
    };

    #[tokio::test]
    async fn shutdown_waits_for_worker_threads() {
        let store: SharedStore = Arc::new(MemoryStore::new("record_id"));
        let allocator: Arc<SharedAllocator> = Arc::new(Allocator::new(
            store,
            TracingLogSink,
            AllocatorConfig::default(),
        ));
        let exited = Arc::new(AtomicBool::new(false));

        let (tx, rx) = mpsc::channel(1);
        let handle = {
            let exited = Arc::clone(&exited);
            thread::spawn(move || {
                worker_loop(0, rx, allocator);
                // Lands after the shutdown acknowledgement.
                thread::sleep(Duration::from_millis(50));
                exited.store(true, Ordering::SeqCst);
            })
        };

        let pool = WorkerPool::new(
            vec![tx],
            vec![handle],
            CancellationToken::new(),
            Duration::from_secs(5),
        );
        pool.shutdown().await.unwrap();

        assert!(exited.load(Ordering::SeqCst));
        assert!(matches!(
            pool.send_to_next_worker(WorkRequest::Shutdown {
                response: oneshot::channel().0,
            })
            .await,
            Err(Error::ServiceShutdown)
        ));
    }
}
