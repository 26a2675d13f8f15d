//! gRPC service implementation for participant ID allocation.
//!
//! This module defines [`AllocatorService`], the implementation of the
//! [`ParticipantIds`] gRPC service. The upstream record system calls
//! `NotifySave` after every record save; the service hands the event to a
//! worker and replies with the allocation outcome.
//!
//! ## Responsibilities
//!
//! - Spawn and manage the worker threads.
//! - Reject events addressed to another project.
//! - Map allocation aborts to gRPC status codes.

use crate::server::{
    config::ServerConfig,
    pool::{manager::WorkerPool, request::WorkRequest, worker::worker_loop},
    service::config::{SharedAllocator, SharedStore},
};
use partseq::{Allocator, SaveEvent, TracingLogSink};
use partseq_tonic_core::{
    Error,
    proto::{self, AllocationReply, participant_ids_server::ParticipantIds},
};
use std::{io, sync::Arc, thread};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};

/// gRPC service that allocates participant IDs on save events.
#[derive(Clone)]
pub struct AllocatorService {
    project_id: String,
    worker_pool: Arc<WorkerPool>,
}

impl AllocatorService {
    /// Creates the service and spawns `config.num_workers` worker threads
    /// sharing one allocator over `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if a worker thread cannot be spawned.
    pub fn new(config: &ServerConfig, store: SharedStore) -> io::Result<Self> {
        let allocator: Arc<SharedAllocator> = Arc::new(Allocator::new(
            store,
            TracingLogSink,
            config.allocator.clone(),
        ));
        let shutdown_token = CancellationToken::new();
        let mut workers = Vec::with_capacity(config.num_workers);
        let mut handles = Vec::with_capacity(config.num_workers);

        for worker_id in 0..config.num_workers {
            let (tx, rx) = mpsc::channel(config.queue_size);
            workers.push(tx);

            let allocator = Arc::clone(&allocator);
            handles.push(
                thread::Builder::new()
                    .name(format!("partseq-worker-{worker_id}"))
                    .spawn(move || worker_loop(worker_id, rx, allocator))?,
            );
        }

        let worker_pool = WorkerPool::new(
            workers,
            handles,
            shutdown_token,
            config.shutdown_timeout,
        );

        Ok(Self {
            project_id: config.project_id.clone(),
            worker_pool: Arc::new(worker_pool),
        })
    }

    /// Stops accepting events, waits for every worker to finish the events
    /// already queued, and joins the worker threads.
    pub async fn shutdown(&self) -> Result<(), Error> {
        self.worker_pool.shutdown().await
    }

    async fn allocate(&self, event: SaveEvent) -> Result<AllocationReply, Error> {
        if !event.project_id.is_empty() && event.project_id != self.project_id {
            return Err(Error::InvalidRequest {
                reason: format!(
                    "project {} is not served here (expected {})",
                    event.project_id, self.project_id
                ),
            });
        }

        let (tx, rx) = oneshot::channel();
        self.worker_pool
            .send_to_next_worker(WorkRequest::Allocate {
                event,
                response: tx,
            })
            .await?;

        let allocation = rx.await.map_err(|_| Error::ChannelError {
            context: "worker dropped the response channel".to_string(),
        })??;

        Ok(allocation.into())
    }
}

#[tonic::async_trait]
impl ParticipantIds for AllocatorService {
    /// Handles one save event.
    ///
    /// Skips and rejected writes are returned as replies. Only aborted
    /// allocations (sequence overflow, unreadable store) and invalid requests
    /// become error statuses.
    #[tracing::instrument(skip_all, fields(record_id = %req.get_ref().record_id))]
    async fn notify_save(
        &self,
        req: Request<proto::SaveEvent>,
    ) -> Result<Response<AllocationReply>, Status> {
        let event = SaveEvent::from(req.into_inner());
        let reply = self.allocate(event).await.inspect_err(|e| {
            tracing::warn!("NotifySave failed: {e}");
        })?;
        Ok(Response::new(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partseq::{AllocatorConfig, MemoryStore, Record};
    use std::{path::PathBuf, time::Duration};
    use tonic::Code;

    fn config() -> ServerConfig {
        ServerConfig {
            data_file: PathBuf::from("records.json"),
            project_id: "42".into(),
            record_id_field: "record_id".into(),
            allocator: AllocatorConfig::default(),
            num_workers: 2,
            queue_size: 4,
            shutdown_timeout: Duration::from_secs(1),
            server_addr: "127.0.0.1:0".into(),
            uds: false,
        }
    }

    fn participant(id: &str, site: &str, status: &str) -> Record {
        Record::new()
            .with("record_id", id)
            .with("test", site)
            .with("patient_status_2", status)
    }

    fn service(store: &Arc<MemoryStore>) -> AllocatorService {
        let store: SharedStore = store.clone();
        AllocatorService::new(&config(), store).unwrap()
    }

    async fn notify(
        service: &AllocatorService,
        record_id: &str,
        project_id: &str,
    ) -> Result<AllocationReply, Status> {
        service
            .notify_save(Request::new(proto::SaveEvent {
                record_id: record_id.into(),
                project_id: project_id.into(),
            }))
            .await
            .map(Response::into_inner)
    }

    #[tokio::test]
    async fn assigns_then_reports_existing() {
        let store = Arc::new(MemoryStore::with_records(
            "record_id",
            [participant("1", "1234", "1"), participant("2", "1234", "3")],
        ));
        let service = service(&store);

        let first = notify(&service, "1", "42").await.unwrap();
        assert_eq!(first.outcome(), proto::Outcome::Assigned);
        assert_eq!(first.participant_id, "1234-001");

        let second = notify(&service, "2", "42").await.unwrap();
        assert_eq!(second.participant_id, "1234-001-NC");

        let again = notify(&service, "1", "42").await.unwrap();
        assert_eq!(again.outcome(), proto::Outcome::Skipped);
        assert_eq!(again.skip_reason(), proto::SkipReason::AlreadyAssigned);
        assert_eq!(again.participant_id, "1234-001");
        assert_eq!(store.save_count(), 2);

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn empty_and_unknown_events_are_skipped() {
        let store = Arc::new(MemoryStore::with_records(
            "record_id",
            [participant("1", "1234", "1")],
        ));
        let service = service(&store);

        let empty = notify(&service, "", "42").await.unwrap();
        assert_eq!(empty.skip_reason(), proto::SkipReason::EmptyEvent);

        let unknown = notify(&service, "404", "42").await.unwrap();
        assert_eq!(unknown.skip_reason(), proto::SkipReason::RecordNotFound);
        assert_eq!(store.save_count(), 0);

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn other_projects_are_rejected() {
        let store = Arc::new(MemoryStore::with_records(
            "record_id",
            [participant("1", "1234", "1")],
        ));
        let service = service(&store);

        let status = notify(&service, "1", "7").await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(store.save_count(), 0);

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn overflow_is_resource_exhausted() {
        let store = Arc::new(MemoryStore::with_records(
            "record_id",
            [
                participant("1", "1234", "1").with("unique_id_2", "1234-999"),
                participant("2", "1234", "1"),
            ],
        ));
        let service = service(&store);

        let status = notify(&service, "2", "42").await.unwrap_err();
        assert_eq!(status.code(), Code::ResourceExhausted);
        assert_eq!(store.save_count(), 0);

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn unreadable_store_is_unavailable() {
        let store = Arc::new(MemoryStore::with_records(
            "record_id",
            [participant("1", "1234", "1")],
        ));
        store.set_unreadable(true);
        let service = service(&store);

        let status = notify(&service, "1", "42").await.unwrap_err();
        assert_eq!(status.code(), Code::Unavailable);

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn rejected_write_is_reported_in_the_reply() {
        let store = Arc::new(MemoryStore::with_records(
            "record_id",
            [participant("1", "1234", "1")],
        ));
        store.reject_saves(Some("field is locked"));
        let service = service(&store);

        let reply = notify(&service, "1", "42").await.unwrap();
        assert_eq!(reply.outcome(), proto::Outcome::SaveFailed);
        assert_eq!(reply.participant_id, "1234-001");
        assert_eq!(reply.errors.len(), 1);
        assert_eq!(reply.errors[0].message, "field is locked");

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn events_after_shutdown_are_refused() {
        let store = Arc::new(MemoryStore::with_records(
            "record_id",
            [participant("1", "1234", "1")],
        ));
        let service = service(&store);
        service.shutdown().await.unwrap();

        let status = notify(&service, "1", "42").await.unwrap_err();
        assert_eq!(status.code(), Code::Unavailable);
        assert_eq!(store.save_count(), 0);
    }
}
