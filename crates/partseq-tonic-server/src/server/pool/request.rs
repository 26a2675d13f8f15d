use partseq::{Allocation, SaveEvent};
use tokio::sync::oneshot;

/// A unit of work sent to an allocation worker.
#[derive(Debug)]
pub enum WorkRequest {
    /// Handle one save event and send back the outcome.
    Allocate {
        event: SaveEvent,
        response: oneshot::Sender<Result<Allocation, partseq::Error>>,
    },
    /// Stop the worker once all previously queued events are handled.
    Shutdown { response: oneshot::Sender<()> },
}
