//! Error types for the allocation service.
//!
//! This module defines the central `Error` enum, which captures every
//! reportable failure of the service. It implements `From<Error>` for
//! `tonic::Status` so errors propagate to clients with an appropriate status
//! code.
//!
//! ## Error Cases
//! - `ChannelError`: an internal communication failure between the handler and
//!   a worker.
//! - `Allocation`: the allocator aborted (sequence overflow, unreadable store,
//!   poisoned lock).
//! - `InvalidRequest`: the client request was malformed.
//! - `ServiceShutdown`: a request arrived while the service was shutting down.

use tonic::Status;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the allocation service.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// Internal channel send/receive failure (e.g., a closed channel).
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// The allocator aborted without writing.
    #[error("Allocation error: {0}")]
    Allocation(#[from] partseq::Error),

    /// The client request was invalid.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// The service is in the process of shutting down.
    #[error("Service is shutting down")]
    ServiceShutdown,
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::ChannelError { context } => Status::internal(format!("Channel error: {context}")),
            Error::Allocation(e @ partseq::Error::SequenceOverflow { .. }) => {
                Status::resource_exhausted(e.to_string())
            }
            Error::Allocation(e @ partseq::Error::Store(_)) => Status::unavailable(e.to_string()),
            Error::Allocation(e) => Status::internal(format!("Allocation error: {e}")),
            Error::InvalidRequest { reason } => Status::invalid_argument(reason),
            Error::ServiceShutdown => Status::unavailable("Service is shutting down"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partseq::{StoreError, Variant};
    use tonic::Code;

    #[test]
    fn overflow_is_resource_exhausted() {
        let status = Status::from(Error::from(partseq::Error::SequenceOverflow {
            partition_key: "1234".into(),
            variant: Variant::NonPrimary,
            sequence: 1000,
        }));
        assert_eq!(status.code(), Code::ResourceExhausted);
        assert!(status.message().contains("1234"));
    }

    #[test]
    fn store_failure_is_unavailable() {
        let status = Status::from(Error::from(partseq::Error::Store(
            StoreError::Unavailable {
                context: "disk gone".into(),
            },
        )));
        assert_eq!(status.code(), Code::Unavailable);
    }

    #[test]
    fn request_and_shutdown_errors() {
        let invalid = Status::from(Error::InvalidRequest {
            reason: "record_id must not be empty".into(),
        });
        assert_eq!(invalid.code(), Code::InvalidArgument);
        assert_eq!(invalid.message(), "record_id must not be empty");

        assert_eq!(
            Status::from(Error::ServiceShutdown).code(),
            Code::Unavailable
        );
        assert_eq!(
            Status::from(Error::ChannelError {
                context: "worker 0 closed".into()
            })
            .code(),
            Code::Internal
        );
    }
}
