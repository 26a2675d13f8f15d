//! Shared protocol, error and conversion code for the client and server.
//!
//! - [`proto`]: generated `partseq` messages and service stubs.
//! - [`error`]: the service [`Error`] and its mapping onto `tonic::Status`.
//! - [`convert`]: conversions between protocol messages and `partseq` types.

pub mod convert;
pub mod error;

pub use error::*;

/// Generated protobuf messages and gRPC stubs for the `partseq` package.
pub mod proto {
    #![allow(clippy::pedantic, missing_docs)]
    tonic::include_proto!("partseq");

    /// Encoded file descriptor set, served by the reflection service.
    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("partseq_descriptor");
}
