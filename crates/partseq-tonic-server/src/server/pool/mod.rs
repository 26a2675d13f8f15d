//! Allocation worker pool.
//!
//! - [`request`] - messages sent from the handler to workers.
//! - [`worker`] - the blocking loop each worker thread runs.
//! - [`manager`] - round-robin dispatch and coordinated shutdown.

pub mod manager;
pub mod request;
pub mod worker;
