//! gRPC service implementation.
//!
//! ## Structure
//!
//! - [`config`] - the allocator type shared by all workers.
//! - [`handler`] - gRPC service entry point (`AllocatorService`).

pub mod config;
pub mod handler;
