#![doc = include_str!("../README.md")]

mod common;
pub use common::*;
// Public re-export so downstream crates can access `partseq` via
// `partseq_tonic_core::partseq`
pub use partseq;
