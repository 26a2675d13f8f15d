//! Record stores backing the service.
//!
//! - [`json`] - a flat JSON file, rewritten atomically on every save.

pub mod json;
