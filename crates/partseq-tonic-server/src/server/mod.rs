pub mod config;
pub mod pool;
pub mod service;
pub mod store;
pub mod telemetry;
