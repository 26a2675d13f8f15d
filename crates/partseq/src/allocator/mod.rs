mod config;
mod lock;
mod mutex;
mod partitioned;
mod status;

pub use config::*;
pub use lock::*;
pub(crate) use mutex::*;
pub use partitioned::*;
pub use status::*;
