mod error;
mod interface;
mod memory;
mod record;

pub use error::*;
pub use interface::*;
pub use memory::*;
pub use record::*;
