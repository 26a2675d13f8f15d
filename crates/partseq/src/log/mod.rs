mod interface;
mod memory;
#[cfg(feature = "tracing")]
mod tracing;

pub use interface::*;
pub use memory::*;
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
#[cfg(feature = "tracing")]
pub use self::tracing::*;
