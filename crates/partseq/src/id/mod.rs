mod error;
mod participant;
mod partition;
mod scan;
#[cfg(feature = "serde")]
mod serde;
mod variant;

pub use error::*;
pub use participant::*;
pub use partition::*;
pub use scan::*;
pub use variant::*;
