use core::fmt;

use crate::Variant;

/// The unit within which sequence numbers are unique: a partition key paired
/// with a variant class.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Partition {
    pub key: String,
    pub variant: Variant,
}

impl Partition {
    pub fn new(key: impl Into<String>, variant: Variant) -> Self {
        Self {
            key: key.into(),
            variant,
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self.key, self.variant)
    }
}
