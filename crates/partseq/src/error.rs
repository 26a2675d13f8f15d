use core::fmt;

use crate::{StoreError, Variant};

/// A result type whose error defaults to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors an allocation can surface to its caller.
///
/// Expected no-op outcomes (missing precursors, an identifier that is already
/// assigned) are *not* errors; they are reported through
/// [`Allocation::Skipped`]. Likewise, a rejected write is reported through
/// [`Allocation::SaveFailed`]. Only the conditions below abort an allocation.
///
/// [`Allocation::Skipped`]: crate::Allocation::Skipped
/// [`Allocation::SaveFailed`]: crate::Allocation::SaveFailed
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The next sequence number for the partition would exceed
    /// [`MAX_SEQUENCE`]. Nothing was written.
    ///
    /// [`MAX_SEQUENCE`]: crate::MAX_SEQUENCE
    SequenceOverflow {
        /// Partition key of the triggering record.
        partition_key: String,
        /// Variant class of the triggering record.
        variant: Variant,
        /// The sequence number that was computed and rejected.
        sequence: u32,
    },

    /// The record store could not be read.
    Store(StoreError),

    /// A partition lock was **poisoned** because a thread panicked while
    /// holding it. When the `parking-lot` feature is enabled, mutexes do
    /// **not** poison, so this variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    LockPoisoned,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SequenceOverflow {
                partition_key,
                variant,
                sequence,
            } => write!(
                f,
                "sequence {sequence} for partition {partition_key:?} ({variant}) exceeds {}",
                crate::MAX_SEQUENCE
            ),
            Self::Store(err) => write!(f, "record store error: {err}"),
            #[cfg(not(feature = "parking-lot"))]
            Self::LockPoisoned => write!(f, "partition lock poisoned"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::allocator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
