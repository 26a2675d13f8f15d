use core::fmt;

use crate::{FieldError, ParticipantId, SEPARATOR};

/// The outcome of a completed allocation attempt.
///
/// - [`Allocation::Assigned`] means a new identifier was written.
/// - [`Allocation::Skipped`] is an expected no-op; the record is left as is.
/// - [`Allocation::SaveFailed`] means an identifier was computed but the store
///   rejected the write. The record stays unassigned and will be retried on
///   its next save event.
///
/// Fatal conditions (sequence overflow, unreadable store) are returned as
/// [`Error`] instead.
///
/// [`Error`]: crate::Error
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Allocation {
    Assigned {
        /// The identifier now stored on the record.
        id: ParticipantId,
    },
    Skipped {
        reason: SkipReason,
    },
    SaveFailed {
        /// The identifier that could not be stored.
        id: ParticipantId,
        errors: Vec<FieldError>,
    },
}

impl Allocation {
    /// Returns the identifier if one was written.
    pub fn assigned(&self) -> Option<&ParticipantId> {
        match self {
            Self::Assigned { id } => Some(id),
            _ => None,
        }
    }

    pub const fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned { .. })
    }
}

/// Why an allocation was a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SkipReason {
    /// The event carried an empty record id or project id.
    EmptyEvent,
    /// The store has no record with the event's record id.
    RecordNotFound,
    /// A precursor field is absent on the record.
    MissingPrecursor { field: String },
    /// The record already has an identifier.
    AlreadyAssigned { existing: String },
    /// The partition key contains the identifier separator, so identifiers
    /// built from it could not be told apart from those of a shorter key.
    InvalidPartitionKey { key: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEvent => write!(f, "empty record or project id"),
            Self::RecordNotFound => write!(f, "record not found"),
            Self::MissingPrecursor { field } => write!(f, "empty {field} variable"),
            Self::AlreadyAssigned { existing } => write!(f, "already assigned {existing}"),
            Self::InvalidPartitionKey { key } => {
                write!(f, "partition key {key:?} contains '{SEPARATOR}'")
            }
        }
    }
}
