use core::fmt;

/// Errors produced when strictly parsing or constructing a [`ParticipantId`].
///
/// The allocator itself never parses strictly; stored identifiers are read
/// through the lenient [`ScannedId::scan`] instead.
///
/// [`ParticipantId`]: crate::ParticipantId
/// [`ScannedId::scan`]: crate::ScannedId::scan
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum IdError {
    /// There is no `-<sequence>` segment.
    MissingSequence,
    /// The sequence segment is not exactly three ASCII digits.
    InvalidSequence { segment: String },
    /// The sequence is outside `1..=MAX_SEQUENCE`.
    SequenceOutOfRange { sequence: u32 },
    /// A trailing segment other than the non-primary suffix was found.
    UnexpectedSegment { segment: String },
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSequence => write!(f, "missing sequence segment"),
            Self::InvalidSequence { segment } => write!(f, "invalid sequence segment: {segment:?}"),
            Self::SequenceOutOfRange { sequence } => {
                write!(f, "sequence out of range: {sequence}")
            }
            Self::UnexpectedSegment { segment } => write!(f, "unexpected segment: {segment:?}"),
        }
    }
}

impl core::error::Error for IdError {}
