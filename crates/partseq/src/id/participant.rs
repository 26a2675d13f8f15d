use core::{fmt, str::FromStr};

use crate::{IdError, Variant};

/// Separator between the segments of a participant identifier.
pub const SEPARATOR: char = '-';

/// Suffix carried by identifiers of the [`Variant::NonPrimary`] class.
pub const NON_PRIMARY_SUFFIX: &str = "-NC";

/// Fixed width of the zero-padded sequence segment.
pub const SEQUENCE_WIDTH: usize = 3;

/// Largest sequence number that fits in [`SEQUENCE_WIDTH`] digits.
pub const MAX_SEQUENCE: u32 = 999;

/// A structured participant identifier.
///
/// The wire form is `<partition_key>-<sequence>` for primary records and
/// `<partition_key>-<sequence>-NC` for non-primary records, with the sequence
/// zero-padded to [`SEQUENCE_WIDTH`] digits:
///
/// ```
/// use partseq::{ParticipantId, Variant};
///
/// let id = ParticipantId::new("1234", 1, Variant::NonPrimary).unwrap();
/// assert_eq!(id.to_string(), "1234-001-NC");
///
/// let parsed: ParticipantId = "1234-017".parse().unwrap();
/// assert_eq!(parsed.sequence(), 17);
/// assert_eq!(parsed.variant(), Variant::Primary);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId {
    partition_key: String,
    sequence: u32,
    variant: Variant,
}

impl ParticipantId {
    /// Builds an identifier from its components.
    ///
    /// The partition key is taken verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::SequenceOutOfRange`] unless `1 <= sequence <=
    /// MAX_SEQUENCE`.
    pub fn new(
        partition_key: impl Into<String>,
        sequence: u32,
        variant: Variant,
    ) -> Result<Self, IdError> {
        if !(1..=MAX_SEQUENCE).contains(&sequence) {
            return Err(IdError::SequenceOutOfRange { sequence });
        }
        Ok(Self {
            partition_key: partition_key.into(),
            sequence,
            variant,
        })
    }

    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Consumes the identifier, returning its wire form.
    pub fn into_string(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{:0width$}{}",
            self.partition_key,
            self.sequence,
            self.variant.suffix(),
            width = SEQUENCE_WIDTH
        )
    }
}

impl FromStr for ParticipantId {
    type Err = IdError;

    /// Strictly parses the wire form: exactly three digits in the sequence
    /// segment and nothing after it except the non-primary suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split(SEPARATOR);
        let partition_key = segments.next().unwrap_or_default();
        let sequence = segments.next().ok_or(IdError::MissingSequence)?;

        if sequence.len() != SEQUENCE_WIDTH || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::InvalidSequence {
                segment: sequence.to_owned(),
            });
        }
        let sequence = sequence
            .parse::<u32>()
            .map_err(|_| IdError::InvalidSequence {
                segment: sequence.to_owned(),
            })?;

        let variant = match (segments.next(), segments.next()) {
            (None, _) => Variant::Primary,
            (Some(suffix), None) if NON_PRIMARY_SUFFIX.strip_prefix(SEPARATOR) == Some(suffix) => {
                Variant::NonPrimary
            }
            (Some(segment), _) => {
                return Err(IdError::UnexpectedSegment {
                    segment: segment.to_owned(),
                });
            }
        };

        Self::new(partition_key, sequence, variant)
    }
}
