use core::fmt;

use crate::NON_PRIMARY_SUFFIX;

/// The variant class of a record.
///
/// Each class keeps its own, independent sequence counter within a partition
/// key, so `1234-001` and `1234-001-NC` can both exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    /// Every record whose variant flag is not the designated non-primary value.
    #[default]
    Primary,
    /// Records whose variant flag equals the designated non-primary value. Their
    /// identifiers carry [`NON_PRIMARY_SUFFIX`].
    NonPrimary,
}

impl Variant {
    /// Classifies a record from its variant-flag value.
    ///
    /// Exactly one value maps to [`Variant::NonPrimary`]; everything else,
    /// including an empty string, is [`Variant::Primary`].
    pub fn from_flag(flag: &str, non_primary_value: &str) -> Self {
        if flag == non_primary_value {
            Self::NonPrimary
        } else {
            Self::Primary
        }
    }

    /// Classifies an already-stored identifier.
    ///
    /// The suffix may appear anywhere in the string; its presence is the only
    /// signal used.
    pub fn classify(raw_id: &str) -> Self {
        if raw_id.contains(NON_PRIMARY_SUFFIX) {
            Self::NonPrimary
        } else {
            Self::Primary
        }
    }

    /// The suffix appended to identifiers of this class.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Primary => "",
            Self::NonPrimary => NON_PRIMARY_SUFFIX,
        }
    }

    pub const fn is_primary(self) -> bool {
        matches!(self, Self::Primary)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::NonPrimary => f.write_str("non-primary"),
        }
    }
}
