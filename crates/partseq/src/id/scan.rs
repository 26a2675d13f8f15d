use crate::{SEPARATOR, Variant};

/// A stored identifier as seen by the allocator's scan.
///
/// Scanning is deliberately lenient so that hand-edited or legacy values never
/// abort an allocation:
///
/// - only the first two `-`-delimited segments are read, anything after is
///   ignored;
/// - the variant class comes from [`Variant::classify`], i.e. whether the
///   non-primary suffix appears anywhere;
/// - the sequence segment is coerced with [`coerce_sequence`], so a
///   non-numeric segment counts as `0`.
///
/// ```
/// use partseq::{ScannedId, Variant};
///
/// let id = ScannedId::scan("1234-012-NC").unwrap();
/// assert_eq!(id.partition_key, "1234");
/// assert_eq!(id.sequence, 12);
/// assert_eq!(id.variant, Variant::NonPrimary);
///
/// assert_eq!(ScannedId::scan("1234-abc").unwrap().sequence, 0);
/// assert!(ScannedId::scan("1234").is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScannedId<'a> {
    pub partition_key: &'a str,
    pub sequence: u32,
    pub variant: Variant,
}

impl<'a> ScannedId<'a> {
    /// Returns `None` for an empty value or a value without a sequence
    /// segment; such identifiers never match any partition.
    pub fn scan(raw: &'a str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let mut segments = raw.splitn(3, SEPARATOR);
        let partition_key = segments.next()?;
        let sequence = segments.next()?;
        Some(Self {
            partition_key,
            sequence: coerce_sequence(sequence),
            variant: Variant::classify(raw),
        })
    }

    /// Returns `true` if this identifier belongs to the given partition.
    pub fn is_in(&self, partition_key: &str, variant: Variant) -> bool {
        self.partition_key == partition_key && self.variant == variant
    }
}

/// Integer coercion of a sequence segment.
///
/// Leading whitespace and a single `+` are skipped, then the leading run of
/// ASCII digits is read (saturating at `u32::MAX`). A segment with no leading
/// digits yields `0`.
pub fn coerce_sequence(segment: &str) -> u32 {
    let trimmed = segment.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_u32, |acc, b| {
            acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
        })
}
