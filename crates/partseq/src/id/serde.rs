use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::ParticipantId;

impl Serialize for ParticipantId {
    /// Serializes as the wire form, e.g. `"1234-001-NC"`.
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ParticipantId {
    /// Deserializes from the wire form using strict parsing.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the string is
    /// not a well-formed identifier.
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(de::Error::custom)
    }
}
