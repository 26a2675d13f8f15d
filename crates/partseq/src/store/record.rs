use std::collections::BTreeMap;

/// A record as returned by the store: a flat map of field names to values.
///
/// A field that is missing from the map and a field explicitly set to `None`
/// are both *absent*. An empty string is a present value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, Option<String>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for a present value.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Builder-style setter for an explicit null.
    #[must_use]
    pub fn with_null(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), None);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), Some(value.into()));
    }

    /// Returns the value of `field`, or `None` if it is absent or null.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Option::as_deref)
    }

    /// Returns `true` if `field` holds a non-empty value.
    pub fn is_filled(&self, field: &str) -> bool {
        self.get(field).is_some_and(|v| !v.is_empty())
    }

    /// Keeps only the named fields.
    #[must_use]
    pub fn project(&self, fields: &[&str]) -> Self {
        let fields = self
            .fields
            .iter()
            .filter(|(name, _)| fields.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v.into())))
            .collect();
        Self { fields }
    }
}

/// A single-record write: the record to update and the fields to set on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordUpdate {
    pub record_id: String,
    pub fields: Vec<(String, String)>,
}

impl RecordUpdate {
    pub fn new(record_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }
}

/// Selects which records a fetch returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordFilter<'a> {
    /// The record whose record-id field equals the given value.
    One(&'a str),
    /// Every record in the store.
    All,
}
