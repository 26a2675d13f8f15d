use core::fmt;

/// A failure to read from the record store.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// The store could not be reached or read.
    Unavailable { context: String },
    /// The store returned data that could not be interpreted as records.
    Malformed { context: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { context } => write!(f, "store unavailable: {context}"),
            Self::Malformed { context } => write!(f, "malformed store data: {context}"),
        }
    }
}

impl core::error::Error for StoreError {}

/// A field-level error reported by a rejected write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub record_id: String,
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(
        record_id: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.record_id, self.field, self.message)
    }
}
