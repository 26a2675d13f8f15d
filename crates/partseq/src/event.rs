/// A save notification from the upstream record-management system.
///
/// Delivery is at-least-once: the same event (or several events for the same
/// record) may arrive repeatedly, which is why allocation is idempotent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SaveEvent {
    /// Value of the record-id field of the record that was saved.
    pub record_id: String,
    /// Identifier of the project (namespace) the record lives in.
    pub project_id: String,
}

impl SaveEvent {
    pub fn new(record_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            project_id: project_id.into(),
        }
    }

    /// Returns `true` if either the record id or the project id is blank.
    pub fn is_empty(&self) -> bool {
        self.record_id.is_empty() || self.project_id.is_empty()
    }
}
