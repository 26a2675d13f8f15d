use std::sync::Arc;

use crate::{FieldError, Record, RecordFilter, RecordUpdate, StoreError};

/// The record storage and query layer the allocator reads from and writes to.
///
/// Both calls are expected to be bounded and synchronous. Implementations need
/// not provide any concurrency control of their own; allocations that could
/// collide are serialized by the allocator's partition locks.
pub trait RecordStore {
    /// Name of the field that identifies a record.
    fn record_id_field(&self) -> &str;

    /// Returns the named fields of the records selected by `filter`.
    ///
    /// Records that do not carry a requested field simply omit it. A
    /// [`RecordFilter::One`] for an unknown record id returns an empty list.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be read.
    fn fetch_fields(
        &self,
        filter: RecordFilter<'_>,
        fields: &[&str],
    ) -> Result<Vec<Record>, StoreError>;

    /// Applies a single-record update.
    ///
    /// # Errors
    ///
    /// Returns the field-level errors if the write is rejected. A rejected
    /// write must leave the record unchanged.
    fn save_fields(&self, update: &RecordUpdate) -> Result<(), Vec<FieldError>>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn record_id_field(&self) -> &str {
        (**self).record_id_field()
    }

    fn fetch_fields(
        &self,
        filter: RecordFilter<'_>,
        fields: &[&str],
    ) -> Result<Vec<Record>, StoreError> {
        (**self).fetch_fields(filter, fields)
    }

    fn save_fields(&self, update: &RecordUpdate) -> Result<(), Vec<FieldError>> {
        (**self).save_fields(update)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn record_id_field(&self) -> &str {
        (**self).record_id_field()
    }

    fn fetch_fields(
        &self,
        filter: RecordFilter<'_>,
        fields: &[&str],
    ) -> Result<Vec<Record>, StoreError> {
        (**self).fetch_fields(filter, fields)
    }

    fn save_fields(&self, update: &RecordUpdate) -> Result<(), Vec<FieldError>> {
        (**self).save_fields(update)
    }
}
