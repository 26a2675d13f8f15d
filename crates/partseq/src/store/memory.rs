use crate::{
    FieldError, Record, RecordFilter, RecordStore, RecordUpdate, StoreError,
    allocator::{Mutex, MutexGuard},
};

/// An in-process [`RecordStore`] backed by a vector of records.
///
/// Useful for embedding, tests and benchmarks. Writes can be made to fail on
/// demand to exercise the allocator's persistence-failure path.
pub struct MemoryStore {
    record_id_field: String,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    records: Vec<Record>,
    rejected_saves: Option<String>,
    unreadable: bool,
    saves: usize,
}

impl MemoryStore {
    /// Creates an empty store whose records are keyed by `record_id_field`.
    pub fn new(record_id_field: impl Into<String>) -> Self {
        Self {
            record_id_field: record_id_field.into(),
            state: Mutex::new(State::default()),
        }
    }

    /// Creates a store preloaded with `records`.
    pub fn with_records(
        record_id_field: impl Into<String>,
        records: impl IntoIterator<Item = Record>,
    ) -> Self {
        let store = Self::new(record_id_field);
        store.lock().records.extend(records);
        store
    }

    /// Appends a record, bypassing the write path.
    pub fn insert(&self, record: Record) {
        self.lock().records.push(record);
    }

    /// Returns a copy of the record with the given id.
    pub fn get(&self, record_id: &str) -> Option<Record> {
        let state = self.lock();
        state
            .records
            .iter()
            .find(|r| r.get(&self.record_id_field) == Some(record_id))
            .cloned()
    }

    /// Returns a copy of every record.
    pub fn records(&self) -> Vec<Record> {
        self.lock().records.clone()
    }

    /// Number of accepted writes so far.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// Makes every following write fail with `message`, or restores normal
    /// writes when `None`.
    pub fn reject_saves(&self, message: Option<&str>) {
        self.lock().rejected_saves = message.map(str::to_owned);
    }

    /// Makes every following fetch fail.
    pub fn set_unreadable(&self, unreadable: bool) {
        self.lock().unreadable = unreadable;
    }

    // A panic while holding this lock can only come from a bug in this file, so
    // recover the data instead of propagating the poison.
    fn lock(&self) -> MutexGuard<'_, State> {
        #[cfg(feature = "parking-lot")]
        {
            self.state.lock()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            self.state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }
}

impl RecordStore for MemoryStore {
    fn record_id_field(&self) -> &str {
        &self.record_id_field
    }

    fn fetch_fields(
        &self,
        filter: RecordFilter<'_>,
        fields: &[&str],
    ) -> Result<Vec<Record>, StoreError> {
        let state = self.lock();
        if state.unreadable {
            return Err(StoreError::Unavailable {
                context: "memory store marked unreadable".into(),
            });
        }
        let records = state
            .records
            .iter()
            .filter(|r| match filter {
                RecordFilter::One(id) => r.get(&self.record_id_field) == Some(id),
                RecordFilter::All => true,
            })
            .map(|r| r.project(fields))
            .collect();
        Ok(records)
    }

    fn save_fields(&self, update: &RecordUpdate) -> Result<(), Vec<FieldError>> {
        let mut state = self.lock();
        if let Some(message) = &state.rejected_saves {
            return Err(update
                .fields
                .iter()
                .map(|(field, _)| FieldError::new(&update.record_id, field, message))
                .collect());
        }

        let id_field = self.record_id_field.as_str();
        let Some(record) = state
            .records
            .iter_mut()
            .find(|r| r.get(id_field) == Some(update.record_id.as_str()))
        else {
            return Err(vec![FieldError::new(
                &update.record_id,
                id_field,
                "record does not exist",
            )]);
        };
        for (field, value) in &update.fields {
            record.set(field, value);
        }
        state.saves += 1;
        Ok(())
    }
}
