use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use partseq::{FieldError, Record, RecordFilter, RecordStore, RecordUpdate, StoreError};
use serde_json::{Map, Value};

/// A [`RecordStore`] over a JSON file holding an array of flat objects.
///
/// The file is the source of truth: every fetch re-reads it, so edits made by
/// other tools are picked up on the next event. Saves rewrite the whole file
/// through a temporary sibling and a rename, so readers never observe a
/// half-written file.
///
/// Values are read as follows: `null` is absent, strings are taken as-is,
/// and numbers and booleans are rendered as text (`true` is `"1"`, `false` is
/// `"0"`). Saved values are always written as strings.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    record_id_field: String,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store, checking that `path` holds a readable record array.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the file cannot be read or parsed.
    pub fn open(
        path: impl Into<PathBuf>,
        record_id_field: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            record_id_field: record_id_field.into(),
            write_lock: Mutex::new(()),
        };
        let count = store.load()?.len();
        tracing::debug!(path = %store.path.display(), count, "opened record file");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Map<String, Value>>, StoreError> {
        let raw = fs::read(&self.path).map_err(|e| StoreError::Unavailable {
            context: format!("{}: {e}", self.path.display()),
        })?;
        serde_json::from_slice(&raw).map_err(|e| StoreError::Malformed {
            context: format!("{}: {e}", self.path.display()),
        })
    }

    fn persist(&self, records: &[Map<String, Value>]) -> io::Result<()> {
        atomic_write(&self.path, |file| {
            serde_json::to_writer_pretty(&mut *file, records)?;
            file.write_all(b"\n")
        })
    }

    fn id_of(&self, object: &Map<String, Value>) -> Option<String> {
        object.get(&self.record_id_field).and_then(text)
    }
}

impl RecordStore for JsonFileStore {
    fn record_id_field(&self) -> &str {
        &self.record_id_field
    }

    fn fetch_fields(
        &self,
        filter: RecordFilter<'_>,
        fields: &[&str],
    ) -> Result<Vec<Record>, StoreError> {
        let records = self
            .load()?
            .iter()
            .filter(|object| match filter {
                RecordFilter::One(id) => self.id_of(object).as_deref() == Some(id),
                RecordFilter::All => true,
            })
            .map(|object| to_record(object, fields))
            .collect();
        Ok(records)
    }

    fn save_fields(&self, update: &RecordUpdate) -> Result<(), Vec<FieldError>> {
        let _guard = self.write_lock.lock();
        let reject = |field: &str, message: String| {
            vec![FieldError::new(update.record_id.as_str(), field, message)]
        };

        let mut records = self
            .load()
            .map_err(|e| reject(&self.record_id_field, e.to_string()))?;
        let Some(object) = records
            .iter_mut()
            .find(|object| self.id_of(object).as_deref() == Some(update.record_id.as_str()))
        else {
            return Err(reject(&self.record_id_field, "record does not exist".into()));
        };

        for (field, value) in &update.fields {
            object.insert(field.clone(), Value::String(value.clone()));
        }

        self.persist(&records).map_err(|e| {
            let field = update
                .fields
                .first()
                .map_or(self.record_id_field.as_str(), |(f, _)| f.as_str());
            reject(field, format!("write failed: {e}"))
        })
    }
}

/// Writes `path` through a `.tmp` sibling that is renamed into place. The
/// sibling is removed again if any step fails.
fn atomic_write(
    path: &Path,
    write: impl FnOnce(&mut fs::File) -> io::Result<()>,
) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = fs::File::create(&tmp).and_then(|mut file| {
        write(&mut file)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn to_record(object: &Map<String, Value>, fields: &[&str]) -> Record {
    let mut record = Record::new();
    for field in fields {
        match object.get(*field).and_then(text) {
            Some(value) => record.set(*field, value),
            None if object.contains_key(*field) => record = record.with_null(*field),
            None => {}
        }
    }
    record
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.into()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TempFile(PathBuf);

    impl TempFile {
        fn with(contents: &Value) -> Self {
            static NEXT: AtomicUsize = AtomicUsize::new(0);
            let path = std::env::temp_dir().join(format!(
                "partseq-json-store-{}-{}.json",
                std::process::id(),
                NEXT.fetch_add(1, Ordering::Relaxed)
            ));
            fs::write(&path, serde_json::to_vec(contents).unwrap()).unwrap();
            Self(path)
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    fn sample() -> TempFile {
        TempFile::with(&json!([
            { "record_id": "1", "test": "1234", "patient_status_2": 1, "unique_id_2": "" },
            { "record_id": 2, "test": "1234", "patient_status_2": "3", "unique_id_2": null },
            { "record_id": "3", "test": "9999", "unique_id_2": "9999-004", "flag": true },
        ]))
    }

    #[test]
    fn fetches_one_record_with_requested_fields() {
        let file = sample();
        let store = JsonFileStore::open(&file.0, "record_id").unwrap();

        let got = store
            .fetch_fields(RecordFilter::One("1"), &["record_id", "patient_status_2"])
            .unwrap();
        assert_eq!(
            got,
            vec![
                Record::new()
                    .with("record_id", "1")
                    .with("patient_status_2", "1")
            ]
        );
    }

    #[test]
    fn numeric_ids_and_nulls() {
        let file = sample();
        let store = JsonFileStore::open(&file.0, "record_id").unwrap();

        let got = store
            .fetch_fields(RecordFilter::One("2"), &["unique_id_2", "missing"])
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].get("unique_id_2"), None);
        assert_eq!(got[0], Record::new().with_null("unique_id_2"));
    }

    #[test]
    fn booleans_render_as_digits() {
        let file = sample();
        let store = JsonFileStore::open(&file.0, "record_id").unwrap();

        let got = store
            .fetch_fields(RecordFilter::One("3"), &["flag"])
            .unwrap();
        assert_eq!(got[0].get("flag"), Some("1"));
    }

    #[test]
    fn fetch_all_and_unknown() {
        let file = sample();
        let store = JsonFileStore::open(&file.0, "record_id").unwrap();

        assert_eq!(
            store
                .fetch_fields(RecordFilter::All, &["unique_id_2"])
                .unwrap()
                .len(),
            3
        );
        assert!(
            store
                .fetch_fields(RecordFilter::One("404"), &["unique_id_2"])
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn save_persists_to_disk() {
        let file = sample();
        let store = JsonFileStore::open(&file.0, "record_id").unwrap();

        store
            .save_fields(&RecordUpdate::new("2").set("unique_id_2", "1234-001-NC"))
            .unwrap();

        let reopened = JsonFileStore::open(&file.0, "record_id").unwrap();
        let got = reopened
            .fetch_fields(RecordFilter::One("2"), &["unique_id_2", "test"])
            .unwrap();
        assert_eq!(got[0].get("unique_id_2"), Some("1234-001-NC"));
        assert_eq!(got[0].get("test"), Some("1234"));
    }

    #[test]
    fn save_to_unknown_record_is_a_field_error() {
        let file = sample();
        let store = JsonFileStore::open(&file.0, "record_id").unwrap();

        let errors = store
            .save_fields(&RecordUpdate::new("404").set("unique_id_2", "1234-001"))
            .unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new("404", "record_id", "record does not exist")]
        );
    }

    #[test]
    fn picks_up_external_edits() {
        let file = sample();
        let store = JsonFileStore::open(&file.0, "record_id").unwrap();

        fs::write(
            &file.0,
            serde_json::to_vec(&json!([{ "record_id": "9", "unique_id_2": "1234-050" }]))
                .unwrap(),
        )
        .unwrap();

        let got = store
            .fetch_fields(RecordFilter::All, &["unique_id_2"])
            .unwrap();
        assert_eq!(got, vec![Record::new().with("unique_id_2", "1234-050")]);
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let file = sample();
        let before = fs::read(&file.0).unwrap();

        let err = atomic_write(&file.0, |f| {
            f.write_all(b"[{\"record_id\":")?;
            Err(io::Error::other("disk full"))
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "disk full");

        let mut tmp = file.0.as_os_str().to_owned();
        tmp.push(".tmp");
        assert!(!PathBuf::from(tmp).exists());
        assert_eq!(fs::read(&file.0).unwrap(), before);
    }

    #[test]
    fn open_reports_missing_and_malformed_files() {
        let missing = std::env::temp_dir().join("partseq-json-store-does-not-exist.json");
        assert!(matches!(
            JsonFileStore::open(&missing, "record_id"),
            Err(StoreError::Unavailable { .. })
        ));

        let file = TempFile::with(&json!({ "not": "an array" }));
        assert!(matches!(
            JsonFileStore::open(&file.0, "record_id"),
            Err(StoreError::Malformed { .. })
        ));
    }
}
